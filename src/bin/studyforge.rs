fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    // `serve` keeps stdout silent until shutdown; it is the protocol stream.
    match studyforge::commands::run_cli(args) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
