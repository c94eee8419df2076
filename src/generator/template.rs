use crate::generator::GeneratorError;

/// Minimal `{{placeholder}}` renderer. Resolution failures surface to the
/// caller so an artifact with unresolved holes is never written.
pub(crate) fn render_template<F>(template: &str, mut resolve: F) -> Result<String, GeneratorError>
where
    F: FnMut(&str) -> Result<String, GeneratorError>,
{
    let mut rendered = String::new();
    let mut cursor = template;

    while let Some(start) = cursor.find("{{") {
        rendered.push_str(&cursor[..start]);
        let after_open = &cursor[start + 2..];
        let Some(close_offset) = after_open.find("}}") else {
            return Err(GeneratorError::UnclosedPlaceholder);
        };
        let token = after_open[..close_offset].trim();
        if token.is_empty() {
            return Err(GeneratorError::EmptyPlaceholder);
        }
        rendered.push_str(&resolve(token)?);
        cursor = &after_open[close_offset + 2..];
    }

    rendered.push_str(cursor);
    Ok(rendered)
}

/// Quotes a field name or path as a Python string literal.
pub(crate) fn py_str(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// The sampling driver skeleton. Field values go through dict subscripts so
/// arbitrary input/output names survive; the model routine returns a mapping
/// of every input then output name to its sampled/computed value.
pub(crate) const ARTIFACT_TEMPLATE: &str = r#"#!/usr/bin/env python3
import csv
import random
import time

# Generated sampling driver for study "{{study_name}}".
executable = {{executable}}
result_table = {{result_table}}
headers = [{{headers}}]
iterations = {{iterations}}
delay_seconds = {{delay_seconds}}


def model():
    row = {}
{{sample_lines}}
{{output_lines}}
    return row


if __name__ == "__main__":
    print(f"Starting study run for executable: {executable}")
    print(f"Saving data to {result_table}...")
    with open(result_table, "w", newline="") as f:
        csv.DictWriter(f, fieldnames=headers).writeheader()
    for i in range(iterations):
        row = model()
        with open(result_table, "a", newline="") as f:
            csv.DictWriter(f, fieldnames=headers).writerow(row)
        print(f"Step {i + 1}/{iterations}: written row.")
        time.sleep(delay_seconds)
    print("Study complete.")
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_substitutes_and_rejects_malformed_placeholders() {
        let rendered =
            render_template("a {{x}} b", |token| Ok(token.to_ascii_uppercase())).expect("render");
        assert_eq!(rendered, "a X b");

        assert!(render_template("a {{x b", |_| Ok(String::new())).is_err());
        assert!(render_template("a {{ }} b", |_| Ok(String::new())).is_err());
    }

    #[test]
    fn python_strings_escape_quotes_and_backslashes() {
        assert_eq!(py_str(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
