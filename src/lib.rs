pub mod commands;
pub mod config;
pub mod generator;
pub mod process;
pub mod server;
pub mod shared;
pub mod study;
