use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use iosevka_custom_cli::cli::Cli;

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    Cli::parse().run()
}
