use clap::Parser;
use dcasim::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
