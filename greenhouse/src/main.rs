use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

#[derive(Parser)]
#[command(name = "greenhouse", about = "Front-controller tooling for the greenhouse platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the controller protocol version
    Version,
    /// List the plant array discovered under a directory
    Plants { dir: PathBuf },
    /// Parse and validate a config file
    CheckConfig { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Version => {
            println!("{}", controller::FrontController::VERSION);
            ExitCode::SUCCESS
        }
        Command::Plants { dir } => match controller::build_plant_array(&dir) {
            Ok(plant_array) => {
                for (key, identifier) in &plant_array {
                    println!("{key} -> {identifier}");
                }
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
        Command::CheckConfig { path } => match config::Config::from_file(&path) {
            Ok(_) => {
                println!("ok");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
    }
}
