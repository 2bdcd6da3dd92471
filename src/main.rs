use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Text,
}

mod commands;
mod output;
mod tty;

use commands::{config, fix, mappings};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "fieldfix")]
#[command(version = VERSION)]
#[command(about = "Rename camelCase field names to snake_case across a source tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite field names in every matching file under a directory
    Fix(fix::FixArgs),
    /// List the field mappings and the rules generated from them
    Mappings(mappings::MappingsArgs),
    /// Inspect fieldfix configuration
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Fix(args) if !args.json => ResponseMode::Text,
        Commands::Mappings(args) if !args.json => ResponseMode::Text,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    match response_mode(&cli.command) {
        ResponseMode::Text => match commands::run_text(cli.command, &global) {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                eprintln!("{}", output::render_error(&err));
                std::process::ExitCode::from(exit_code_to_u8(output::exit_code_for_error(err.code)))
            }
        },
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            let _ = output::print_envelope(json_result);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
