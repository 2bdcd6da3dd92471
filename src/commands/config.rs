use clap::{Args, Subcommand};
use serde::Serialize;

use fieldfix::defaults::{self, Defaults, FieldfixConfig};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore fieldfix.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to fieldfix.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<FieldfixConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool) -> CmdResult<ConfigOutput> {
    if builtin {
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                config: None,
                defaults: Some(defaults::builtin_defaults()),
                path: None,
                exists: None,
            },
            0,
        ));
    }

    let config = defaults::load_config_strict()?;
    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(config),
            defaults: None,
            path: None,
            exists: None,
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            defaults: None,
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
        },
        0,
    ))
}
