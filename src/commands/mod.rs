pub type CmdResult<T> = fieldfix::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod fix;
pub mod mappings;

pub(crate) fn run_text(
    command: crate::Commands,
    _global: &GlobalArgs,
) -> fieldfix::Result<(String, i32)> {
    match command {
        crate::Commands::Fix(args) => fix::run_text(args),
        crate::Commands::Mappings(args) => mappings::run_text(args),
        _ => Err(fieldfix::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (fieldfix::Result<serde_json::Value>, i32) {
    crate::tty::status("fieldfix is working...");

    match command {
        crate::Commands::Fix(args) => dispatch!(args, global, fix),
        crate::Commands::Mappings(args) => dispatch!(args, global, mappings),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
