use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;

use fieldfix::defaults;
use fieldfix::refactor::{FieldMapping, MappingTable, RuleSet};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Print a JSON response instead of the text listing
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct MappingsOutput {
    pub command: String,
    pub builtin: usize,
    pub configured: usize,
    pub rules: usize,
    pub entries: Vec<FieldMapping>,
}

pub fn run(_args: MappingsArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<MappingsOutput> {
    Ok((collect()?, 0))
}

pub fn run_text(_args: MappingsArgs) -> fieldfix::Result<(String, i32)> {
    let output = collect()?;

    let width = output
        .entries
        .iter()
        .map(|e| e.from.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in &output.entries {
        let _ = writeln!(out, "{:width$}  ->  {}", entry.from, entry.to, width = width);
    }
    let _ = writeln!(
        out,
        "\n{} mappings ({} built-in, {} configured), {} rules",
        output.entries.len(),
        output.builtin,
        output.configured,
        output.rules
    );

    Ok((out, 0))
}

fn collect() -> fieldfix::Result<MappingsOutput> {
    let defaults = defaults::load_defaults();
    let builtin = MappingTable::builtin().len();
    let table = MappingTable::builtin().with_extra(&defaults.mappings)?;
    let rules = RuleSet::from_table(&table)?;

    Ok(MappingsOutput {
        command: "mappings".to_string(),
        builtin,
        configured: table.len() - builtin,
        rules: rules.rule_count(),
        entries: table.iter().cloned().collect(),
    })
}
