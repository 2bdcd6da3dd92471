use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use fieldfix::defaults::{self, Defaults};
use fieldfix::refactor::{
    self, FixOptions, MappingTable, Progress, RuleSet, RunSummary, WalkOptions, WriteMode,
};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Directory to rewrite (default: configured root, "src")
    pub root: Option<String>,

    /// File suffix to rewrite, repeatable (default: ts, tsx)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Directory name to skip at any depth, repeatable (default: .git)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON response instead of the text report
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FixOutput {
    pub command: String,
    pub mappings: usize,
    pub rules: usize,
    #[serde(flatten)]
    pub summary: RunSummary,
}

pub fn run(args: FixArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<FixOutput> {
    let plan = plan(&args, &defaults::load_defaults())?;
    let summary = refactor::run(&plan.root, &plan.rules, &plan.options)?;
    Ok((plan.into_output(summary), 0))
}

/// Text mode: per-file lines go to stdout as each file finishes; the
/// returned string is the closing totals block.
pub fn run_text(args: FixArgs) -> fieldfix::Result<(String, i32)> {
    let plan = plan(&args, &defaults::load_defaults())?;
    let dry_run = plan.options.mode == WriteMode::DryRun;

    let summary = refactor::run_with_progress(&plan.root, &plan.rules, &plan.options, |event| {
        println!("{}", progress_line(event, dry_run));
    })?;

    Ok((render_totals(&summary), 0))
}

struct Plan {
    mappings: usize,
    rules: RuleSet,
    root: PathBuf,
    options: FixOptions,
}

impl Plan {
    fn into_output(self, summary: RunSummary) -> FixOutput {
        FixOutput {
            command: "fix".to_string(),
            mappings: self.mappings,
            rules: self.rules.rule_count(),
            summary,
        }
    }
}

/// Merge CLI arguments over configured defaults and build the rule set.
fn plan(args: &FixArgs, defaults: &Defaults) -> fieldfix::Result<Plan> {
    let table = MappingTable::builtin().with_extra(&defaults.mappings)?;
    let rules = RuleSet::from_table(&table)?;

    let root = PathBuf::from(args.root.as_deref().unwrap_or(defaults.root.as_str()));

    let extensions = if args.extensions.is_empty() {
        defaults.extensions.clone()
    } else {
        args.extensions.clone()
    };
    let skip_dirs = if args.skip_dirs.is_empty() {
        defaults.skip_dirs.clone()
    } else {
        args.skip_dirs.clone()
    };

    let walk = WalkOptions::new(extensions, skip_dirs);
    if walk.extensions.is_empty() {
        return Err(fieldfix::Error::validation_invalid_argument(
            "ext",
            "At least one file suffix is required",
        ));
    }

    Ok(Plan {
        mappings: table.len(),
        rules,
        root,
        options: FixOptions {
            walk,
            mode: if args.dry_run {
                WriteMode::DryRun
            } else {
                WriteMode::Write
            },
        },
    })
}

/// One report line for a changed or failed file.
pub fn progress_line(event: Progress<'_>, dry_run: bool) -> String {
    match event {
        Progress::Changed(outcome) => {
            let verb = if dry_run { "Would fix" } else { "Fixed" };
            format!("{} {} patterns in {}", verb, outcome.changes, outcome.file)
        }
        Progress::Failed(failure) => {
            format!("Error processing {}: {}", failure.file, failure.error)
        }
    }
}

/// Closing block printed after the per-file lines.
pub fn render_totals(summary: &RunSummary) -> String {
    let mut out = String::from("\n");
    if summary.dry_run {
        out.push_str("Dry run complete, no files written.\n");
    } else {
        out.push_str("Completed!\n");
    }
    let _ = writeln!(out, "Files changed: {}", summary.files_changed);
    let _ = writeln!(out, "Total changes: {}", summary.total_changes);
    out
}
