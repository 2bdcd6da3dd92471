//! Field renaming: rewrite camelCase field names to snake_case across a tree.
//!
//! The mapping table is the single source of truth. Rule groups for member
//! access, object-literal keys and bare identifiers are generated from it and
//! applied in that order to each candidate file.

mod fix;
mod mapping;
mod rewrite;
mod rules;
mod walk;

pub use fix::{
    process, run, run_with_progress, FileFailure, FileOutcome, FixOptions, Processed, Progress,
    RunSummary, WriteMode,
};
pub use mapping::{validate_entry, FieldMapping, MappingTable};
pub use rewrite::{rewrite, ContextCounts, Rewrite};
pub use rules::{LexicalContext, RenameRule, RuleGroup, RuleSet};
pub use walk::{walk_files, WalkOptions};
