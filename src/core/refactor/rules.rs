//! Rename rules generated from the mapping table.
//!
//! Each table entry yields one rule per lexical context. Groups run from the
//! most specific context (member access, anchored by a leading `.`) to the
//! least specific (bare identifier, anchored only by word boundaries).

use regex::Regex;
use serde::Serialize;

use super::mapping::MappingTable;
use crate::error::{Error, Result};

/// The lexical context a rule group targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LexicalContext {
    /// `.orderId` → `.order_id`
    MemberAccess,
    /// `orderId:` → `order_id:`
    ObjectKey,
    /// `orderId` → `order_id`
    BareIdentifier,
}

impl LexicalContext {
    /// Application order.
    pub const ORDER: [LexicalContext; 3] = [
        LexicalContext::MemberAccess,
        LexicalContext::ObjectKey,
        LexicalContext::BareIdentifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LexicalContext::MemberAccess => "member_access",
            LexicalContext::ObjectKey => "object_key",
            LexicalContext::BareIdentifier => "bare_identifier",
        }
    }

    fn pattern(&self, from: &str) -> String {
        let escaped = regex::escape(from);
        match self {
            LexicalContext::MemberAccess => format!(r"\.{}\b", escaped),
            LexicalContext::ObjectKey => format!(r"\b{}:", escaped),
            LexicalContext::BareIdentifier => format!(r"\b{}\b", escaped),
        }
    }

    fn replacement(&self, to: &str) -> String {
        match self {
            LexicalContext::MemberAccess => format!(".{}", to),
            LexicalContext::ObjectKey => format!("{}:", to),
            LexicalContext::BareIdentifier => to.to_string(),
        }
    }
}

/// A single pattern → replacement rule.
#[derive(Debug, Clone)]
pub struct RenameRule {
    pub from: String,
    pub pattern: Regex,
    pub replacement: String,
}

impl RenameRule {
    fn new(context: LexicalContext, from: &str, to: &str) -> Result<Self> {
        let source = context.pattern(from);
        let pattern = Regex::new(&source).map_err(|e| {
            Error::mapping_invalid_entry(from, to, format!("pattern '{}' failed: {}", source, e))
        })?;

        Ok(Self {
            from: from.to_string(),
            pattern,
            replacement: context.replacement(to),
        })
    }
}

/// An ordered group of rules for one lexical context.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub context: LexicalContext,
    pub rules: Vec<RenameRule>,
}

/// All three rule groups, in application order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    /// Generate the rule groups from a mapping table and verify that no rule
    /// can re-match any replacement in the set.
    pub fn from_table(table: &MappingTable) -> Result<Self> {
        let mut groups = Vec::with_capacity(LexicalContext::ORDER.len());

        for context in LexicalContext::ORDER {
            let rules = table
                .iter()
                .map(|entry| RenameRule::new(context, &entry.from, &entry.to))
                .collect::<Result<Vec<_>>>()?;
            groups.push(RuleGroup { context, rules });
        }

        let set = Self { groups };
        set.check_conflicts()?;
        Ok(set)
    }

    /// Rules for the built-in table.
    pub fn builtin() -> Result<Self> {
        Self::from_table(&MappingTable::builtin())
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    fn check_conflicts(&self) -> Result<()> {
        let replacements: Vec<&RenameRule> =
            self.groups.iter().flat_map(|g| g.rules.iter()).collect();

        for group in &self.groups {
            for rule in &group.rules {
                if let Some(hit) = replacements
                    .iter()
                    .find(|other| rule.pattern.is_match(&other.replacement))
                {
                    return Err(Error::rule_conflict(
                        rule.pattern.as_str(),
                        &rule.from,
                        &hit.replacement,
                    ));
                }
            }
        }

        Ok(())
    }
}
