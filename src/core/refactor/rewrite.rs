//! Pure text rewriting: apply every rule group to one file's contents.

use regex::NoExpand;
use serde::Serialize;

use super::rules::{LexicalContext, RuleSet};

/// Changes attributed to each lexical context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextCounts {
    pub member_access: usize,
    pub object_key: usize,
    pub bare_identifier: usize,
}

impl ContextCounts {
    fn add(&mut self, context: LexicalContext, count: usize) {
        match context {
            LexicalContext::MemberAccess => self.member_access += count,
            LexicalContext::ObjectKey => self.object_key += count,
            LexicalContext::BareIdentifier => self.bare_identifier += count,
        }
    }
}

/// Result of rewriting one text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub changes: usize,
    pub per_context: ContextCounts,
}

/// Apply the rule groups in order. Each rule sees the output of the rules
/// before it; its match count is taken before replacement.
pub fn rewrite(rules: &RuleSet, text: &str) -> Rewrite {
    let mut content = text.to_string();
    let mut changes = 0;
    let mut per_context = ContextCounts::default();

    for group in rules.groups() {
        for rule in &group.rules {
            let count = rule.pattern.find_iter(&content).count();
            if count == 0 {
                continue;
            }

            let replaced = rule
                .pattern
                .replace_all(&content, NoExpand(&rule.replacement))
                .into_owned();
            content = replaced;

            changes += count;
            per_context.add(group.context, count);
        }
    }

    Rewrite {
        content,
        changes,
        per_context,
    }
}
