//! CSS text generation for atomic rules

use crate::types::{AtomicRule, AtomicRuleContent, ATOMIC_RULE_PLACEHOLDER};
use indexmap::IndexMap;

#[derive(Debug, Default)]
struct RuleNode {
    declarations: Vec<String>,
    children: IndexMap<String, RuleNode>,
}

impl RuleNode {
    fn insert(&mut self, chain: Vec<String>, declaration: String) {
        let mut node = self;
        for selector in chain {
            node = node.children.entry(selector).or_default();
        }
        if !node.declarations.contains(&declaration) {
            node.declarations.push(declaration);
        }
    }

    fn write(&self, selector: &str, out: &mut String) {
        out.push_str(selector);
        out.push('{');
        out.push_str(&self.declarations.join(";"));
        if !self.declarations.is_empty() && !self.children.is_empty() {
            out.push(';');
        }
        for (child_selector, child) in &self.children {
            child.write(child_selector, out);
        }
        out.push('}');
    }

    fn write_children(&self, out: &mut String) {
        for (selector, child) in &self.children {
            child.write(selector, out);
        }
    }
}

/// Render stored rules with their names substituted for the placeholder.
/// Rules whose innermost selector lacks the placeholder are skipped.
pub fn render_atomic_rules<'a>(rules: impl IntoIterator<Item = &'a AtomicRule>) -> String {
    let mut root = RuleNode::default();
    for rule in rules {
        if !rule.content.is_renderable() {
            continue;
        }
        let chain = rule
            .content
            .selector_chain
            .iter()
            .map(|selector| selector.replace(ATOMIC_RULE_PLACEHOLDER, &rule.name))
            .collect();
        root.insert(chain, rule.content.declaration());
    }

    let mut out = String::new();
    root.write_children(&mut out);
    out
}

/// Render contents that have no name yet; the placeholder stays in place
pub fn render_preview<'a>(contents: impl IntoIterator<Item = &'a AtomicRuleContent>) -> String {
    let mut root = RuleNode::default();
    for content in contents {
        if !content.is_renderable() {
            continue;
        }
        root.insert(content.selector_chain.clone(), content.declaration());
    }

    let mut out = String::new();
    root.write_children(&mut out);
    out
}
