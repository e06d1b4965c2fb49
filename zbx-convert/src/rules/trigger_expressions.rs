//! Textual downgrades of trigger expression syntax.

use once_cell::sync::Lazy;
use regex::Regex;
use xml_tree_core::XmlNode;

use crate::rules::{ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Elements whose `<expression>` child holds trigger expression syntax.
const EXPRESSION_CARRIERS: [&str; 3] = ["trigger", "trigger_prototype", "dependency"];

static AND_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+and\s+").expect("hardcoded pattern"));
static OR_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+or\s+").expect("hardcoded pattern"));
static BARE_LAST: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.last\(\)").expect("hardcoded pattern"));

/// Rewrite every trigger-syntax expression in the document.
fn rewrite_expressions<F: Fn(&str) -> String>(document: &mut XmlNode, rewrite: F) {
    document.for_each_mut(&mut |node| {
        if !EXPRESSION_CARRIERS.contains(&node.tag.as_str()) {
            return;
        }
        if let Some(expression) = node.get_child_mut("expression") {
            if let Some(text) = expression.text.as_deref() {
                expression.text = Some(rewrite(text));
            }
        }
    });
}

/// Rewrites word operators to the symbolic forms required before 2.4:
/// whitespace-delimited `and` → `&`, `or` → `|`, and `<>` → `#`.
pub struct TriggerOperatorDowngrader;

impl Rule for TriggerOperatorDowngrader {
    fn describe(&self) -> String {
        "trigger expressions use symbolic operators before 2.4".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&Version::new(&[2, 4]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        rewrite_expressions(document, |text| {
            let text = AND_WORD.replace_all(text, "&");
            let text = OR_WORD.replace_all(&text, "|");
            text.replace("<>", "#")
        });
        Ok(Vec::new())
    }
}

/// Gives parameterless `last()` calls the explicit `last(0)` form required
/// before 2.2.
pub struct LastParameterDefaulter;

impl Rule for LastParameterDefaulter {
    fn describe(&self) -> String {
        "last() calls carry an explicit parameter before 2.2".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&Version::new(&[2, 2]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        rewrite_expressions(document, |text| {
            BARE_LAST.replace_all(text, ".last(0)").into_owned()
        });
        Ok(Vec::new())
    }
}
