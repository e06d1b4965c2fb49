//! Ordered, version-gated application of the rule catalog.

use serde::Serialize;
use xml_tree_core::XmlNode;

use crate::rules::{catalog, ConvertError, ConvertOptions};
use crate::version::Version;

/// What the engine did with one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Skipped,
}

/// Record of one rule in a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RuleRecord {
    /// The rule's own description of the invariant it enforces.
    pub rule: String,
    pub outcome: Outcome,
    /// Lossy-conversion warnings raised while applying.
    pub warnings: Vec<String>,
}

/// Full record of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Target version as requested by the caller.
    pub target_version: String,
    /// Schema version actually written into the document.
    pub normalized_version: Option<String>,
    /// Per-rule outcomes, in application order.
    pub rules: Vec<RuleRecord>,
}

impl ConversionReport {
    pub fn applied(&self) -> usize {
        self.rules
            .iter()
            .filter(|record| record.outcome == Outcome::Applied)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.rules
            .iter()
            .filter(|record| record.outcome == Outcome::Skipped)
            .count()
    }

    /// All warnings, in rule order.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .flat_map(|record| record.warnings.iter().map(String::as_str))
    }
}

/// Convert `document` in place to the requested target version.
///
/// Instantiates the full rule catalog and applies it in order. Rules whose
/// version gate excludes the target are recorded as skipped. The first rule
/// error aborts the run; the document must then be considered unusable.
pub fn convert(
    document: &mut XmlNode,
    target_version: &str,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    let target: Version = target_version.parse()?;

    let mut records = Vec::new();
    for mut rule in catalog() {
        if !rule.applicable_for(&target, options) {
            records.push(RuleRecord {
                rule: rule.describe(),
                outcome: Outcome::Skipped,
                warnings: Vec::new(),
            });
            continue;
        }
        let warnings = rule.apply(document, &target, options)?;
        records.push(RuleRecord {
            rule: rule.describe(),
            outcome: Outcome::Applied,
            warnings,
        });
    }

    Ok(ConversionReport {
        target_version: target.to_string(),
        normalized_version: document.get_text(&["version"]).map(str::to_string),
        rules: records,
    })
}
