//! The closed catalog of schema-compatibility rules.
//!
//! Each rule encodes one fact of the form "feature X is invalid before
//! version Y" and either rewrites the document tree toward the target
//! version or declines to run. Rules are independent: none reads another
//! rule's output, and the engine applies them in the fixed [`catalog`]
//! order.

use thiserror::Error;
use xml_tree_core::XmlNode;

use crate::version::{MalformedVersion, Version};

pub mod application_prototypes;
pub mod discovery_filter;
pub mod http_fields;
pub mod snmp_oid;
pub mod timestamp;
pub mod trigger_dependencies;
pub mod trigger_expressions;
pub mod value_maps;
pub mod version_tag;

/// Caller-selected behavior toggles for a conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Remove value map references from items and item prototypes when the
    /// target predates exported value maps.
    pub squash_value_maps: bool,
}

/// Fatal conversion errors. The engine aborts on the first one.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested target has no reachable export schema.
    #[error("unsupported target version {version}: {reason}")]
    UnsupportedVersion { version: String, reason: String },
    /// The requested target version string could not be parsed.
    #[error(transparent)]
    MalformedVersion(#[from] MalformedVersion),
    /// The document does not have the shape a rule requires.
    #[error("rule '{rule}' cannot be applied: {reason}")]
    RuleApplication {
        rule: &'static str,
        reason: String,
    },
    /// A discovery filter is structurally invalid.
    #[error("malformed discovery filter: {0}")]
    MalformedFilter(String),
    /// An SNMP OID claims the discovery syntax but does not satisfy it.
    #[error("malformed SNMP discovery OID '{0}': expected discovery[key,oid,...] with at least two arguments")]
    MalformedOid(String),
}

/// A single named schema-compatibility transformation.
///
/// Rules are created once per conversion run and applied in catalog order.
/// `applicable_for` is a pure version/options gate; when it returns false
/// the engine records a silent skip. `apply` mutates the document and
/// returns any lossy-conversion warnings.
pub trait Rule {
    /// Human-readable statement of the invariant this rule enforces.
    fn describe(&self) -> String;

    /// Whether the rule participates for this target version at all.
    fn applicable_for(&self, target: &Version, options: &ConvertOptions) -> bool;

    /// Mutate the document toward the target version.
    fn apply(
        &mut self,
        document: &mut XmlNode,
        target: &Version,
        options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError>;
}

/// The full rule set, in application order.
pub fn catalog() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(version_tag::VersionTagNormalizer::default()),
        Box::new(timestamp::ExportDateRefresher),
        Box::new(value_maps::ValueMapSectionStripper),
        Box::new(value_maps::ValueMapReferenceSquasher),
        Box::new(http_tests::HttpTestStripper),
        Box::new(http_fields::DiscoveryRuleHttpFieldPruner),
        Box::new(http_fields::ItemHttpFieldPruner),
        Box::new(http_fields::ItemPrototypeHttpFieldPruner),
        Box::new(discovery_filter::DiscoveryFilterCollapser),
        Box::new(application_prototypes::ApplicationPrototypeStripper),
        Box::new(snmp_oid::SnmpOidCollapser),
        Box::new(trigger_dependencies::TriggerPrototypeDependencyStripper),
        Box::new(trigger_expressions::TriggerOperatorDowngrader),
        Box::new(trigger_expressions::LastParameterDefaulter),
    ]
}

/// Iterate mutably over the `<template>` entries of an export.
pub(crate) fn templates_mut<'a>(
    document: &'a mut XmlNode,
) -> impl Iterator<Item = &'a mut XmlNode> + 'a {
    document
        .get_child_mut("templates")
        .into_iter()
        .flat_map(|templates| templates.children_mut("template"))
}

/// Iterate mutably over the `<discovery_rule>` entries of one template.
pub(crate) fn discovery_rules_mut<'a>(
    template: &'a mut XmlNode,
) -> impl Iterator<Item = &'a mut XmlNode> + 'a {
    template
        .get_child_mut("discovery_rules")
        .into_iter()
        .flat_map(|rules| rules.children_mut("discovery_rule"))
}

#[cfg(test)]
mod tests {
    use super::catalog;

    #[test]
    fn catalog_order_is_stable() {
        let described: Vec<String> = catalog().iter().map(|rule| rule.describe()).collect();
        assert_eq!(described.len(), 14);
        assert!(described[0].contains("version tag"));
        assert!(described[1].contains("export date"));
        assert!(described[13].contains("last()"));
    }
}
