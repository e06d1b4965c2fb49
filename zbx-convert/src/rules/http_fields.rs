//! Pruning of HTTP agent fields for pre-3.5 targets.
//!
//! Newer export schemas attach a block of HTTP-agent-only fields to every
//! discovery rule, item, and item prototype. Older servers reject unknown
//! elements, so the block is removed wholesale. The three rules are strict:
//! an entity missing one of the listed fields is not a valid newer-schema
//! export and the conversion aborts.

use xml_tree_core::XmlNode;

use crate::rules::{discovery_rules_mut, templates_mut, ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Fields that only exist for HTTP agent checks in newer export schemas.
const HTTP_AGENT_FIELDS: [&str; 17] = [
    "timeout",
    "url",
    "query_fields",
    "posts",
    "status_codes",
    "follow_redirects",
    "post_type",
    "http_proxy",
    "headers",
    "retrieve_mode",
    "request_method",
    "allow_traps",
    "ssl_cert_file",
    "ssl_key_file",
    "ssl_key_password",
    "verify_peer",
    "verify_host",
];

/// Newer-schema fields carried by items and item prototypes on top of
/// [`HTTP_AGENT_FIELDS`].
const ITEM_EXTRA_FIELDS: [&str; 2] = ["output_format", "master_item"];

fn threshold() -> Version {
    Version::new(&[3, 5])
}

/// Strict removal: every listed field must exist on the entity.
fn prune_fields(
    node: &mut XmlNode,
    fields: &[&str],
    rule: &'static str,
    entity: &str,
) -> Result<(), ConvertError> {
    let key = node.get_text(&["key"]).unwrap_or("?").to_string();
    for &field in fields {
        if node.remove_children(field) == 0 {
            return Err(ConvertError::RuleApplication {
                rule,
                reason: format!("{entity} '{key}' has no <{field}> element"),
            });
        }
    }
    Ok(())
}

/// Strips HTTP agent fields from every discovery rule.
pub struct DiscoveryRuleHttpFieldPruner;

impl Rule for DiscoveryRuleHttpFieldPruner {
    fn describe(&self) -> String {
        "discovery rules carry no HTTP agent fields before 3.5".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&threshold())
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        for template in templates_mut(document) {
            for drule in discovery_rules_mut(template) {
                prune_fields(
                    drule,
                    &HTTP_AGENT_FIELDS,
                    "discovery-rule-http-fields",
                    "discovery rule",
                )?;
            }
        }
        Ok(Vec::new())
    }
}

/// Strips HTTP agent fields from every template item and seeds the
/// `master_item` attribute expected by the downgraded schema.
pub struct ItemHttpFieldPruner;

impl Rule for ItemHttpFieldPruner {
    fn describe(&self) -> String {
        "items carry no HTTP agent fields before 3.5".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&threshold())
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        for template in templates_mut(document) {
            let Some(items) = template.get_child_mut("items") else {
                continue;
            };
            for item in items.children_mut("item") {
                prune_fields(item, &HTTP_AGENT_FIELDS, "item-http-fields", "item")?;
                prune_fields(item, &ITEM_EXTRA_FIELDS, "item-http-fields", "item")?;
                item.attributes
                    .entry("master_item".to_string())
                    .or_default();
            }
        }
        Ok(Vec::new())
    }
}

/// Strips HTTP agent fields from every item prototype and seeds the
/// `master_item_prototype` attribute expected by the downgraded schema.
pub struct ItemPrototypeHttpFieldPruner;

impl Rule for ItemPrototypeHttpFieldPruner {
    fn describe(&self) -> String {
        "item prototypes carry no HTTP agent fields before 3.5".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&threshold())
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        for template in templates_mut(document) {
            for drule in discovery_rules_mut(template) {
                let Some(prototypes) = drule.get_child_mut("item_prototypes") else {
                    continue;
                };
                for prototype in prototypes.children_mut("item_prototype") {
                    prune_fields(
                        prototype,
                        &HTTP_AGENT_FIELDS,
                        "item-prototype-http-fields",
                        "item prototype",
                    )?;
                    prune_fields(
                        prototype,
                        &ITEM_EXTRA_FIELDS,
                        "item-prototype-http-fields",
                        "item prototype",
                    )?;
                    prototype
                        .attributes
                        .entry("master_item_prototype".to_string())
                        .or_default();
                }
            }
        }
        Ok(Vec::new())
    }
}
