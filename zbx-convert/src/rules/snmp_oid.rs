use once_cell::sync::Lazy;
use regex::Regex;
use xml_tree_core::XmlNode;

use crate::rules::{discovery_rules_mut, templates_mut, ConvertError, ConvertOptions, Rule};
use crate::version::Version;

static DISCOVERY_OID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^discovery\[(.+)\]$").expect("hardcoded pattern"));

/// Rewrites multi-value `discovery[{#MACRO},oid,...]` SNMP OID expressions
/// to the plain single OID understood by pre-2.5 servers.
pub struct SnmpOidCollapser;

impl Rule for SnmpOidCollapser {
    fn describe(&self) -> String {
        "discovery SNMP OIDs use the single-OID form before 2.5".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&Version::new(&[2, 5]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        for template in templates_mut(document) {
            for drule in discovery_rules_mut(template) {
                let Some(oid) = drule.get_child_mut("snmp_oid") else {
                    continue;
                };
                let Some(text) = oid.text.as_deref() else {
                    continue;
                };
                // plain OIDs are already valid for old schemas
                if !text.starts_with("discovery[") {
                    continue;
                }
                oid.text = Some(collapse(text)?);
            }
        }
        Ok(Vec::new())
    }
}

/// Second comma-separated argument of the discovery expression.
fn collapse(text: &str) -> Result<String, ConvertError> {
    let captures = DISCOVERY_OID
        .captures(text)
        .ok_or_else(|| ConvertError::MalformedOid(text.to_string()))?;
    let mut arguments = captures[1].split(',');
    let _key = arguments.next();
    let oid = arguments
        .next()
        .map(str::trim)
        .filter(|oid| !oid.is_empty())
        .ok_or_else(|| ConvertError::MalformedOid(text.to_string()))?;
    Ok(oid.to_string())
}
