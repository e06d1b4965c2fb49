use xml_tree_core::XmlNode;

use crate::rules::{discovery_rules_mut, templates_mut, ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Collapses structured discovery filters into the legacy
/// `{#MACRO}:regexp` expression form for pre-2.3 targets.
///
/// Only the default and/or evaluation with a single `matches` condition on
/// formula id `A` has a lossless legacy equivalent. Everything else is
/// blanked, with a warning when data is actually lost.
pub struct DiscoveryFilterCollapser;

impl Rule for DiscoveryFilterCollapser {
    fn describe(&self) -> String {
        "discovery filters use the legacy expression form before 2.3".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&Version::new(&[2, 3]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        let mut warnings = Vec::new();
        for template in templates_mut(document) {
            for drule in discovery_rules_mut(template) {
                let key = drule.get_text(&["key"]).unwrap_or("?").to_string();
                if let Some(filter) = drule.get_child_mut("filter") {
                    collapse_filter(filter, &key, &mut warnings)?;
                }
            }
        }
        Ok(warnings)
    }
}

fn collapse_filter(
    filter: &mut XmlNode,
    rule_key: &str,
    warnings: &mut Vec<String>,
) -> Result<(), ConvertError> {
    if filter.children.is_empty() {
        // already in the legacy form (text or blank)
        return Ok(());
    }

    let conditions = filter
        .get_child("conditions")
        .map(|conditions| conditions.get_children("condition"))
        .unwrap_or_default();

    // absent and empty condition lists both mean the default blank filter
    if conditions.is_empty() {
        blank(filter);
        return Ok(());
    }

    let evaltype = filter.get_text(&["evaltype"]).unwrap_or("0");
    let formula = filter.get_text(&["formula"]).unwrap_or("");
    if evaltype != "0" || !formula.is_empty() || conditions.len() > 1 {
        warnings.push(lossy_warning(rule_key));
        blank(filter);
        return Ok(());
    }

    let condition = conditions[0];
    let operator = condition.get_text(&["operator"]).unwrap_or("8");
    let formulaid = condition.get_text(&["formulaid"]).unwrap_or("A");
    if operator != "8" || formulaid != "A" {
        warnings.push(lossy_warning(rule_key));
        blank(filter);
        return Ok(());
    }

    let macro_name = condition
        .get_text(&["macro"])
        .ok_or_else(|| {
            ConvertError::MalformedFilter(format!(
                "condition in discovery rule '{rule_key}' has no <macro> element"
            ))
        })?
        .to_string();
    let value = condition.get_text(&["value"]).unwrap_or("").to_string();

    blank(filter);
    filter.text = Some(format!("{macro_name}:{value}"));
    Ok(())
}

fn lossy_warning(rule_key: &str) -> String {
    format!("discovery rule '{rule_key}' has a filter with no legacy equivalent; clearing it")
}

fn blank(filter: &mut XmlNode) {
    filter.children.clear();
    filter.text = None;
}

#[cfg(test)]
mod tests {
    use xml_tree_core::{parse, XmlNode};

    use super::DiscoveryFilterCollapser;
    use crate::rules::{ConvertError, ConvertOptions, Rule};
    use crate::version::Version;

    fn target() -> Version {
        "2.0".parse().expect("test target should parse")
    }

    fn export_with_filter(filter: &str) -> XmlNode {
        let xml = format!(
            r#"<zabbix_export><templates><template><discovery_rules>
                <discovery_rule><key>net.if.discovery</key>{filter}</discovery_rule>
            </discovery_rules></template></templates></zabbix_export>"#
        );
        parse(xml.as_bytes()).expect("parse")
    }

    fn filter_of(doc: &XmlNode) -> &XmlNode {
        doc.get_child("templates").expect("templates").children[0]
            .get_child("discovery_rules")
            .expect("discovery_rules")
            .children[0]
            .get_child("filter")
            .expect("filter")
    }

    #[test]
    fn collapses_a_single_matches_condition() {
        let mut doc = export_with_filter(
            r#"<filter>
                <evaltype>0</evaltype>
                <formula/>
                <conditions>
                    <condition>
                        <macro>{#M}</macro>
                        <value>v</value>
                        <operator>8</operator>
                        <formulaid>A</formulaid>
                    </condition>
                </conditions>
            </filter>"#,
        );

        let warnings = DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");

        assert!(warnings.is_empty());
        let filter = filter_of(&doc);
        assert!(filter.children.is_empty());
        assert_eq!(filter.text.as_deref(), Some("{#M}:v"));
    }

    #[test]
    fn two_conditions_clear_the_filter_with_a_warning() {
        let mut doc = export_with_filter(
            r#"<filter>
                <evaltype>0</evaltype>
                <formula/>
                <conditions>
                    <condition><macro>{#A}</macro><value>x</value><operator>8</operator><formulaid>A</formulaid></condition>
                    <condition><macro>{#B}</macro><value>y</value><operator>8</operator><formulaid>B</formulaid></condition>
                </conditions>
            </filter>"#,
        );

        let warnings = DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("two conditions are lossy, not fatal");

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("net.if.discovery"));
        let filter = filter_of(&doc);
        assert!(filter.children.is_empty());
        assert!(filter.text.is_none());
    }

    #[test]
    fn custom_formula_evaluation_clears_the_filter_with_a_warning() {
        let mut doc = export_with_filter(
            r#"<filter>
                <evaltype>3</evaltype>
                <formula>A or B</formula>
                <conditions>
                    <condition><macro>{#A}</macro><value>x</value><operator>8</operator><formulaid>A</formulaid></condition>
                </conditions>
            </filter>"#,
        );

        let warnings = DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");

        assert_eq!(warnings.len(), 1);
        assert!(filter_of(&doc).text.is_none());
    }

    #[test]
    fn absent_and_empty_conditions_mean_a_blank_filter() {
        for filter in [
            r#"<filter><evaltype>0</evaltype><formula/></filter>"#,
            r#"<filter><evaltype>0</evaltype><formula/><conditions/></filter>"#,
        ] {
            let mut doc = export_with_filter(filter);
            let warnings = DiscoveryFilterCollapser
                .apply(&mut doc, &target(), &ConvertOptions::default())
                .expect("apply");

            assert!(warnings.is_empty(), "blank filters are not lossy");
            let collapsed = filter_of(&doc);
            assert!(collapsed.children.is_empty());
            assert!(collapsed.text.is_none());
        }
    }

    #[test]
    fn legacy_text_filters_pass_through() {
        let mut doc = export_with_filter("<filter>{#M}:v</filter>");
        DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");
        assert_eq!(filter_of(&doc).text.as_deref(), Some("{#M}:v"));
    }

    #[test]
    fn condition_without_macro_is_malformed() {
        let mut doc = export_with_filter(
            r#"<filter>
                <evaltype>0</evaltype>
                <formula/>
                <conditions>
                    <condition><value>x</value><operator>8</operator><formulaid>A</formulaid></condition>
                </conditions>
            </filter>"#,
        );

        let err = DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect_err("missing macro is structural");
        assert!(matches!(err, ConvertError::MalformedFilter(_)));
    }

    #[test]
    fn condition_without_value_collapses_to_empty_pattern() {
        let mut doc = export_with_filter(
            r#"<filter>
                <evaltype>0</evaltype>
                <formula/>
                <conditions>
                    <condition><macro>{#M}</macro><operator>8</operator><formulaid>A</formulaid></condition>
                </conditions>
            </filter>"#,
        );

        DiscoveryFilterCollapser
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");
        assert_eq!(filter_of(&doc).text.as_deref(), Some("{#M}:"));
    }
}
