use xml_tree_core::XmlNode;

use crate::rules::{discovery_rules_mut, templates_mut, ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Removes `<application_prototypes>` associations from item prototypes for
/// pre-2.5 targets.
pub struct ApplicationPrototypeStripper;

impl Rule for ApplicationPrototypeStripper {
    fn describe(&self) -> String {
        "item prototypes carry no application prototypes before 2.5".to_string()
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
                let Some(prototypes) = drule.get_child_mut("item_prototypes") else {
                    continue;
                };
                for prototype in prototypes.children_mut("item_prototype") {
                    prototype.remove_children("application_prototypes");
                }
            }
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use xml_tree_core::parse;

    use super::ApplicationPrototypeStripper;
    use crate::rules::{ConvertOptions, Rule};
    use crate::version::Version;

    fn target(s: &str) -> Version {
        s.parse().expect("test target should parse")
    }

    #[test]
    fn strips_application_prototypes_from_item_prototypes() {
        let mut doc = parse(
            br#"<zabbix_export><templates><template><discovery_rules><discovery_rule>
                <item_prototypes>
                    <item_prototype>
                        <key>net.if.in[{#IFNAME}]</key>
                        <applications/>
                        <application_prototypes>
                            <application_prototype><name>Interface {#IFNAME}</name></application_prototype>
                        </application_prototypes>
                    </item_prototype>
                </item_prototypes>
            </discovery_rule></discovery_rules></template></templates></zabbix_export>"#,
        )
        .expect("parse");

        ApplicationPrototypeStripper
            .apply(&mut doc, &target("2.4"), &ConvertOptions::default())
            .expect("apply");

        let prototype = &doc.get_child("templates").expect("templates").children[0]
            .get_child("discovery_rules")
            .expect("discovery_rules")
            .children[0]
            .get_child("item_prototypes")
            .expect("item_prototypes")
            .children[0];
        assert!(prototype.get_child("application_prototypes").is_none());
        assert!(prototype.get_child("applications").is_some());
    }

    #[test]
    fn gate_sits_at_2_5() {
        let rule = ApplicationPrototypeStripper;
        assert!(rule.applicable_for(&target("2.4.9"), &ConvertOptions::default()));
        assert!(!rule.applicable_for(&target("2.5"), &ConvertOptions::default()));
    }
}
