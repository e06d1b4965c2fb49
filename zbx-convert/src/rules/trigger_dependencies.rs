use xml_tree_core::XmlNode;

use crate::rules::{discovery_rules_mut, templates_mut, ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Removes dependency lists from trigger prototypes for pre-2.5 targets.
pub struct TriggerPrototypeDependencyStripper;

impl Rule for TriggerPrototypeDependencyStripper {
    fn describe(&self) -> String {
        "trigger prototypes carry no dependencies before 2.5".to_string()
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
                let Some(prototypes) = drule.get_child_mut("trigger_prototypes") else {
                    continue;
                };
                for prototype in prototypes.children_mut("trigger_prototype") {
                    prototype.remove_children("dependencies");
                }
            }
        }
        Ok(Vec::new())
    }
}
