use xml_tree_core::XmlNode;

use crate::rules::{ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Removes the top-level `<value_maps>` section for targets that predate
/// exported value map definitions.
pub struct ValueMapSectionStripper;

impl Rule for ValueMapSectionStripper {
    fn describe(&self) -> String {
        "value map definitions are not part of the export before 3.0".to_string()
    }

    fn applicable_for(&self, target: &Version, _options: &ConvertOptions) -> bool {
        target.below(&Version::new(&[3, 0]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        document.remove_children("value_maps");
        Ok(Vec::new())
    }
}

/// Clears `<valuemap>` references from items and item prototypes. Gated
/// behind [`ConvertOptions::squash_value_maps`].
pub struct ValueMapReferenceSquasher;

impl Rule for ValueMapReferenceSquasher {
    fn describe(&self) -> String {
        "items carry no value map references before 3.0".to_string()
    }

    fn applicable_for(&self, target: &Version, options: &ConvertOptions) -> bool {
        options.squash_value_maps && target.below(&Version::new(&[3, 0]))
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        document.for_each_mut(&mut |node| {
            if node.tag == "item" || node.tag == "item_prototype" {
                node.remove_children("valuemap");
            }
        });
        Ok(Vec::new())
    }
}
