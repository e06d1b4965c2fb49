use chrono::Utc;
use xml_tree_core::XmlNode;

use crate::rules::{ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Overwrites the export `<date>` field with the current UTC time.
pub struct ExportDateRefresher;

impl Rule for ExportDateRefresher {
    fn describe(&self) -> String {
        "export date records the conversion time".to_string()
    }

    fn applicable_for(&self, _target: &Version, _options: &ConvertOptions) -> bool {
        true
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        _target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        match document.get_child_mut("date") {
            Some(date) => date.text = Some(stamp),
            None => {
                // keep the conventional element order: version, then date
                let position = document
                    .children
                    .iter()
                    .position(|child| child.tag == "version")
                    .map(|index| index + 1)
                    .unwrap_or(0);
                document
                    .children
                    .insert(position, XmlNode::with_text("date", stamp));
            }
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;
    use regex::Regex;
    use xml_tree_core::parse;

    use super::ExportDateRefresher;
    use crate::rules::{ConvertOptions, Rule};
    use crate::version::Version;

    static STAMP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("hardcoded pattern")
    });

    fn target() -> Version {
        "3.0".parse().expect("test target should parse")
    }

    #[test]
    fn overwrites_the_existing_date() {
        let mut doc = parse(
            br#"<zabbix_export><version>3.4</version><date>2017-10-16T08:09:33Z</date></zabbix_export>"#,
        )
        .expect("parse");
        ExportDateRefresher
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");

        let date = doc.get_text(&["date"]).expect("date text");
        assert!(STAMP.is_match(date), "unexpected stamp format: {date}");
        assert_ne!(date, "2017-10-16T08:09:33Z");
    }

    #[test]
    fn creates_the_date_element_after_version_when_absent() {
        let mut doc =
            parse(br#"<zabbix_export><version>3.4</version><groups/></zabbix_export>"#).expect("parse");
        ExportDateRefresher
            .apply(&mut doc, &target(), &ConvertOptions::default())
            .expect("apply");

        assert_eq!(doc.children[1].tag, "date");
        assert!(STAMP.is_match(doc.get_text(&["date"]).expect("date text")));
    }
}
