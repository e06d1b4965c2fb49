use xml_tree_core::XmlNode;

use crate::rules::{ConvertError, ConvertOptions, Rule};
use crate::version::Version;

/// Export schema versions the converter can target exactly, oldest first.
const BREAKPOINTS: [[u64; 2]; 5] = [[2, 0], [3, 0], [3, 2], [3, 3], [3, 4]];

/// Rewrites the export `<version>` tag to the nearest supported schema
/// version at or below the requested target.
#[derive(Debug, Default)]
pub struct VersionTagNormalizer {
    resolved: Option<String>,
}

impl VersionTagNormalizer {
    /// The breakpoint chosen by the last `apply`, if any.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }
}

impl Rule for VersionTagNormalizer {
    fn describe(&self) -> String {
        match &self.resolved {
            Some(version) => format!("export version tag set to {version}"),
            None => "export version tag names a supported schema version".to_string(),
        }
    }

    fn applicable_for(&self, _target: &Version, _options: &ConvertOptions) -> bool {
        true
    }

    fn apply(
        &mut self,
        document: &mut XmlNode,
        target: &Version,
        _options: &ConvertOptions,
    ) -> Result<Vec<String>, ConvertError> {
        let resolved = nearest_breakpoint(target)?;
        self.resolved = Some(resolved.as_str().to_string());

        match document.get_child_mut("version") {
            Some(version) => version.text = Some(resolved.as_str().to_string()),
            None => document
                .children
                .insert(0, XmlNode::with_text("version", resolved.as_str())),
        }
        Ok(Vec::new())
    }
}

/// Greatest supported schema version at or below `target`.
fn nearest_breakpoint(target: &Version) -> Result<Version, ConvertError> {
    let newest = Version::new(&BREAKPOINTS[BREAKPOINTS.len() - 1]);
    if *target > newest {
        return Err(ConvertError::UnsupportedVersion {
            version: target.to_string(),
            reason: format!("newer than the newest supported export version {newest}"),
        });
    }

    let mut best = None;
    for segments in BREAKPOINTS {
        let candidate = Version::new(&segments);
        if candidate <= *target {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| ConvertError::UnsupportedVersion {
        version: target.to_string(),
        reason: format!(
            "older than the oldest supported export version {}",
            Version::new(&BREAKPOINTS[0])
        ),
    })
}
