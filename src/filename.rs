//! Output filename selection and composition.

use std::str::FromStr;

use crate::cli::ResolutionTier;

/// Which capture fields appear in output filenames (the `-f` option).
///
/// Parsed from a string of letters: `p` selects the page sort key, `i` the
/// image id and `u` the capture uuid. Letter order in the option does not
/// matter; components are always joined as sort key, image id, capture uuid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameFields {
    pub sort_key: bool,
    pub image_id: bool,
    pub capture_uuid: bool,
}

impl Default for FilenameFields {
    fn default() -> Self {
        Self {
            sort_key: true,
            image_id: true,
            capture_uuid: true,
        }
    }
}

/// Error returned when a `-f` value selects no fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' selects no filename fields; use any of p (sort key), i (image id), u (uuid)")]
pub struct EmptySelection(pub String);

impl FromStr for FilenameFields {
    type Err = EmptySelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = Self {
            sort_key: s.contains('p'),
            image_id: s.contains('i'),
            capture_uuid: s.contains('u'),
        };
        if !(fields.sort_key || fields.image_id || fields.capture_uuid) {
            return Err(EmptySelection(s.to_string()));
        }
        Ok(fields)
    }
}

impl FilenameFields {
    /// Compose `<selected components dot-joined>.<ext>`.
    pub fn compose(
        &self,
        sort_key: &str,
        image_id: &str,
        capture_uuid: &str,
        tier: ResolutionTier,
    ) -> String {
        let components = [
            (self.sort_key, sort_key),
            (self.image_id, image_id),
            (self.capture_uuid, capture_uuid),
        ];
        let stem = components
            .iter()
            .filter(|(selected, _)| *selected)
            .map(|(_, value)| *value)
            .collect::<Vec<_>>()
            .join(".");
        format!("{}.{}", stem, tier.extension())
    }
}

/// clap value parser for `-f`.
pub fn parse_filename_fields(s: &str) -> Result<FilenameFields, String> {
    s.parse().map_err(|e: EmptySelection| e.to_string())
}
