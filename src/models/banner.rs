use serde::{Deserialize, Serialize};

/// Announcement shown above the profile on the public page.
///
/// Stored as four `banner_*` rows in the settings table rather than a table
/// of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub enabled: bool,
    pub text: String,
    pub link: String,
    /// Free-form style hint such as `info`, `warning` or `urgent`
    pub kind: String,
}

impl Banner {
    pub(crate) const ENABLED_KEY: &'static str = "banner_enabled";
    pub(crate) const TEXT_KEY: &'static str = "banner_text";
    pub(crate) const LINK_KEY: &'static str = "banner_link";
    pub(crate) const KIND_KEY: &'static str = "banner_type";

    /// Applies one `banner_*` settings row. Unknown keys are ignored.
    pub(crate) fn apply_setting(&mut self, key: &str, value: String) {
        match key {
            Self::ENABLED_KEY => self.enabled = value == "true",
            Self::TEXT_KEY => self.text = value,
            Self::LINK_KEY => self.link = value,
            Self::KIND_KEY => self.kind = value,
            _ => {}
        }
    }

    /// The settings rows this banner is persisted as.
    pub(crate) fn settings(&self) -> [(&'static str, String); 4] {
        [
            (Self::ENABLED_KEY, self.enabled.to_string()),
            (Self::TEXT_KEY, self.text.clone()),
            (Self::LINK_KEY, self.link.clone()),
            (Self::KIND_KEY, self.kind.clone()),
        ]
    }
}
