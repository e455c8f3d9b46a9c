use std::fmt;
use std::str::FromStr;

use crate::Error;

pub const DEFAULT_SECTION: &str = "world";
pub const DEFAULT_PAGE_SIZE: &str = "10";

/// Scalar preferences kept next to the cached sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    SelectedSection,
    PageSize,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 2] = [PreferenceKey::SelectedSection, PreferenceKey::PageSize];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::SelectedSection => "selected_section",
            PreferenceKey::PageSize => "page_size",
        }
    }

    /// Value returned when nothing has been stored for this key.
    pub fn default_value(&self) -> &'static str {
        match self {
            PreferenceKey::SelectedSection => DEFAULT_SECTION,
            PreferenceKey::PageSize => DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = PreferenceKey::ALL.iter().map(|k| k.as_str()).collect();
                Error::Config(format!(
                    "Unknown preference key '{}'. Known keys: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
