//! Light/dark presentation preference, persisted under a single storage key.
//! Nothing here reads or writes form or solve state.

use serde::{Deserialize, Serialize};

pub const THEME_STORAGE_KEY: &str = "dsolve.theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemePreference::Light => "Dark mode",
            ThemePreference::Dark => "Light mode",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemePreference::Light => egui::Visuals::light(),
            ThemePreference::Dark => egui::Visuals::dark(),
        }
    }

    pub fn load(stored: Option<&str>) -> Self {
        stored
            .and_then(|text| serde_json::from_str::<ThemePreference>(text).ok())
            .unwrap_or_default()
    }

    pub fn serialized(self) -> Option<String> {
        serde_json::to_string(&self).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_storage_text() {
        let stored = ThemePreference::Dark.serialized().expect("serialize");
        assert_eq!(stored, "\"dark\"");
        assert_eq!(ThemePreference::load(Some(&stored)), ThemePreference::Dark);
    }

    #[test]
    fn unreadable_or_missing_preference_is_light() {
        assert_eq!(ThemePreference::load(None), ThemePreference::Light);
        assert_eq!(
            ThemePreference::load(Some("{not json")),
            ThemePreference::Light
        );
    }

    #[test]
    fn toggling_flips_between_two_presets() {
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(
            ThemePreference::Light.toggled().toggled(),
            ThemePreference::Light
        );
    }
}
