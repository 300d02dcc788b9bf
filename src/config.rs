//! Page configuration: every tunable the controller reads.
//!
//! `PageConfig::default()` matches the page's built-in behaviour. With the
//! `serde_json` feature a partial JSON object may override any field; fields
//! left out keep their default.

use crate::prefs::UiPreferences;

/// CSS selectors for every element the controller touches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Selectors {
    pub nav_links: String,
    pub menu_toggle: String,
    pub toggles: String,
    pub skill_fills: String,
    pub glass_panels: String,
    pub hint_button: String,
    pub easter_egg: String,
    pub canvas: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            nav_links: ".nav-links".into(),
            menu_toggle: ".menu-toggle".into(),
            toggles: "[data-toggle]".into(),
            skill_fills: ".skill-fill".into(),
            glass_panels: ".glass-panel".into(),
            hint_button: "#surpriseHintBtn".into(),
            easter_egg: "#easterEgg".into(),
            canvas: "#bgCanvas".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PageConfig {
    /// Preference values at load.
    pub defaults: UiPreferences,

    // --- Particles ---
    pub particle_count: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    /// Per-axis velocity is drawn from `[-max_speed, max_speed)`.
    pub max_speed: f64,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub particle_rgb: [u8; 3],

    // --- Easter egg ---
    pub secret_word: String,
    pub hint_text: String,
    pub toast_ms: u32,

    // --- Skill bars ---
    /// Minimum intersection ratio that reveals a skill bar.
    pub reveal_threshold: f64,

    // --- Visual sync ---
    pub anim_duration: String,
    pub glass_blur: String,
    pub glass_background: String,
    pub solid_background: String,

    pub selectors: Selectors,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            defaults: UiPreferences::default(),
            particle_count: 90,
            radius_min: 0.8,
            radius_max: 3.2,
            max_speed: 0.175,
            alpha_min: 0.2,
            alpha_max: 0.9,
            particle_rgb: [56, 189, 248],
            secret_word: "learn".into(),
            hint_text: "Hint: Try typing a 5-letter word related to studying: L _ A _ N".into(),
            toast_ms: 2800,
            reveal_threshold: 0.5,
            anim_duration: "0.55s".into(),
            glass_blur: "blur(15px)".into(),
            glass_background: "var(--surface)".into(),
            solid_background: "rgba(30, 41, 59, 0.85)".into(),
            selectors: Selectors::default(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl PageConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::error::PageError> {
        serde_json::from_str(json).map_err(|e| crate::error::PageError::Config(e.to_string()))
    }
}

#[cfg(all(test, feature = "serde_json"))]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default_config() {
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = PageConfig::from_json(
            r#"{"particleCount": 12, "secretWord": "study", "defaults": {"particles": false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.particle_count, 12);
        assert_eq!(cfg.secret_word, "study");
        assert!(!cfg.defaults.particles);
        assert!(cfg.defaults.dark_mode);
        assert_eq!(cfg.toast_ms, 2800);
        assert_eq!(cfg.selectors.canvas, "#bgCanvas");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = PageConfig::from_json("{particleCount:").unwrap_err();
        assert!(matches!(err, crate::error::PageError::Config(_)));
    }
}
