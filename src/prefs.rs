//! UI preference flags and the pure "derive visuals" step.
//!
//! `UiPreferences` is the single source of truth for the five page toggles.
//! `Visuals::derive` turns a snapshot into the exact class / style values the
//! DOM runtime writes; it never touches the document itself so it can be
//! tested natively.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::PageConfig;

/// Known preference keys, spelled the way `data-toggle` attributes spell them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    DarkMode,
    Animations,
    ThreeD,
    Glass,
    Particles,
}

impl PrefKey {
    pub const ALL: [PrefKey; 5] = [
        PrefKey::DarkMode,
        PrefKey::Animations,
        PrefKey::ThreeD,
        PrefKey::Glass,
        PrefKey::Particles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::DarkMode => "darkMode",
            PrefKey::Animations => "animations",
            PrefKey::ThreeD => "threeD",
            PrefKey::Glass => "glass",
            PrefKey::Particles => "particles",
        }
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPrefKey(pub String);

impl FromStr for PrefKey {
    type Err = UnknownPrefKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrefKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownPrefKey(s.to_string()))
    }
}

/// Snapshot of every toggle. Keys without a visual rule live in `extra`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct UiPreferences {
    pub dark_mode: bool,
    pub animations: bool,
    pub three_d: bool,
    pub glass: bool,
    pub particles: bool,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extra: BTreeMap<String, bool>,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            animations: true,
            three_d: true,
            glass: true,
            particles: true,
            extra: BTreeMap::new(),
        }
    }
}

impl UiPreferences {
    pub fn flag(&self, key: PrefKey) -> bool {
        match key {
            PrefKey::DarkMode => self.dark_mode,
            PrefKey::Animations => self.animations,
            PrefKey::ThreeD => self.three_d,
            PrefKey::Glass => self.glass,
            PrefKey::Particles => self.particles,
        }
    }

    pub fn set_flag(&mut self, key: PrefKey, value: bool) {
        let slot = match key {
            PrefKey::DarkMode => &mut self.dark_mode,
            PrefKey::Animations => &mut self.animations,
            PrefKey::ThreeD => &mut self.three_d,
            PrefKey::Glass => &mut self.glass,
            PrefKey::Particles => &mut self.particles,
        };
        *slot = value;
    }

    /// Lookup by attribute name. Keys never set read as `false`.
    pub fn get(&self, key: &str) -> bool {
        match key.parse::<PrefKey>() {
            Ok(k) => self.flag(k),
            Err(_) => self.extra.get(key).copied().unwrap_or(false),
        }
    }

    /// Store by attribute name. Returns the known key, if any.
    pub fn set(&mut self, key: &str, value: bool) -> Option<PrefKey> {
        match key.parse::<PrefKey>() {
            Ok(k) => {
                self.set_flag(k, value);
                Some(k)
            }
            Err(_) => {
                self.extra.insert(key.to_string(), value);
                None
            }
        }
    }
}

/// Inline style applied to every glass panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelStyle {
    pub backdrop_filter: String,
    pub background: String,
}

/// Everything `sync_ui_from_state` writes, derived from one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visuals {
    /// `light` class on the body.
    pub light: bool,
    /// `three-d-enabled` class on the body.
    pub three_d_enabled: bool,
    /// `animations-off` class on the body.
    pub animations_off: bool,
    /// Value of `--anim-duration` on the root element.
    pub anim_duration: String,
    pub panel: PanelStyle,
}

pub const CLASS_LIGHT: &str = "light";
pub const CLASS_THREE_D: &str = "three-d-enabled";
pub const CLASS_ANIMATIONS_OFF: &str = "animations-off";
pub const ANIM_DURATION_PROPERTY: &str = "--anim-duration";

impl Visuals {
    pub fn derive(prefs: &UiPreferences, config: &PageConfig) -> Self {
        let panel = if prefs.glass {
            PanelStyle {
                backdrop_filter: config.glass_blur.clone(),
                background: config.glass_background.clone(),
            }
        } else {
            PanelStyle {
                backdrop_filter: "none".to_string(),
                background: config.solid_background.clone(),
            }
        };
        Self {
            light: !prefs.dark_mode,
            three_d_enabled: prefs.three_d,
            animations_off: !prefs.animations,
            anim_duration: if prefs.animations {
                config.anim_duration.clone()
            } else {
                "0s".to_string()
            },
            panel,
        }
    }

    /// `(class, present)` pairs for the body element.
    pub fn body_classes(&self) -> [(&'static str, bool); 3] {
        [
            (CLASS_LIGHT, self.light),
            (CLASS_THREE_D, self.three_d_enabled),
            (CLASS_ANIMATIONS_OFF, self.animations_off),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_attribute_names() {
        for key in PrefKey::ALL {
            assert_eq!(key.as_str().parse::<PrefKey>(), Ok(key));
        }
        assert!("sparkles".parse::<PrefKey>().is_err());
    }

    #[test]
    fn unknown_keys_are_stored_but_not_visual() {
        let config = PageConfig::default();
        let mut prefs = UiPreferences::default();
        let before = Visuals::derive(&prefs, &config);
        assert_eq!(prefs.set("sparkles", true), None);
        assert!(prefs.get("sparkles"));
        assert!(!prefs.get("neverSet"));
        assert_eq!(Visuals::derive(&prefs, &config), before);
    }

    #[test]
    fn defaults_are_dark_3d_glass_animated() {
        let v = Visuals::derive(&UiPreferences::default(), &PageConfig::default());
        assert!(!v.light);
        assert!(v.three_d_enabled);
        assert!(!v.animations_off);
        assert_eq!(v.anim_duration, "0.55s");
        assert_eq!(v.panel.backdrop_filter, "blur(15px)");
        assert_eq!(v.panel.background, "var(--surface)");
    }

    #[test]
    fn everything_off_derives_static_light_page() {
        let mut prefs = UiPreferences::default();
        for key in PrefKey::ALL {
            prefs.set_flag(key, false);
        }
        let v = Visuals::derive(&prefs, &PageConfig::default());
        assert!(v.light);
        assert!(!v.three_d_enabled);
        assert!(v.animations_off);
        assert_eq!(v.anim_duration, "0s");
        assert_eq!(v.panel.backdrop_filter, "none");
        assert_eq!(v.panel.background, "rgba(30, 41, 59, 0.85)");
        assert_eq!(
            v.body_classes(),
            [(CLASS_LIGHT, true), (CLASS_THREE_D, false), (CLASS_ANIMATIONS_OFF, true)]
        );
    }
}
