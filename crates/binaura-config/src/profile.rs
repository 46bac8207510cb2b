//! Named spatializer presets ("profiles") on disk.
//!
//! A [`SpatialProfile`] is the serde-facing mirror of
//! [`SpatialSettings`](binaura_core::SpatialSettings): plain fields, no
//! invariants. Conversion into real settings goes through the clamping
//! setters, so a hand-edited file with `gain = 900` loads as the clamped
//! 15 dB rather than smuggling an out-of-range value into the engine.

use std::path::Path;

use binaura_core::{ReverbKind, SpatialSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named, file-backed spatializer preset.
///
/// Field meanings and units match [`SpatialSettings`]; `reverb_type` is
/// the wire id (0 omni, 1 flat, 2 first-order, 3 second-order), saturated
/// into range on conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialProfile {
    /// Display name of the preset.
    pub name: String,
    /// Wet/dry mix in percent.
    pub wet: f32,
    /// Output gain in dB.
    pub gain: f32,
    /// HRTF set id in \[0, 1\].
    pub hrtf_id: f32,
    /// Whether the custom head circumference is honored.
    pub use_custom_circumference: bool,
    /// Head circumference in cm.
    pub head_circumference: f32,
    /// Crossfade responsiveness in \[0, 1\].
    pub responsiveness: f32,
    /// Bypass the binaural HRIR stage.
    pub bypass_binaural: bool,
    /// Bypass parallax correction.
    pub bypass_parallax: bool,
    /// Bypass head-shadow filtering.
    pub bypass_shadow: bool,
    /// Bypass micro oscillations.
    pub bypass_micro_oscillation: bool,
    /// Minimum attenuation distance in meters.
    pub min_attenuation: f32,
    /// Maximum attenuation distance in meters.
    pub max_attenuation: f32,
    /// Distance attenuation exponent.
    pub attenuation_exponent: f32,
    /// Bypass distance attenuation.
    pub bypass_attenuation: bool,
    /// Room id in \[0, 1\].
    pub room_id: f32,
    /// Reverb mode wire id, 0 through 3.
    pub reverb_type: u8,
    /// Reverb send gain in dB.
    pub reverb_gain: f32,
    /// Reverb EQ low band in dB.
    pub reverb_eq_low: f32,
    /// Reverb EQ mid band in dB.
    pub reverb_eq_mid: f32,
    /// Reverb EQ high band in dB.
    pub reverb_eq_high: f32,
    /// Bypass reverb entirely.
    pub bypass_reverb: bool,
}

impl Default for SpatialProfile {
    fn default() -> Self {
        Self::from_settings("default", &SpatialSettings::default())
    }
}

impl SpatialProfile {
    /// Captures a profile from live settings.
    ///
    /// The per-tick position triple (azimuth, elevation, distance) is
    /// deliberately not part of a profile; it belongs to the frame, not
    /// the preset.
    pub fn from_settings(name: impl Into<String>, settings: &SpatialSettings) -> Self {
        let (eq_low, eq_mid, eq_high) = settings.reverb_eq();
        Self {
            name: name.into(),
            wet: settings.wet(),
            gain: settings.gain(),
            hrtf_id: settings.hrtf_id(),
            use_custom_circumference: settings.use_custom_circumference(),
            head_circumference: settings.head_circumference(),
            responsiveness: settings.responsiveness(),
            bypass_binaural: settings.bypass_binaural(),
            bypass_parallax: settings.bypass_parallax(),
            bypass_shadow: settings.bypass_shadow(),
            bypass_micro_oscillation: settings.bypass_micro_oscillation(),
            min_attenuation: settings.min_attenuation(),
            max_attenuation: settings.max_attenuation(),
            attenuation_exponent: settings.attenuation_exponent(),
            bypass_attenuation: settings.bypass_attenuation(),
            room_id: settings.room_id(),
            reverb_type: settings.reverb_kind().as_f32() as u8,
            reverb_gain: settings.reverb_gain(),
            reverb_eq_low: eq_low,
            reverb_eq_mid: eq_mid,
            reverb_eq_high: eq_high,
            bypass_reverb: settings.bypass_reverb(),
        }
    }

    /// Converts the profile into settings, clamping every value.
    ///
    /// Runs through the real setters, so file values outside a parameter's
    /// scale land clamped and the attenuation ordering invariant holds.
    pub fn to_settings(&self) -> SpatialSettings {
        let mut settings = SpatialSettings::default();
        settings.set_wet(self.wet);
        settings.set_gain(self.gain);
        settings.set_hrtf_id(self.hrtf_id);
        settings.set_use_custom_circumference(self.use_custom_circumference);
        settings.set_head_circumference(self.head_circumference);
        settings.set_responsiveness(self.responsiveness);
        settings.set_bypass_binaural(self.bypass_binaural);
        settings.set_bypass_parallax(self.bypass_parallax);
        settings.set_bypass_shadow(self.bypass_shadow);
        settings.set_bypass_micro_oscillation(self.bypass_micro_oscillation);
        // Max before min: setting min first against the default max (10)
        // would let a low max then clamp it back down.
        settings.set_max_attenuation(self.max_attenuation);
        settings.set_min_attenuation(self.min_attenuation);
        settings.set_attenuation_exponent(self.attenuation_exponent);
        settings.set_bypass_attenuation(self.bypass_attenuation);
        settings.set_room_id(self.room_id);
        settings.set_reverb_kind(ReverbKind::from_f32(f32::from(self.reverb_type)));
        settings.set_reverb_gain(self.reverb_gain);
        settings.set_reverb_eq(self.reverb_eq_low, self.reverb_eq_mid, self.reverb_eq_high);
        settings.set_bypass_reverb(self.bypass_reverb);
        settings
    }

    /// Loads a profile from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Writes the profile to a TOML file.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_default_settings() {
        let profile = SpatialProfile::default();
        assert_eq!(profile.to_settings(), SpatialSettings::default());
    }

    #[test]
    fn settings_round_trip_through_profile() {
        let mut settings = SpatialSettings::default();
        settings.set_wet(42.0);
        settings.set_gain(-12.0);
        settings.set_reverb_kind(ReverbKind::ThreeDFirst);
        settings.set_min_attenuation(0.5);
        settings.set_max_attenuation(4.0);
        settings.set_bypass_shadow(true);

        let profile = SpatialProfile::from_settings("test", &settings);
        assert_eq!(profile.to_settings(), settings);
    }

    #[test]
    fn out_of_range_file_values_load_clamped() {
        let profile = SpatialProfile {
            gain: 900.0,
            head_circumference: -5.0,
            reverb_type: 200,
            ..SpatialProfile::default()
        };
        let settings = profile.to_settings();
        assert_eq!(settings.gain(), 15.0);
        assert_eq!(settings.head_circumference(), 20.0);
        assert_eq!(settings.reverb_kind(), ReverbKind::ThreeDSecond);
    }

    #[test]
    fn attenuation_pair_from_file_keeps_ordering() {
        let profile = SpatialProfile {
            min_attenuation: 6.0,
            max_attenuation: 2.0,
            ..SpatialProfile::default()
        };
        let settings = profile.to_settings();
        assert!(settings.min_attenuation() <= settings.max_attenuation());
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("near-field.toml");

        let profile = SpatialProfile {
            name: "near-field".to_string(),
            wet: 80.0,
            responsiveness: 0.1,
            ..SpatialProfile::default()
        };
        profile.save_to_path(&path).unwrap();
        let back = SpatialProfile::load_from_path(&path).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let profile: SpatialProfile =
            toml::from_str("name = \"sparse\"\nwet = 10.0\n").unwrap();
        assert_eq!(profile.name, "sparse");
        assert_eq!(profile.wet, 10.0);
        assert_eq!(profile.head_circumference, 57.5);
    }
}
