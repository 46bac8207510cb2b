//! The spatializer settings snapshot carried by each sound emitter.
//!
//! [`SpatialSettings`] is pure data: every setter clamps to the parameter's
//! external scale and nothing here talks to a processor. The engine's
//! binding layer decides when a snapshot (or a single changed value) is
//! pushed to a live instance, which keeps "configure an emitter that is not
//! playing" free of side effects.
//!
//! Defaults match the external plugin's own defaults, so a freshly
//! constructed settings object sounds identical to an untouched instance.

use crate::param::{Param, wrap_azimuth};

/// Reverb rendering mode of the external spatializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbKind {
    /// Non-directional reverb.
    Omni,
    /// Flat panned reverb.
    #[default]
    TwoD,
    /// First-order spatialized reverb.
    ThreeDFirst,
    /// Second-order spatialized reverb.
    ThreeDSecond,
}

impl ReverbKind {
    /// Wire value for this mode.
    pub const fn as_f32(self) -> f32 {
        match self {
            ReverbKind::Omni => 0.0,
            ReverbKind::TwoD => 1.0,
            ReverbKind::ThreeDFirst => 2.0,
            ReverbKind::ThreeDSecond => 3.0,
        }
    }

    /// Nearest mode for a wire value; out-of-range input saturates.
    pub fn from_f32(value: f32) -> Self {
        if value < 0.5 {
            ReverbKind::Omni
        } else if value < 1.5 {
            ReverbKind::TwoD
        } else if value < 2.5 {
            ReverbKind::ThreeDFirst
        } else {
            ReverbKind::ThreeDSecond
        }
    }
}

/// A complete spatializer parameter snapshot.
///
/// Invariants maintained by the setters:
///
/// - every float field stays inside its [`ParamSpec`](crate::ParamSpec)
///   scale,
/// - `min_attenuation <= max_attenuation` (raising one past the other drags
///   the other along),
/// - `azimuth` is wrapped into the canonical window before clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialSettings {
    wet: f32,
    gain: f32,
    hrtf_id: f32,
    use_custom_circumference: bool,
    head_circumference: f32,
    responsiveness: f32,
    bypass_binaural: bool,
    bypass_parallax: bool,
    bypass_shadow: bool,
    bypass_micro_oscillation: bool,
    min_attenuation: f32,
    max_attenuation: f32,
    attenuation_exponent: f32,
    bypass_attenuation: bool,
    room_id: f32,
    reverb_kind: ReverbKind,
    reverb_gain: f32,
    reverb_eq_low: f32,
    reverb_eq_mid: f32,
    reverb_eq_high: f32,
    bypass_reverb: bool,
    azimuth: f32,
    elevation: f32,
    distance: f32,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        // The external plugin's own defaults, kept here so an emitter with
        // untouched settings sounds identical to an untouched instance.
        Self {
            wet: 100.0,
            gain: 0.0,
            hrtf_id: 0.0,
            use_custom_circumference: false,
            head_circumference: 57.5,
            responsiveness: 0.04,
            bypass_binaural: false,
            bypass_parallax: false,
            bypass_shadow: false,
            bypass_micro_oscillation: false,
            min_attenuation: 0.1,
            max_attenuation: 10.0,
            attenuation_exponent: 1.0,
            bypass_attenuation: false,
            room_id: 0.5,
            reverb_kind: ReverbKind::TwoD,
            reverb_gain: 0.0,
            reverb_eq_low: 0.0,
            reverb_eq_mid: 0.0,
            reverb_eq_high: 0.0,
            bypass_reverb: false,
            azimuth: 0.0,
            elevation: 0.0,
            distance: 0.3,
        }
    }
}

impl SpatialSettings {
    /// Sets a parameter from its plain value, clamping to the external
    /// scale. Toggles treat any nonzero value as `true`.
    pub fn set(&mut self, param: Param, value: f32) {
        let spec = param.spec();
        match param {
            Param::Wet => self.wet = spec.clamp(value),
            Param::Gain => self.gain = spec.clamp(value),
            Param::HrtfId => self.hrtf_id = spec.clamp(value),
            Param::UseCustomCircumference => self.use_custom_circumference = value != 0.0,
            Param::HeadCircumference => self.head_circumference = spec.clamp(value),
            Param::Responsiveness => self.responsiveness = spec.clamp(value),
            Param::BypassBinaural => self.bypass_binaural = value != 0.0,
            Param::BypassParallax => self.bypass_parallax = value != 0.0,
            Param::BypassShadow => self.bypass_shadow = value != 0.0,
            Param::BypassMicroOscillation => self.bypass_micro_oscillation = value != 0.0,
            Param::MinAttenuation => {
                self.min_attenuation = spec.clamp(value);
                if self.max_attenuation < self.min_attenuation {
                    self.max_attenuation = self.min_attenuation;
                }
            }
            Param::MaxAttenuation => {
                self.max_attenuation = spec.clamp(value);
                if self.min_attenuation > self.max_attenuation {
                    self.min_attenuation = self.max_attenuation;
                }
            }
            Param::AttenuationExponent => self.attenuation_exponent = spec.clamp(value),
            Param::BypassAttenuation => self.bypass_attenuation = value != 0.0,
            Param::RoomId => self.room_id = spec.clamp(value),
            Param::ReverbType => self.reverb_kind = ReverbKind::from_f32(value),
            Param::ReverbGain => self.reverb_gain = spec.clamp(value),
            Param::ReverbEqLow => self.reverb_eq_low = spec.clamp(value),
            Param::ReverbEqMid => self.reverb_eq_mid = spec.clamp(value),
            Param::ReverbEqHigh => self.reverb_eq_high = spec.clamp(value),
            Param::BypassReverb => self.bypass_reverb = value != 0.0,
            Param::Azimuth => self.azimuth = wrap_azimuth(value),
            Param::Elevation => self.elevation = spec.clamp(value),
            Param::Distance => self.distance = spec.clamp(value),
        }
    }

    /// Returns a parameter's plain value. Toggles read as 0.0 or 1.0.
    pub fn get(&self, param: Param) -> f32 {
        fn flag(value: bool) -> f32 {
            if value { 1.0 } else { 0.0 }
        }
        match param {
            Param::Wet => self.wet,
            Param::Gain => self.gain,
            Param::HrtfId => self.hrtf_id,
            Param::UseCustomCircumference => flag(self.use_custom_circumference),
            Param::HeadCircumference => self.head_circumference,
            Param::Responsiveness => self.responsiveness,
            Param::BypassBinaural => flag(self.bypass_binaural),
            Param::BypassParallax => flag(self.bypass_parallax),
            Param::BypassShadow => flag(self.bypass_shadow),
            Param::BypassMicroOscillation => flag(self.bypass_micro_oscillation),
            Param::MinAttenuation => self.min_attenuation,
            Param::MaxAttenuation => self.max_attenuation,
            Param::AttenuationExponent => self.attenuation_exponent,
            Param::BypassAttenuation => flag(self.bypass_attenuation),
            Param::RoomId => self.room_id,
            Param::ReverbType => self.reverb_kind.as_f32(),
            Param::ReverbGain => self.reverb_gain,
            Param::ReverbEqLow => self.reverb_eq_low,
            Param::ReverbEqMid => self.reverb_eq_mid,
            Param::ReverbEqHigh => self.reverb_eq_high,
            Param::BypassReverb => flag(self.bypass_reverb),
            Param::Azimuth => self.azimuth,
            Param::Elevation => self.elevation,
            Param::Distance => self.distance,
        }
    }

    // Typed accessors. These exist for call-site readability; they all go
    // through the same clamping logic as `set`/`get`.

    /// Wet/dry mix in percent, clamped to \[0, 100\].
    pub fn set_wet(&mut self, percent: f32) {
        self.set(Param::Wet, percent);
    }

    /// Wet/dry mix in percent.
    pub fn wet(&self) -> f32 {
        self.wet
    }

    /// Output gain in dB, clamped to \[-40, 15\].
    pub fn set_gain(&mut self, db: f32) {
        self.set(Param::Gain, db);
    }

    /// Output gain in dB.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// HRTF set id, clamped to \[0, 1\].
    pub fn set_hrtf_id(&mut self, id: f32) {
        self.set(Param::HrtfId, id);
    }

    /// HRTF set id.
    pub fn hrtf_id(&self) -> f32 {
        self.hrtf_id
    }

    /// Whether the custom head circumference is honored.
    pub fn set_use_custom_circumference(&mut self, use_custom: bool) {
        self.use_custom_circumference = use_custom;
    }

    /// Whether the custom head circumference is honored.
    pub fn use_custom_circumference(&self) -> bool {
        self.use_custom_circumference
    }

    /// Head circumference in cm, clamped to \[20, 80\].
    pub fn set_head_circumference(&mut self, cm: f32) {
        self.set(Param::HeadCircumference, cm);
    }

    /// Head circumference in cm.
    pub fn head_circumference(&self) -> f32 {
        self.head_circumference
    }

    /// Crossfade responsiveness, clamped to \[0, 1\].
    pub fn set_responsiveness(&mut self, amount: f32) {
        self.set(Param::Responsiveness, amount);
    }

    /// Crossfade responsiveness.
    pub fn responsiveness(&self) -> f32 {
        self.responsiveness
    }

    /// Bypass the binaural HRIR stage.
    pub fn set_bypass_binaural(&mut self, bypass: bool) {
        self.bypass_binaural = bypass;
    }

    /// Whether the binaural HRIR stage is bypassed.
    pub fn bypass_binaural(&self) -> bool {
        self.bypass_binaural
    }

    /// Bypass parallax correction.
    pub fn set_bypass_parallax(&mut self, bypass: bool) {
        self.bypass_parallax = bypass;
    }

    /// Whether parallax correction is bypassed.
    pub fn bypass_parallax(&self) -> bool {
        self.bypass_parallax
    }

    /// Bypass head-shadow filtering.
    pub fn set_bypass_shadow(&mut self, bypass: bool) {
        self.bypass_shadow = bypass;
    }

    /// Whether head-shadow filtering is bypassed.
    pub fn bypass_shadow(&self) -> bool {
        self.bypass_shadow
    }

    /// Bypass micro oscillations.
    pub fn set_bypass_micro_oscillation(&mut self, bypass: bool) {
        self.bypass_micro_oscillation = bypass;
    }

    /// Whether micro oscillations are bypassed.
    pub fn bypass_micro_oscillation(&self) -> bool {
        self.bypass_micro_oscillation
    }

    /// Minimum attenuation distance in meters, clamped to \[0.1, 10\].
    /// Raising it above the current maximum raises the maximum to match.
    pub fn set_min_attenuation(&mut self, meters: f32) {
        self.set(Param::MinAttenuation, meters);
    }

    /// Minimum attenuation distance in meters.
    pub fn min_attenuation(&self) -> f32 {
        self.min_attenuation
    }

    /// Maximum attenuation distance in meters, clamped to \[0.1, 10\].
    /// Lowering it below the current minimum lowers the minimum to match.
    pub fn set_max_attenuation(&mut self, meters: f32) {
        self.set(Param::MaxAttenuation, meters);
    }

    /// Maximum attenuation distance in meters.
    pub fn max_attenuation(&self) -> f32 {
        self.max_attenuation
    }

    /// Distance attenuation exponent, clamped to \[0, 2\].
    pub fn set_attenuation_exponent(&mut self, exponent: f32) {
        self.set(Param::AttenuationExponent, exponent);
    }

    /// Distance attenuation exponent.
    pub fn attenuation_exponent(&self) -> f32 {
        self.attenuation_exponent
    }

    /// Bypass distance attenuation.
    pub fn set_bypass_attenuation(&mut self, bypass: bool) {
        self.bypass_attenuation = bypass;
    }

    /// Whether distance attenuation is bypassed.
    pub fn bypass_attenuation(&self) -> bool {
        self.bypass_attenuation
    }

    /// Room id, clamped to \[0, 1\].
    pub fn set_room_id(&mut self, id: f32) {
        self.set(Param::RoomId, id);
    }

    /// Room id.
    pub fn room_id(&self) -> f32 {
        self.room_id
    }

    /// Reverb rendering mode.
    pub fn set_reverb_kind(&mut self, kind: ReverbKind) {
        self.reverb_kind = kind;
    }

    /// Reverb rendering mode.
    pub fn reverb_kind(&self) -> ReverbKind {
        self.reverb_kind
    }

    /// Reverb send gain in dB, clamped to \[-40, 15\].
    pub fn set_reverb_gain(&mut self, db: f32) {
        self.set(Param::ReverbGain, db);
    }

    /// Reverb send gain in dB.
    pub fn reverb_gain(&self) -> f32 {
        self.reverb_gain
    }

    /// Reverb EQ bands (low, mid, high) in dB, each clamped to \[-40, 15\].
    pub fn set_reverb_eq(&mut self, low: f32, mid: f32, high: f32) {
        self.set(Param::ReverbEqLow, low);
        self.set(Param::ReverbEqMid, mid);
        self.set(Param::ReverbEqHigh, high);
    }

    /// Reverb EQ bands (low, mid, high) in dB.
    pub fn reverb_eq(&self) -> (f32, f32, f32) {
        (self.reverb_eq_low, self.reverb_eq_mid, self.reverb_eq_high)
    }

    /// Bypass reverb entirely.
    pub fn set_bypass_reverb(&mut self, bypass: bool) {
        self.bypass_reverb = bypass;
    }

    /// Whether reverb is bypassed.
    pub fn bypass_reverb(&self) -> bool {
        self.bypass_reverb
    }

    /// Source azimuth in degrees, wrapped into (-180, 180\].
    pub fn set_azimuth(&mut self, degrees: f32) {
        self.set(Param::Azimuth, degrees);
    }

    /// Source azimuth in degrees.
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Source elevation in degrees, clamped to \[-90, 90\].
    pub fn set_elevation(&mut self, degrees: f32) {
        self.set(Param::Elevation, degrees);
    }

    /// Source elevation in degrees.
    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Source distance in meters, clamped to \[0.1, 10\].
    pub fn set_distance(&mut self, meters: f32) {
        self.set(Param::Distance, meters);
    }

    /// Source distance in meters.
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_defaults() {
        let settings = SpatialSettings::default();
        assert_eq!(settings.wet(), 100.0);
        assert_eq!(settings.gain(), 0.0);
        assert_eq!(settings.head_circumference(), 57.5);
        assert_eq!(settings.min_attenuation(), 0.1);
        assert_eq!(settings.max_attenuation(), 10.0);
        assert_eq!(settings.reverb_kind(), ReverbKind::TwoD);
        assert_eq!(settings.distance(), 0.3);
    }

    #[test]
    fn setters_clamp_to_scale() {
        let mut settings = SpatialSettings::default();
        settings.set_gain(100.0);
        assert_eq!(settings.gain(), 15.0);
        settings.set_gain(-100.0);
        assert_eq!(settings.gain(), -40.0);
        settings.set_head_circumference(5.0);
        assert_eq!(settings.head_circumference(), 20.0);
    }

    #[test]
    fn raising_min_attenuation_drags_max_up() {
        let mut settings = SpatialSettings::default();
        settings.set_max_attenuation(2.0);
        settings.set_min_attenuation(5.0);
        assert_eq!(settings.min_attenuation(), 5.0);
        assert_eq!(settings.max_attenuation(), 5.0);
    }

    #[test]
    fn lowering_max_attenuation_drags_min_down() {
        let mut settings = SpatialSettings::default();
        settings.set_min_attenuation(4.0);
        settings.set_max_attenuation(1.0);
        assert_eq!(settings.max_attenuation(), 1.0);
        assert_eq!(settings.min_attenuation(), 1.0);
    }

    #[test]
    fn attenuation_round_trip_returns_clamped_value() {
        let mut settings = SpatialSettings::default();
        settings.set_min_attenuation(0.01);
        assert_eq!(settings.min_attenuation(), 0.1);
        settings.set_max_attenuation(50.0);
        assert_eq!(settings.max_attenuation(), 10.0);
    }

    #[test]
    fn azimuth_wraps_then_reads_back_wrapped() {
        let mut settings = SpatialSettings::default();
        settings.set_azimuth(200.0);
        assert_eq!(settings.azimuth(), -160.0);
        // Re-applying the read-back value is a no-op.
        let wrapped = settings.azimuth();
        settings.set_azimuth(wrapped);
        assert_eq!(settings.azimuth(), wrapped);
    }

    #[test]
    fn generic_and_typed_accessors_agree() {
        let mut settings = SpatialSettings::default();
        settings.set(Param::Responsiveness, 0.4);
        assert_eq!(settings.responsiveness(), 0.4);
        settings.set_bypass_reverb(true);
        assert_eq!(settings.get(Param::BypassReverb), 1.0);
    }

    #[test]
    fn toggle_set_treats_nonzero_as_true() {
        let mut settings = SpatialSettings::default();
        settings.set(Param::BypassShadow, 0.25);
        assert!(settings.bypass_shadow());
        settings.set(Param::BypassShadow, 0.0);
        assert!(!settings.bypass_shadow());
    }

    #[test]
    fn reverb_kind_round_trips_through_wire_value() {
        for kind in [
            ReverbKind::Omni,
            ReverbKind::TwoD,
            ReverbKind::ThreeDFirst,
            ReverbKind::ThreeDSecond,
        ] {
            assert_eq!(ReverbKind::from_f32(kind.as_f32()), kind);
        }
        // Out-of-range wire values saturate instead of wrapping.
        assert_eq!(ReverbKind::from_f32(-3.0), ReverbKind::Omni);
        assert_eq!(ReverbKind::from_f32(9.0), ReverbKind::ThreeDSecond);
    }
}
