//! The indexed parameter protocol shared with the external spatializer.
//!
//! Every user-facing setting maps to exactly one float parameter on the
//! external processor, addressed by a fixed numeric index and normalized to
//! \[0, 1\] on the wire. The external scale for each index never changes
//! (it is part of the plugin's ABI), so the whole protocol lives in one
//! `const` table: [`Param::spec`]. Engine code converts through
//! [`ParamSpec::normalize`] / [`ParamSpec::denormalize`] instead of carrying
//! one bespoke setter per parameter.
//!
//! A handful of indices exist on the wire but are not surfaced as settings;
//! [`RESERVED_DEFAULTS`] pins those to their lifetime-constant values
//! whenever an instance is reset.

use libm::fmodf;

/// How a parameter's plain value maps onto the wire's normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Plain value lives on an external `[min, max]` scale.
    Scaled,
    /// Plain value is already normalized; `[min, max]` is `[0, 1]`.
    Normalized,
    /// Boolean setting; `false` is 0.0 and `true` is 1.0 on the wire.
    Toggle,
}

/// Wire-level description of one spatializer parameter.
///
/// `index` addresses the parameter on the external processor. `min`/`max`
/// describe the external scale a plain value lives on before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Parameter index on the external processor.
    pub index: u32,
    /// Minimum plain value.
    pub min: f32,
    /// Maximum plain value.
    pub max: f32,
    /// Mapping between plain and normalized values.
    pub kind: ParamKind,
}

impl ParamSpec {
    const fn scaled(index: u32, min: f32, max: f32) -> Self {
        Self {
            index,
            min,
            max,
            kind: ParamKind::Scaled,
        }
    }

    const fn normalized(index: u32) -> Self {
        Self {
            index,
            min: 0.0,
            max: 1.0,
            kind: ParamKind::Normalized,
        }
    }

    const fn toggle(index: u32) -> Self {
        Self {
            index,
            min: 0.0,
            max: 1.0,
            kind: ParamKind::Toggle,
        }
    }

    /// Clamps a plain value to this parameter's external scale.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to the wire's normalized \[0, 1\] space.
    ///
    /// The input is clamped to the external scale first, so the result is
    /// always in \[0, 1\] even for out-of-range input.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }

    /// Converts a normalized wire value back to the external scale.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Every user-facing spatializer setting.
///
/// The numbering is sparse and historical; it is the external plugin's,
/// not ours, which is exactly why it lives behind this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Wet/dry mix, percent.
    Wet,
    /// Output gain, dB.
    Gain,
    /// Which built-in HRTF set to use, as a normalized id.
    HrtfId,
    /// Whether to honor [`Param::HeadCircumference`].
    UseCustomCircumference,
    /// Listener head circumference, cm.
    HeadCircumference,
    /// Crossfade responsiveness. Low values track movement tightly but may
    /// produce artifacts; high values are smooth but laggy.
    Responsiveness,
    /// Bypass the binaural HRIR stage.
    BypassBinaural,
    /// Bypass parallax correction.
    BypassParallax,
    /// Bypass head-shadow filtering.
    BypassShadow,
    /// Bypass micro oscillations.
    BypassMicroOscillation,
    /// Distance below which attenuation stops growing, meters.
    MinAttenuation,
    /// Distance above which attenuation stops growing, meters.
    MaxAttenuation,
    /// Distance attenuation exponent.
    AttenuationExponent,
    /// Bypass distance attenuation.
    BypassAttenuation,
    /// Room selection, as a normalized id.
    RoomId,
    /// Reverb rendering mode; see [`ReverbKind`](crate::ReverbKind).
    ReverbType,
    /// Reverb send gain, dB.
    ReverbGain,
    /// Reverb EQ low band, dB.
    ReverbEqLow,
    /// Reverb EQ mid band, dB.
    ReverbEqMid,
    /// Reverb EQ high band, dB.
    ReverbEqHigh,
    /// Bypass reverb entirely.
    BypassReverb,
    /// Source azimuth relative to the listener, degrees. 0 is straight
    /// ahead, 90 is to the right.
    Azimuth,
    /// Source elevation relative to the listener, degrees.
    Elevation,
    /// Source distance from the listener, meters.
    Distance,
}

impl Param {
    /// All parameters, in snapshot-push order.
    pub const ALL: [Param; 24] = [
        Param::Wet,
        Param::Gain,
        Param::HrtfId,
        Param::UseCustomCircumference,
        Param::HeadCircumference,
        Param::Responsiveness,
        Param::BypassBinaural,
        Param::BypassParallax,
        Param::BypassShadow,
        Param::BypassMicroOscillation,
        Param::MinAttenuation,
        Param::MaxAttenuation,
        Param::AttenuationExponent,
        Param::BypassAttenuation,
        Param::RoomId,
        Param::ReverbType,
        Param::ReverbGain,
        Param::ReverbEqLow,
        Param::ReverbEqMid,
        Param::ReverbEqHigh,
        Param::BypassReverb,
        Param::Azimuth,
        Param::Elevation,
        Param::Distance,
    ];

    /// The wire-level spec for this parameter.
    pub const fn spec(self) -> ParamSpec {
        match self {
            Param::Wet => ParamSpec::scaled(18, 0.0, 100.0),
            Param::Gain => ParamSpec::scaled(20, -40.0, 15.0),
            Param::HrtfId => ParamSpec::normalized(15),
            Param::UseCustomCircumference => ParamSpec::toggle(8),
            Param::HeadCircumference => ParamSpec::scaled(25, 20.0, 80.0),
            Param::Responsiveness => ParamSpec::normalized(32),
            Param::BypassBinaural => ParamSpec::toggle(4),
            Param::BypassParallax => ParamSpec::toggle(5),
            Param::BypassShadow => ParamSpec::toggle(1),
            Param::BypassMicroOscillation => ParamSpec::toggle(9),
            Param::MinAttenuation => ParamSpec::scaled(30, 0.1, 10.0),
            Param::MaxAttenuation => ParamSpec::scaled(31, 0.1, 10.0),
            Param::AttenuationExponent => ParamSpec::scaled(19, 0.0, 2.0),
            Param::BypassAttenuation => ParamSpec::toggle(3),
            Param::RoomId => ParamSpec::normalized(16),
            Param::ReverbType => ParamSpec::scaled(13, 0.0, 3.0),
            Param::ReverbGain => ParamSpec::scaled(21, -40.0, 15.0),
            Param::ReverbEqLow => ParamSpec::scaled(22, -40.0, 15.0),
            Param::ReverbEqMid => ParamSpec::scaled(23, -40.0, 15.0),
            Param::ReverbEqHigh => ParamSpec::scaled(24, -40.0, 15.0),
            Param::BypassReverb => ParamSpec::toggle(6),
            Param::Azimuth => ParamSpec::scaled(27, -180.0, 180.0),
            Param::Elevation => ParamSpec::scaled(26, -90.0, 90.0),
            Param::Distance => ParamSpec::scaled(28, 0.1, 10.0),
        }
    }

    /// Stable lowercase identifier, for logs and configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Param::Wet => "wet",
            Param::Gain => "gain",
            Param::HrtfId => "hrtf_id",
            Param::UseCustomCircumference => "use_custom_circumference",
            Param::HeadCircumference => "head_circumference",
            Param::Responsiveness => "responsiveness",
            Param::BypassBinaural => "bypass_binaural",
            Param::BypassParallax => "bypass_parallax",
            Param::BypassShadow => "bypass_shadow",
            Param::BypassMicroOscillation => "bypass_micro_oscillation",
            Param::MinAttenuation => "min_attenuation",
            Param::MaxAttenuation => "max_attenuation",
            Param::AttenuationExponent => "attenuation_exponent",
            Param::BypassAttenuation => "bypass_attenuation",
            Param::RoomId => "room_id",
            Param::ReverbType => "reverb_type",
            Param::ReverbGain => "reverb_gain",
            Param::ReverbEqLow => "reverb_eq_low",
            Param::ReverbEqMid => "reverb_eq_mid",
            Param::ReverbEqHigh => "reverb_eq_high",
            Param::BypassReverb => "bypass_reverb",
            Param::Azimuth => "azimuth",
            Param::Elevation => "elevation",
            Param::Distance => "distance",
        }
    }

    /// Whether this parameter is a boolean toggle.
    pub const fn is_toggle(self) -> bool {
        matches!(self.spec().kind, ParamKind::Toggle)
    }
}

/// Wire indices that are not surfaced as settings, with the normalized
/// values they are pinned to whenever an instance is reset.
///
/// These cover internal plugin features the routing layer never touches;
/// index 17 is the only one whose resting value is 1.0.
pub const RESERVED_DEFAULTS: &[(u32, f32)] = &[
    (0, 0.0),
    (2, 0.0),
    (7, 0.0),
    (10, 0.0),
    (11, 0.0),
    (12, 0.0),
    (14, 0.0),
    (17, 1.0),
    (29, 0.0),
];

/// Wraps an azimuth angle into the canonical (-180, 180\] window.
///
/// Wrapping happens via modulo before the final clamp, so `200.0` becomes
/// `-160.0` rather than saturating at `180.0`. The output is a fixed point:
/// wrapping an already-wrapped angle changes nothing.
pub fn wrap_azimuth(degrees: f32) -> f32 {
    (fmodf(degrees + 180.0, 360.0) - 180.0).clamp(-180.0, 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_normalize_maps_endpoints() {
        let spec = Param::Gain.spec();
        assert_eq!(spec.normalize(-40.0), 0.0);
        assert_eq!(spec.normalize(15.0), 1.0);
    }

    #[test]
    fn normalize_clamps_out_of_range_input() {
        let spec = Param::Wet.spec();
        assert_eq!(spec.normalize(-20.0), 0.0);
        assert_eq!(spec.normalize(250.0), 1.0);
    }

    #[test]
    fn denormalize_inverts_normalize() {
        let spec = Param::HeadCircumference.spec();
        let value = 57.5;
        let rt = spec.denormalize(spec.normalize(value));
        assert!((rt - value).abs() < 1e-4, "round-trip drifted: {rt}");
    }

    #[test]
    fn toggle_specs_span_unit_interval() {
        for param in Param::ALL {
            if param.is_toggle() {
                let spec = param.spec();
                assert_eq!(spec.min, 0.0, "{}", param.name());
                assert_eq!(spec.max, 1.0, "{}", param.name());
            }
        }
    }

    #[test]
    fn wire_indices_are_unique() {
        for (i, a) in Param::ALL.iter().enumerate() {
            for b in &Param::ALL[i + 1..] {
                assert_ne!(
                    a.spec().index,
                    b.spec().index,
                    "{} and {} share an index",
                    a.name(),
                    b.name()
                );
            }
        }
    }

    #[test]
    fn reserved_indices_do_not_collide_with_settings() {
        for &(index, _) in RESERVED_DEFAULTS {
            for param in Param::ALL {
                assert_ne!(param.spec().index, index, "{} is reserved", param.name());
            }
        }
    }

    #[test]
    fn wrap_azimuth_wraps_over_positive() {
        assert_eq!(wrap_azimuth(200.0), -160.0);
        assert_eq!(wrap_azimuth(360.0), 0.0);
    }

    #[test]
    fn wrap_azimuth_is_a_fixed_point() {
        for raw in [200.0, -200.0, 540.0, 0.0, 180.0, -180.0, 91.5] {
            let once = wrap_azimuth(raw);
            let twice = wrap_azimuth(once);
            assert_eq!(once, twice, "wrap({raw}) not idempotent");
        }
    }

    #[test]
    fn wrap_azimuth_keeps_in_range_values() {
        assert_eq!(wrap_azimuth(90.0), 90.0);
        assert_eq!(wrap_azimuth(-179.0), -179.0);
    }

    #[test]
    fn wrap_azimuth_maps_both_boundaries_to_negative() {
        // +180 and -180 describe the same direction; the modulo folds both
        // onto -180 so repeated wrapping cannot oscillate.
        assert_eq!(wrap_azimuth(180.0), -180.0);
        assert_eq!(wrap_azimuth(-180.0), -180.0);
    }
}
