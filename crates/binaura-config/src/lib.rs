//! Binaura Config - subsystem configuration and spatial profiles
//!
//! TOML-backed configuration for the binaura audio subsystem:
//!
//! - [`SubsystemConfig`] - pool capacity, prewarm count, stream parameters,
//!   and the processed-path enable switch; validated before use
//! - [`SpatialProfile`] - named spatializer presets that convert into
//!   [`SpatialSettings`](binaura_core::SpatialSettings) through the
//!   clamping setters, so file values can never bypass parameter scales
//! - [`ConfigError`] - what can go wrong, with full source chains
//!
//! Configuration is the only thing this workspace ever touches on disk.
//! Pool and session state is in-memory by design and rebuilt on load.
//!
//! # Example
//!
//! ```rust,no_run
//! use binaura_config::{SpatialProfile, SubsystemConfig};
//!
//! let config = SubsystemConfig::load_from_path("audio.toml")?;
//! let profile = SpatialProfile::load_from_path("profiles/near-field.toml")?;
//! let settings = profile.to_settings();
//! # Ok::<(), binaura_config::ConfigError>(())
//! ```

mod error;
mod profile;
mod subsystem;

pub use error::ConfigError;
pub use profile::SpatialProfile;
pub use subsystem::SubsystemConfig;
