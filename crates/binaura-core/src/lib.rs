//! Binaura Core - spatializer protocol and routing math
//!
//! This crate holds everything the binaura engine shares with the external
//! spatializer effect: the indexed parameter protocol, the settings snapshot
//! that rides along with each sound emitter, the listener-relative polar
//! math, and the contract the external processing library is consumed
//! through.
//!
//! # Core Abstractions
//!
//! ## Parameter Protocol
//!
//! The external spatializer exposes one indexed float parameter per setting,
//! normalized to \[0, 1\] on the wire with a fixed external scale per index:
//!
//! - [`Param`] - every user-facing setting, as a field-less enum
//! - [`ParamSpec`] - wire index plus external \[min, max\] scale
//! - [`RESERVED_DEFAULTS`] - non-surfaced indices pinned at reset
//!
//! ## Settings
//!
//! - [`SpatialSettings`] - a pure parameter snapshot with clamped setters
//! - [`ReverbKind`] - the spatializer's reverb rendering mode
//!
//! ## Spatial Math
//!
//! - [`polar_position`] - listener-relative (azimuth, elevation, distance)
//! - [`Vec3`], [`Quat`], [`Transform`] - the minimal value types it needs
//!
//! ## Processor Contract
//!
//! - [`ProcessorLibrary`] / [`ProcessorInstance`] - the external DSP,
//!   consumed through creation, reset, block processing, and indexed
//!   parameter access; never reimplemented here
//! - [`push_param`] / [`push_snapshot`] - spec-driven normalization on the
//!   way into a processor
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! binaura-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Pure data here, side effects in the engine**: setting a
//!   [`SpatialSettings`] never touches a processor; the engine's binding
//!   layer decides when values are pushed.
//! - **No cached indices**: everything that refers to a mixer bus does so
//!   by name; this crate never sees a bus index.
//! - **Single-threaded cooperative**: shared processor handles use `Rc`,
//!   matching the host engine's serialized main-thread model.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod param;
pub mod processor;
pub mod settings;
pub mod spatial;

pub use param::{Param, ParamKind, ParamSpec, RESERVED_DEFAULTS, wrap_azimuth};
pub use processor::{
    DspError, LibraryDescriptor, MAX_PROCESS_FRAMES, ProcessorInstance, ProcessorLibrary,
    SharedProcessor, apply_reserved_defaults, push_param, push_snapshot,
};
pub use settings::{ReverbKind, SpatialSettings};
pub use spatial::{DISTANCE_EPSILON, PolarPosition, Quat, Transform, Vec3, polar_position};
