//! Binaura Engine - pooled bus lending and positional routing
//!
//! This crate decides, for every spatialized sound emitter on every frame,
//! whether its audio flows through a processed (spatialized) path or a raw
//! fallback path, and manages the scarce mixer buses the processed path
//! needs.
//!
//! # Components
//!
//! - [`BusPool`] - lends and reclaims spatializer buses, at most
//!   `capacity` alive at once, LIFO so recently configured instances stay
//!   warm; self-heals when the mixer is mutated behind its back
//! - [`EmitterRouter`] - one per emitter; borrows a bus on play, recomputes
//!   the polar position each tick, flips output routing between the
//!   processed and fallback paths, returns the bus on stop
//! - [`DspHost`] - availability gate around the external spatializer
//!   library (global kill-switch, warn-once degradation)
//! - [`Spatializer`] - binds an emitter's settings object to the processor
//!   instance it currently holds
//! - [`AudioContext`] - owns mixer + host + pool; injected into every
//!   router call
//! - [`MixerGraph`] / [`StreamPlayer`] - traits the host engine implements
//!
//! # Threading Model
//!
//! Everything here runs on the host's main simulation thread, driven by a
//! per-frame tick. The DSP's own processing happens on the engine's audio
//! thread, but the engine already serializes audio-thread parameter reads
//! against main-thread writes, so this crate holds shared state in
//! `Rc<RefCell<..>>` and introduces no locking. The types are deliberately
//! not `Send`; a multi-threaded port would need mutual exclusion around
//! every [`BusPool`] operation.
//!
//! # Failure Philosophy
//!
//! Nothing in this crate panics or propagates hard errors at runtime. Pool
//! exhaustion, a missing spatializer library, a bus deleted out-of-band,
//! a malformed emitter: each degrades (fall back, disable, rebuild,
//! self-remove) with a warning where a human should hear about it.

mod context;
mod host;
mod mixer;
mod player;
mod pool;
mod router;
mod spatializer;

#[cfg(test)]
mod testutil;

pub use context::AudioContext;
pub use host::DspHost;
pub use mixer::MixerGraph;
pub use player::{PlayerKind, StreamId, StreamPlayer};
pub use pool::{BorrowedBus, BusPool, POOL_BUS_NAME, SILENT_BUS_NAME};
pub use router::{DEFAULT_MAX_RANGE, EmitterRouter, Forcing, Lifecycle};
pub use spatializer::Spatializer;

// The protocol types callers need alongside the engine.
pub use binaura_config::SubsystemConfig;
pub use binaura_core::{
    Param, PolarPosition, ProcessorInstance, ProcessorLibrary, Quat, ReverbKind, SharedProcessor,
    SpatialSettings, Transform, Vec3,
};
