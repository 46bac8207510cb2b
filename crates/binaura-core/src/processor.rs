//! The contract the external spatializer library is consumed through.
//!
//! The DSP itself is an opaque third-party unit; this module only fixes the
//! shape it is used through: create an instance per pooled bus, reset it,
//! feed it blocks of exactly the configured size, and talk to it through
//! indexed normalized parameters. Nothing in the workspace implements the
//! spatialization algorithm.
//!
//! Instances are shared between the mixer bus (which calls
//! [`ProcessorInstance::process`] from the audio path) and the emitter
//! router (which pushes parameter updates). Under the host engine's
//! single-threaded cooperative scheduling this is an `Rc<RefCell<..>>`; the
//! engine serializes audio-thread parameter reads against main-thread
//! writes, so no locking is introduced here. Releasing an instance is
//! dropping the last handle.

#[cfg(not(feature = "std"))]
use alloc::rc::Rc;
#[cfg(feature = "std")]
use std::rc::Rc;

use core::cell::RefCell;

use crate::param::{Param, RESERVED_DEFAULTS};
use crate::settings::SpatialSettings;

/// Largest block the external unit will accept in one
/// [`process`](ProcessorInstance::process) call.
pub const MAX_PROCESS_FRAMES: usize = 4096;

/// Name and version the external library reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryDescriptor {
    /// Library display name.
    pub name: &'static str,
    /// Internal version number.
    pub version: u32,
}

/// Errors surfaced by the external processing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DspError {
    /// The library refused to create an instance.
    CreateFailed,
    /// [`process`](ProcessorInstance::process) was called with a block size
    /// other than the instance's configured buffer size.
    FrameCountMismatch {
        /// The configured buffer size.
        expected: usize,
        /// The frame count actually passed.
        got: usize,
    },
}

impl core::fmt::Display for DspError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CreateFailed => write!(f, "spatializer instance creation failed"),
            Self::FrameCountMismatch { expected, got } => {
                write!(f, "expected a block of {expected} frames, got {got}")
            }
        }
    }
}

impl core::error::Error for DspError {}

/// One live instance of the external spatializer effect.
///
/// Values passed to [`set_param`](Self::set_param) are normalized; callers
/// go through [`push_param`] (or [`ParamSpec`](crate::ParamSpec) directly)
/// so the wire only ever sees \[0, 1\]. Implementations may clamp
/// defensively but are allowed to assume well-formed input.
pub trait ProcessorInstance {
    /// Resets internal state to defaults without releasing the instance.
    fn reset(&mut self);

    /// Processes one block of interleaved stereo frames.
    ///
    /// `frames` must equal the buffer size the instance was created with;
    /// anything else fails with [`DspError::FrameCountMismatch`] and leaves
    /// the output untouched.
    fn process(&mut self, input: &[f32], output: &mut [f32], frames: usize)
    -> Result<(), DspError>;

    /// Writes a normalized parameter value.
    fn set_param(&mut self, index: u32, value: f32);

    /// Reads back a normalized parameter value. Unknown indices read 0.0.
    fn get_param(&self, index: u32) -> f32;
}

/// Shared handle to a live processor instance.
///
/// The pool owns one per pooled bus; a borrowing emitter holds a clone for
/// per-tick parameter pushes. Dropping the last handle releases the
/// instance.
pub type SharedProcessor = Rc<RefCell<dyn ProcessorInstance>>;

/// The external spatializer library as a whole.
pub trait ProcessorLibrary {
    /// What the library reports about itself; logged once at startup.
    fn descriptor(&self) -> LibraryDescriptor;

    /// Creates a fresh instance for the given stream parameters.
    ///
    /// This is where the library pays its one-time initialization cost,
    /// which is why the pool prewarm path calls it eagerly.
    fn create_instance(
        &self,
        sample_rate: f32,
        buffer_size: usize,
    ) -> Result<SharedProcessor, DspError>;
}

/// Pushes one plain-valued parameter through its spec onto an instance.
pub fn push_param(processor: &SharedProcessor, param: Param, plain: f32) {
    let spec = param.spec();
    processor
        .borrow_mut()
        .set_param(spec.index, spec.normalize(plain));
}

/// Pushes a complete settings snapshot onto an instance.
///
/// Used when a bus is borrowed (the instance may still carry the previous
/// borrower's state) and when settings are re-bound mid-session.
pub fn push_snapshot(processor: &SharedProcessor, settings: &SpatialSettings) {
    for param in Param::ALL {
        push_param(processor, param, settings.get(param));
    }
}

/// Pins the non-surfaced wire indices to their lifetime-constant values.
///
/// Called right after instance creation/reset, mirroring what the plugin's
/// own host shim does.
pub fn apply_reserved_defaults(processor: &SharedProcessor) {
    let mut instance = processor.borrow_mut();
    for &(index, value) in RESERVED_DEFAULTS {
        instance.set_param(index, value);
    }
}
