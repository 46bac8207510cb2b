//! Availability gate around the external spatializer library.
//!
//! The library is a native plugin that may be missing, the wrong version,
//! or broken; none of that is allowed to take the game down. [`DspHost`]
//! tracks whether processed routing is currently possible at all: it owns
//! the library handle, the user-facing enable switch, and the warn-once
//! latch that keeps a dead plugin from spamming the log every time an
//! emitter starts.

use binaura_core::{ProcessorLibrary, SharedProcessor, apply_reserved_defaults};

/// Global availability state for the processed (spatialized) path.
pub struct DspHost {
    library: Option<Box<dyn ProcessorLibrary>>,
    enabled: bool,
    warned: bool,
    sample_rate: f32,
    buffer_size: usize,
}

impl DspHost {
    /// Wraps a loaded library. Logs its self-reported descriptor once.
    pub fn new(library: Box<dyn ProcessorLibrary>, sample_rate: f32, buffer_size: usize) -> Self {
        let descriptor = library.descriptor();
        tracing::info!(
            name = descriptor.name,
            version = descriptor.version,
            sample_rate,
            buffer_size,
            "spatializer library loaded"
        );
        Self {
            library: Some(library),
            enabled: true,
            warned: false,
            sample_rate,
            buffer_size,
        }
    }

    /// A host with no library at all: every emitter runs fallback-only.
    ///
    /// Used when plugin loading failed before the audio subsystem came up.
    /// Logs the condition once, here, rather than per emitter.
    pub fn unavailable(sample_rate: f32, buffer_size: usize) -> Self {
        tracing::warn!("spatializer library unavailable; emitters will use the fallback path");
        Self {
            library: None,
            enabled: false,
            warned: true,
            sample_rate,
            buffer_size,
        }
    }

    /// Whether the processed path is currently possible.
    pub fn is_active(&self) -> bool {
        self.enabled && self.library.is_some()
    }

    /// Turns processed routing on or off.
    ///
    /// Re-enabling is only honored when a library is actually present;
    /// without one this stays off no matter what the caller asks for.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.library.is_some();
    }

    /// Mix rate instances are created for, in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Block size instances are created for, in frames.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Creates and resets a fresh processor instance.
    ///
    /// Returns `None` when the feature is inactive or creation fails. A
    /// failure disables the feature until someone calls
    /// [`set_enabled`](Self::set_enabled) again, and warns exactly once.
    pub fn create_instance(&mut self) -> Option<SharedProcessor> {
        if !self.enabled {
            return None;
        }
        let library = self.library.as_ref()?;
        match library.create_instance(self.sample_rate, self.buffer_size) {
            Ok(instance) => {
                instance.borrow_mut().reset();
                apply_reserved_defaults(&instance);
                Some(instance)
            }
            Err(err) => {
                if !self.warned {
                    self.warned = true;
                    tracing::warn!(%err, "spatializer instance creation failed; disabling processed routing");
                }
                self.enabled = false;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeLibrary;

    #[test]
    fn creates_instances_while_active() {
        let (library, created) = FakeLibrary::new();
        let mut host = DspHost::new(Box::new(library), 48000.0, 512);
        assert!(host.is_active());
        assert!(host.create_instance().is_some());
        assert_eq!(*created.borrow(), 1);
    }

    #[test]
    fn creation_failure_disables_until_reenabled() {
        let mut host = DspHost::new(Box::new(FakeLibrary::failing()), 48000.0, 512);
        assert!(host.create_instance().is_none());
        assert!(!host.is_active());
        // Still off on the next attempt; no retry storm.
        assert!(host.create_instance().is_none());

        host.set_enabled(true);
        assert!(host.is_active());
    }

    #[test]
    fn unavailable_host_never_activates() {
        let mut host = DspHost::unavailable(44100.0, 512);
        assert!(!host.is_active());
        host.set_enabled(true);
        assert!(!host.is_active());
        assert!(host.create_instance().is_none());
    }

    #[test]
    fn disable_stops_instance_creation() {
        let (library, created) = FakeLibrary::new();
        let mut host = DspHost::new(Box::new(library), 48000.0, 512);
        host.set_enabled(false);
        assert!(host.create_instance().is_none());
        assert_eq!(*created.borrow(), 0);
    }

    #[test]
    fn new_instances_are_reset_with_reserved_defaults() {
        let (library, _created) = FakeLibrary::new();
        let mut host = DspHost::new(Box::new(library), 48000.0, 512);
        let instance = host.create_instance().unwrap();
        // Index 17 is the only reserved index resting at 1.0.
        assert_eq!(instance.borrow().get_param(17), 1.0);
    }
}
