//! The top-level audio subsystem object.
//!
//! One [`AudioContext`] owns the mixer adapter, the spatializer library
//! gate, and the bus pool, and is passed by `&mut` into every
//! [`EmitterRouter`](crate::EmitterRouter) call. "One pool per process" is
//! a choice the embedding game makes by constructing one context, not a
//! hidden global; tests construct as many as they like.

use binaura_config::SubsystemConfig;
use binaura_core::ProcessorLibrary;

use crate::host::DspHost;
use crate::mixer::MixerGraph;
use crate::pool::BusPool;

/// Owns the shared collaborators of the spatial-audio subsystem.
pub struct AudioContext {
    /// The host engine's bus table.
    pub mixer: Box<dyn MixerGraph>,
    /// Availability gate for the external spatializer.
    pub dsp: DspHost,
    /// The shared pool of spatializer buses.
    pub pool: BusPool,
}

impl AudioContext {
    /// Creates a context with an explicit pool capacity.
    pub fn new(mixer: Box<dyn MixerGraph>, dsp: DspHost, pool_capacity: usize) -> Self {
        Self {
            mixer,
            dsp,
            pool: BusPool::new(pool_capacity),
        }
    }

    /// Creates a context from a [`SubsystemConfig`].
    ///
    /// `library` is the loaded spatializer library, or `None` when loading
    /// failed upstream (emitters then run fallback-only). The configured
    /// prewarm count is applied immediately.
    pub fn from_config(
        mixer: Box<dyn MixerGraph>,
        library: Option<Box<dyn ProcessorLibrary>>,
        config: &SubsystemConfig,
    ) -> Self {
        let mut dsp = match library {
            Some(library) => DspHost::new(library, config.sample_rate, config.buffer_size),
            None => DspHost::unavailable(config.sample_rate, config.buffer_size),
        };
        dsp.set_enabled(config.enabled);

        let mut context = Self::new(mixer, dsp, config.max_buses);
        if config.prewarm > 0 {
            context.prewarm(config.prewarm);
        }
        context
    }

    /// Creates up to `count` idle pool buses ahead of time.
    pub fn prewarm(&mut self, count: usize) {
        let Self { mixer, dsp, pool } = self;
        pool.prewarm(mixer.as_mut(), dsp, count);
    }

    /// Changes the pool capacity at runtime.
    pub fn set_pool_capacity(&mut self, capacity: usize) {
        let Self { mixer, pool, .. } = self;
        pool.set_capacity(mixer.as_mut(), capacity);
    }

    /// Turns the processed path on or off globally.
    pub fn set_processing_enabled(&mut self, enabled: bool) {
        self.dsp.set_enabled(enabled);
    }

    /// Whether the processed path is currently possible at all.
    pub fn is_processing_active(&self) -> bool {
        self.dsp.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeLibrary, FakeMixer};

    #[test]
    fn from_config_applies_capacity_and_prewarm() {
        let config = SubsystemConfig {
            max_buses: 3,
            prewarm: 2,
            ..SubsystemConfig::default()
        };
        let (library, created) = FakeLibrary::new();
        let ctx = AudioContext::from_config(
            Box::new(FakeMixer::with_master()),
            Some(Box::new(library)),
            &config,
        );

        assert_eq!(ctx.pool.capacity(), 3);
        assert_eq!(ctx.pool.idle_count(), 2);
        assert_eq!(*created.borrow(), 2);
        assert!(ctx.is_processing_active());
    }

    #[test]
    fn from_config_without_library_is_inactive() {
        let config = SubsystemConfig {
            prewarm: 4,
            ..SubsystemConfig::default()
        };
        let ctx = AudioContext::from_config(Box::new(FakeMixer::with_master()), None, &config);
        assert!(!ctx.is_processing_active());
        // Prewarm quietly did nothing without a library.
        assert_eq!(ctx.pool.idle_count(), 0);
    }

    #[test]
    fn config_can_start_disabled() {
        let config = SubsystemConfig {
            enabled: false,
            ..SubsystemConfig::default()
        };
        let (library, _) = FakeLibrary::new();
        let mut ctx = AudioContext::from_config(
            Box::new(FakeMixer::with_master()),
            Some(Box::new(library)),
            &config,
        );
        assert!(!ctx.is_processing_active());
        // With a library present, re-enabling works.
        ctx.set_processing_enabled(true);
        assert!(ctx.is_processing_active());
    }

    #[test]
    fn set_pool_capacity_forwards_to_the_pool() {
        let (library, _) = FakeLibrary::new();
        let mut ctx = AudioContext::new(
            Box::new(FakeMixer::with_master()),
            DspHost::new(Box::new(library), 48000.0, 512),
            4,
        );
        ctx.prewarm(4);
        ctx.set_pool_capacity(1);
        assert_eq!(ctx.pool.capacity(), 1);
        assert_eq!(ctx.pool.idle_count(), 1);
    }
}
