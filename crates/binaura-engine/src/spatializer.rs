//! Binds a settings object to a live processor instance.
//!
//! [`SpatialSettings`](binaura_core::SpatialSettings) on its own is pure
//! data. A [`Spatializer`] pairs one with whatever processor instance the
//! emitter currently holds: while bound, every write lands on the instance
//! too (post-clamp, so the DSP sees exactly what the settings object
//! stores); while unbound, writes are plain field updates. Binding pushes a
//! full snapshot so the instance can never be left with a previous
//! borrower's state.
//!
//! Settings live behind an `Rc` because callers may deliberately share one
//! settings object across emitters (linked ambience sources, for example).
//! The sharp edge is doing that by accident: then every emitter's per-tick
//! position writes fight over the same object and every sharer hears the
//! last writer's position. The router defuses this by default by calling
//! [`duplicate_settings`](Spatializer::duplicate_settings) at activation.

use std::cell::RefCell;
use std::rc::Rc;

use binaura_core::{Param, PolarPosition, SharedProcessor, SpatialSettings, push_param, push_snapshot};

/// An emitter's spatializer settings, optionally bound to a live instance.
pub struct Spatializer {
    settings: Rc<RefCell<SpatialSettings>>,
    processor: Option<SharedProcessor>,
}

impl Spatializer {
    /// A spatializer with default settings, unbound.
    pub fn new() -> Self {
        Self {
            settings: Rc::new(RefCell::new(SpatialSettings::default())),
            processor: None,
        }
    }

    /// A spatializer wrapping an existing (possibly shared) settings object.
    pub fn with_settings(settings: Rc<RefCell<SpatialSettings>>) -> Self {
        Self {
            settings,
            processor: None,
        }
    }

    /// Handle to the underlying settings object.
    pub fn settings(&self) -> Rc<RefCell<SpatialSettings>> {
        Rc::clone(&self.settings)
    }

    /// A by-value copy of the current settings.
    pub fn snapshot(&self) -> SpatialSettings {
        self.settings.borrow().clone()
    }

    /// Replaces the settings object, keeping it shared with the caller.
    ///
    /// `None` is rejected with a warning and the previous settings stay in
    /// effect; there is no meaningful "no settings" state for a playing
    /// emitter. When bound, the new values are pushed immediately.
    pub fn share_settings(&mut self, settings: Option<Rc<RefCell<SpatialSettings>>>) {
        let Some(settings) = settings else {
            tracing::warn!("ignoring attempt to clear spatializer settings; keeping previous ones");
            return;
        };
        self.settings = settings;
        self.push_all();
    }

    /// Swaps the shared settings object for a private copy of it.
    ///
    /// This is the dupe-protection primitive: after this call, writes from
    /// other holders of the old object no longer reach this emitter.
    pub fn duplicate_settings(&mut self) {
        let copy = self.settings.borrow().clone();
        self.settings = Rc::new(RefCell::new(copy));
    }

    /// Sets one parameter, pushing it to the bound instance if any.
    pub fn set(&mut self, param: Param, value: f32) {
        self.settings.borrow_mut().set(param, value);
        if let Some(processor) = &self.processor {
            let settings = self.settings.borrow();
            // Push what the settings object actually stores, not the raw
            // input; clamping and wrapping have already happened.
            push_param(processor, param, settings.get(param));
            // The attenuation pair is mutually clamped, so one write may
            // have moved both fields.
            match param {
                Param::MinAttenuation => {
                    push_param(processor, Param::MaxAttenuation, settings.get(Param::MaxAttenuation));
                }
                Param::MaxAttenuation => {
                    push_param(processor, Param::MinAttenuation, settings.get(Param::MinAttenuation));
                }
                _ => {}
            }
        }
    }

    /// Reads one parameter's plain value.
    pub fn get(&self, param: Param) -> f32 {
        self.settings.borrow().get(param)
    }

    /// Binds a processor instance and pushes the full snapshot onto it.
    pub fn bind(&mut self, processor: SharedProcessor) {
        self.processor = Some(processor);
        self.push_all();
    }

    /// Drops the bound instance. Settings are untouched.
    pub fn unbind(&mut self) {
        self.processor = None;
    }

    /// Whether a processor instance is currently bound.
    pub fn is_bound(&self) -> bool {
        self.processor.is_some()
    }

    /// Pushes a tick's polar position (azimuth, elevation, distance).
    pub fn set_polar(&mut self, polar: &PolarPosition) {
        self.set(Param::Azimuth, polar.azimuth);
        self.set(Param::Elevation, polar.elevation);
        self.set(Param::Distance, polar.distance);
    }

    fn push_all(&self) {
        if let Some(processor) = &self.processor {
            push_snapshot(processor, &self.settings.borrow());
        }
    }
}

impl Default for Spatializer {
    fn default() -> Self {
        Self::new()
    }
}
