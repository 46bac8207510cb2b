//! Per-emitter lifecycle and the per-tick routing decision.
//!
//! Each spatialized emitter owns one [`EmitterRouter`]. On play it borrows
//! a bus from the shared pool and starts BOTH of its players, processed and
//! fallback, at the same position. Every tick it recomputes the source's
//! polar position and decides which path should be audible, expressing the
//! decision purely through output routing: the active path's player routes
//! to a real bus, the inactive one to the silent sink. Because neither
//! player ever stops mid-session, crossing the range threshold (or flipping
//! the forcing override) is seamless; there is no restart and no gap.
//!
//! The tick pipeline runs in a fixed order: spatial computation, then the
//! routing decision, then the parameter push, then route assignment.
//! Routing before the push would let one frame of stale spatial audio
//! through.
//!
//! Host integration is three hooks (`on_activate` / `on_tick` /
//! `on_deactivate`) plus a playback-finished callback; a thin adapter owns
//! the actual scene-graph node and forwards into these. A malformed
//! emitter (wrong children) or a missing listener makes the router ask to
//! be removed rather than crash the scene.

use std::cell::RefCell;
use std::rc::Rc;

use binaura_core::{SpatialSettings, Transform, polar_position};

use crate::context::AudioContext;
use crate::player::{PlayerKind, StreamId, StreamPlayer};
use crate::pool::BorrowedBus;
use crate::spatializer::Spatializer;

/// Default range, in world units, inside which processing is applied.
pub const DEFAULT_MAX_RANGE: f32 = 10.0;

/// Per-emitter override for the distance-based routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Forcing {
    /// Route by distance (the default).
    #[default]
    None,
    /// Always use the processed path, whatever the distance.
    ForceProcessed,
    /// Always use the fallback path, whatever the distance.
    ForceFallback,
}

/// What the host should do with the emitter after a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Keep the emitter in the scene.
    Continue,
    /// Remove the emitter; it cannot (or should not) keep running.
    Remove,
}

struct Players {
    processed: Box<dyn StreamPlayer>,
    fallback: Box<dyn StreamPlayer>,
}

impl Players {
    /// Sorts an emitter's children into their roles.
    ///
    /// Exactly two players are required, one of each kind, in any order.
    fn from_children(children: Vec<Box<dyn StreamPlayer>>) -> Option<Players> {
        let mut processed = None;
        let mut fallback = None;
        for child in children {
            match child.kind() {
                PlayerKind::Direct if processed.is_none() => processed = Some(child),
                PlayerKind::Positional if fallback.is_none() => fallback = Some(child),
                _ => return None,
            }
        }
        Some(Players {
            processed: processed?,
            fallback: fallback?,
        })
    }
}

/// Routing state machine for one sound-emitting entity.
pub struct EmitterRouter {
    players: Option<Players>,

    // Shared stream settings, fanned out to both players.
    stream: Option<StreamId>,
    volume_db: f32,
    pitch_scale: f32,
    bus: String,
    autoplay: bool,

    max_range: f32,
    forcing: Forcing,
    dupe_protection: bool,
    delete_on_finish: bool,

    spatializer: Spatializer,
    borrowed: Option<BorrowedBus>,
    finished: bool,
}

impl EmitterRouter {
    /// A router with default configuration, routing into `Master`.
    pub fn new() -> Self {
        Self {
            players: None,
            stream: None,
            volume_db: 0.0,
            pitch_scale: 1.0,
            bus: "Master".to_string(),
            autoplay: false,
            max_range: DEFAULT_MAX_RANGE,
            forcing: Forcing::None,
            dupe_protection: true,
            delete_on_finish: false,
            spatializer: Spatializer::new(),
            borrowed: None,
            finished: false,
        }
    }

    // --- Host hooks ---

    /// Activates the emitter with its two child players.
    ///
    /// Validates the two-player structure, applies dupe protection, fans
    /// out the shared stream settings, and honors autoplay. On a malformed
    /// child set the router warns and asks to be removed.
    pub fn on_activate(
        &mut self,
        ctx: &mut AudioContext,
        children: Vec<Box<dyn StreamPlayer>>,
    ) -> Lifecycle {
        let Some(players) = Players::from_children(children) else {
            tracing::warn!(
                "spatialized emitter needs exactly two players, one direct and one positional; removing"
            );
            return Lifecycle::Remove;
        };
        self.players = Some(players);

        if self.dupe_protection {
            // A settings object shared by accident would make every sharer
            // hear the last writer's position. Opting out is deliberate.
            self.spatializer.duplicate_settings();
        }
        self.copy_shared_properties();

        if self.autoplay {
            self.play(ctx, 0.0);
        }
        Lifecycle::Continue
    }

    /// Per-tick update: recompute the polar position and re-route.
    ///
    /// `listener` is the active listener's transform, if one could be
    /// located this frame; without one spatial routing is meaningless and
    /// the router asks to be removed.
    pub fn on_tick(
        &mut self,
        ctx: &mut AudioContext,
        listener: Option<&Transform>,
        emitter: &Transform,
    ) -> Lifecycle {
        let Some(listener) = listener else {
            tracing::warn!("no audio listener found; removing spatialized emitter");
            return Lifecycle::Remove;
        };
        if self.players.is_none() {
            return Lifecycle::Remove;
        }
        if !self.is_playing() {
            return Lifecycle::Continue;
        }

        // 1. Spatial computation.
        let polar = polar_position(emitter.position, listener);

        // 2. Routing decision. Forcing overrides distance, but nothing
        // overrides a globally disabled feature or a session that never got
        // a bus: those pin the decision to the fallback path.
        let available = ctx.dsp.is_active() && self.borrowed.is_some();
        let use_processed = available
            && match self.forcing {
                Forcing::ForceProcessed => true,
                Forcing::ForceFallback => false,
                Forcing::None => polar.distance < self.max_range,
            };

        let AudioContext { mixer, pool, .. } = ctx;
        let silent = pool.silent_bus(mixer.as_mut());
        let Some(players) = self.players.as_mut() else {
            return Lifecycle::Remove;
        };

        if use_processed {
            // 3. Parameter push, then 4. route assignment.
            self.spatializer.set_polar(&polar);
            if let Some(borrowed) = &self.borrowed {
                players.processed.set_route(borrowed.name());
            }
            players.fallback.set_route(&silent);
        } else {
            players.processed.set_route(&silent);
            players.fallback.set_route(&self.bus);
        }
        Lifecycle::Continue
    }

    /// Deactivation: releases the borrow, stops playback, forgets the
    /// players.
    pub fn on_deactivate(&mut self, ctx: &mut AudioContext) {
        self.stop(ctx);
        self.players = None;
    }

    /// Hook for the processed player's natural end of playback.
    ///
    /// Releases resources exactly like [`stop`](Self::stop), latches the
    /// finished notification, and asks for removal when the emitter is
    /// marked delete-on-finish.
    pub fn on_playback_finished(&mut self, ctx: &mut AudioContext) -> Lifecycle {
        self.stop(ctx);
        self.finished = true;
        if self.delete_on_finish {
            Lifecycle::Remove
        } else {
            Lifecycle::Continue
        }
    }

    /// Takes the latched finished notification, clearing it.
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }

    // --- Playback ---

    /// Starts playback from `from` seconds.
    ///
    /// Borrows a pool bus for the session (when the feature is active) and
    /// starts both players together. A router already holding a bus
    /// releases it first, so a play-without-stop restart cannot leak a
    /// borrow. When no bus is available the session simply runs
    /// fallback-only; the tick decision handles the rest.
    pub fn play(&mut self, ctx: &mut AudioContext, from: f32) {
        if self.players.is_none() {
            tracing::warn!("play() on an emitter with no players; ignoring");
            return;
        }

        self.release(ctx);
        self.finished = false;

        let AudioContext { mixer, dsp, pool } = ctx;
        if dsp.is_active() {
            let snapshot = self.spatializer.snapshot();
            if let Some(borrowed) = pool.borrow(mixer.as_mut(), dsp, &self.bus, &snapshot) {
                self.spatializer
                    .bind(binaura_core::SharedProcessor::clone(borrowed.processor()));
                self.borrowed = Some(borrowed);
            }
        }

        let silent = pool.silent_bus(mixer.as_mut());
        let Some(players) = self.players.as_mut() else {
            return;
        };

        // Initial routing: assume in-range when a bus was borrowed; the
        // first tick corrects against the real distance.
        match &self.borrowed {
            Some(borrowed) => {
                players.processed.set_route(borrowed.name());
                players.fallback.set_route(&silent);
            }
            None => {
                players.processed.set_route(&silent);
                players.fallback.set_route(&self.bus);
            }
        }

        players.processed.play(from);
        players.fallback.play(from);
    }

    /// Stops playback and returns the borrowed bus, if any.
    ///
    /// Safe to call repeatedly; the release happens exactly once per
    /// borrow.
    pub fn stop(&mut self, ctx: &mut AudioContext) {
        self.release(ctx);
        if let Some(players) = self.players.as_mut() {
            players.processed.stop();
            players.fallback.stop();
        }
    }

    /// Starts (from the beginning) or stops playback.
    pub fn set_playing(&mut self, ctx: &mut AudioContext, playing: bool) {
        if playing {
            self.play(ctx, 0.0);
        } else {
            self.stop(ctx);
        }
    }

    /// Whether the emitter is playing. The processed player is the
    /// authority; both players were started together.
    pub fn is_playing(&self) -> bool {
        self.players
            .as_ref()
            .is_some_and(|players| players.processed.is_playing())
    }

    /// Seeks both players to `to` seconds.
    pub fn seek(&mut self, to: f32) {
        if let Some(players) = self.players.as_mut() {
            players.processed.seek(to);
            players.fallback.seek(to);
        }
    }

    /// Current playback position in seconds.
    pub fn playback_position(&self) -> f32 {
        self.players
            .as_ref()
            .map_or(0.0, |players| players.processed.playback_position())
    }

    /// Pauses or resumes both players.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(players) = self.players.as_mut() {
            players.processed.set_paused(paused);
            players.fallback.set_paused(paused);
        }
    }

    /// Whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.players
            .as_ref()
            .is_some_and(|players| players.processed.is_paused())
    }

    // --- Shared stream settings ---

    /// Assigns the stream both players should render.
    pub fn set_stream(&mut self, stream: Option<StreamId>) {
        self.stream = stream;
        self.copy_shared_properties();
    }

    /// The configured stream.
    pub fn stream(&self) -> Option<StreamId> {
        self.stream
    }

    /// Sets playback volume in dB on both players.
    pub fn set_volume_db(&mut self, db: f32) {
        self.volume_db = db;
        self.copy_shared_properties();
    }

    /// Playback volume in dB.
    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }

    /// Sets the pitch scale on both players.
    pub fn set_pitch_scale(&mut self, pitch: f32) {
        self.pitch_scale = pitch;
        self.copy_shared_properties();
    }

    /// Pitch scale.
    pub fn pitch_scale(&self) -> f32 {
        self.pitch_scale
    }

    /// Sets the user-facing output bus.
    ///
    /// This is the route the fallback path uses and the bus a borrowed pool
    /// bus sends into. While playing, the next tick re-asserts runtime
    /// routing on top of it.
    pub fn set_bus(&mut self, bus: &str) {
        self.bus = bus.to_string();
        self.copy_shared_properties();
    }

    /// The user-facing output bus.
    pub fn bus(&self) -> &str {
        &self.bus
    }

    /// Whether playback starts automatically on activation.
    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    /// Whether playback starts automatically on activation.
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    // --- Routing configuration ---

    /// Sets the range inside which the processed path is used.
    pub fn set_max_range(&mut self, range: f32) {
        self.max_range = range;
    }

    /// The range inside which the processed path is used.
    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Sets the per-emitter forcing override.
    pub fn set_forcing(&mut self, forcing: Forcing) {
        self.forcing = forcing;
    }

    /// The per-emitter forcing override.
    pub fn forcing(&self) -> Forcing {
        self.forcing
    }

    /// Controls whether activation duplicates the settings object.
    pub fn set_dupe_protection(&mut self, protect: bool) {
        self.dupe_protection = protect;
    }

    /// Whether activation duplicates the settings object.
    pub fn dupe_protection(&self) -> bool {
        self.dupe_protection
    }

    /// Controls whether the emitter is torn down after finishing.
    pub fn set_delete_on_finish(&mut self, delete: bool) {
        self.delete_on_finish = delete;
    }

    /// Whether the emitter is torn down after finishing.
    pub fn delete_on_finish(&self) -> bool {
        self.delete_on_finish
    }

    // --- Spatializer access ---

    /// The spatializer binding (settings plus any bound instance).
    pub fn spatializer(&self) -> &Spatializer {
        &self.spatializer
    }

    /// Mutable access to the spatializer binding.
    pub fn spatializer_mut(&mut self) -> &mut Spatializer {
        &mut self.spatializer
    }

    /// Replaces the spatial settings with a shared object.
    ///
    /// `None` is a configuration mistake: it is ignored with a warning and
    /// the previous settings stay. Note that dupe protection will detach
    /// this emitter from the shared object again at activation unless it is
    /// switched off.
    pub fn share_settings(&mut self, settings: Option<Rc<RefCell<SpatialSettings>>>) {
        self.spatializer.share_settings(settings);
    }

    fn copy_shared_properties(&mut self) {
        let Some(players) = self.players.as_mut() else {
            return;
        };
        players.processed.set_stream(self.stream);
        players.processed.set_volume_db(self.volume_db);
        players.processed.set_pitch_scale(self.pitch_scale);
        players.processed.set_route(&self.bus);

        players.fallback.set_stream(self.stream);
        players.fallback.set_volume_db(self.volume_db);
        players.fallback.set_pitch_scale(self.pitch_scale);
        players.fallback.set_route(&self.bus);
    }

    fn release(&mut self, ctx: &mut AudioContext) {
        if let Some(borrowed) = self.borrowed.take() {
            self.spatializer.unbind();
            let AudioContext { mixer, pool, .. } = ctx;
            pool.return_bus(mixer.as_mut(), borrowed);
        }
    }
}

impl Default for EmitterRouter {
    fn default() -> Self {
        Self::new()
    }
}
