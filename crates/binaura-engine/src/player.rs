//! The per-emitter playback collaborators.
//!
//! Every spatialized emitter drives two host-engine stream players at once:
//! a [`PlayerKind::Direct`] player that feeds the processed path (its
//! output lands on a borrowed pool bus carrying the spatializer), and a
//! [`PlayerKind::Positional`] player that is the engine's own fallback
//! rendition. Both always play together; which one is audible is purely a
//! question of where their outputs are routed, so flipping between paths
//! never restarts a stream.

/// Opaque handle to a host-engine audio stream resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub u64);

/// Which role a stream player fills under an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    /// Non-positional player; feeds the spatializer through a pooled bus.
    Direct,
    /// The host engine's positional player; the unprocessed fallback.
    Positional,
}

/// One host-engine stream player, adapted behind a trait.
///
/// Playback state (position, pause) lives in the host; this crate only
/// steers it. `set_route` is the load-bearing method: routing decides which
/// of an emitter's two players is audible on any given tick.
pub trait StreamPlayer {
    /// The role this player fills.
    fn kind(&self) -> PlayerKind;

    /// Starts playback at `from` seconds.
    fn play(&mut self, from: f32);

    /// Stops playback.
    fn stop(&mut self);

    /// Seeks to `to` seconds.
    fn seek(&mut self, to: f32);

    /// Whether the player is currently playing.
    fn is_playing(&self) -> bool;

    /// Current playback position in seconds.
    fn playback_position(&self) -> f32;

    /// Pauses or resumes without losing position.
    fn set_paused(&mut self, paused: bool);

    /// Whether playback is paused.
    fn is_paused(&self) -> bool;

    /// Routes this player's output to the named bus.
    fn set_route(&mut self, bus: &str);

    /// Assigns the stream resource to play.
    fn set_stream(&mut self, stream: Option<StreamId>);

    /// Sets playback volume in dB.
    fn set_volume_db(&mut self, db: f32);

    /// Sets the pitch/speed scale.
    fn set_pitch_scale(&mut self, pitch: f32);
}
