//! In-memory fakes for the engine's collaborators, shared by unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use binaura_core::{
    DspError, LibraryDescriptor, ProcessorInstance, ProcessorLibrary, SharedProcessor,
};

use crate::mixer::MixerGraph;
use crate::player::{PlayerKind, StreamPlayer};

pub(crate) struct FakeBus {
    pub name: String,
    pub send: String,
    pub muted: bool,
    pub effects: Vec<SharedProcessor>,
}

/// A mixer that behaves like a host bus table, including the instability
/// of indices under removal.
#[derive(Default)]
pub(crate) struct FakeMixer {
    pub buses: Vec<FakeBus>,
}

impl FakeMixer {
    pub fn with_master() -> Self {
        let mut mixer = Self::default();
        let index = mixer.add_bus();
        mixer.set_bus_name(index, "Master");
        mixer
    }

    pub fn send_of(&self, name: &str) -> Option<String> {
        self.buses
            .iter()
            .find(|bus| bus.name == name)
            .map(|bus| bus.send.clone())
    }

    pub fn is_muted(&self, name: &str) -> bool {
        self.buses
            .iter()
            .find(|bus| bus.name == name)
            .is_some_and(|bus| bus.muted)
    }

    pub fn effect_count(&self, name: &str) -> usize {
        self.buses
            .iter()
            .find(|bus| bus.name == name)
            .map_or(0, |bus| bus.effects.len())
    }

    /// Deletes a bus by name, simulating out-of-band mutation.
    pub fn remove_by_name(&mut self, name: &str) {
        self.buses.retain(|bus| bus.name != name);
    }
}

impl MixerGraph for FakeMixer {
    fn add_bus(&mut self) -> usize {
        self.buses.push(FakeBus {
            name: String::new(),
            send: "Master".to_string(),
            muted: false,
            effects: Vec::new(),
        });
        self.buses.len() - 1
    }

    fn bus_count(&self) -> usize {
        self.buses.len()
    }

    fn bus_name(&self, index: usize) -> Option<String> {
        self.buses.get(index).map(|bus| bus.name.clone())
    }

    fn set_bus_name(&mut self, index: usize, name: &str) {
        if let Some(bus) = self.buses.get_mut(index) {
            bus.name = name.to_string();
        }
    }

    fn set_bus_send(&mut self, index: usize, target: &str) {
        if let Some(bus) = self.buses.get_mut(index) {
            bus.send = target.to_string();
        }
    }

    fn set_bus_mute(&mut self, index: usize, mute: bool) {
        if let Some(bus) = self.buses.get_mut(index) {
            bus.muted = mute;
        }
    }

    fn remove_bus(&mut self, index: usize) {
        if index < self.buses.len() {
            self.buses.remove(index);
        }
    }

    fn add_bus_effect(&mut self, index: usize, processor: SharedProcessor) {
        if let Some(bus) = self.buses.get_mut(index) {
            bus.effects.push(processor);
        }
    }
}

/// A processor instance that just records what it was told.
#[derive(Default)]
pub(crate) struct FakeInstance {
    pub params: BTreeMap<u32, f32>,
    pub resets: usize,
}

impl ProcessorInstance for FakeInstance {
    fn reset(&mut self) {
        self.resets += 1;
        self.params.clear();
    }

    fn process(&mut self, input: &[f32], output: &mut [f32], _frames: usize) -> Result<(), DspError> {
        output[..input.len()].copy_from_slice(input);
        Ok(())
    }

    fn set_param(&mut self, index: u32, value: f32) {
        self.params.insert(index, value);
    }

    fn get_param(&self, index: u32) -> f32 {
        self.params.get(&index).copied().unwrap_or(0.0)
    }
}

/// Library fake: counts instance creations and can be told to fail.
pub(crate) struct FakeLibrary {
    pub created: Rc<RefCell<usize>>,
    pub fail: bool,
}

impl FakeLibrary {
    pub fn new() -> (Self, Rc<RefCell<usize>>) {
        let created = Rc::new(RefCell::new(0));
        (
            Self {
                created: Rc::clone(&created),
                fail: false,
            },
            created,
        )
    }

    pub fn failing() -> Self {
        Self {
            created: Rc::new(RefCell::new(0)),
            fail: true,
        }
    }
}

impl ProcessorLibrary for FakeLibrary {
    fn descriptor(&self) -> LibraryDescriptor {
        LibraryDescriptor {
            name: "fake-spatializer",
            version: 1,
        }
    }

    fn create_instance(
        &self,
        _sample_rate: f32,
        _buffer_size: usize,
    ) -> Result<SharedProcessor, DspError> {
        if self.fail {
            return Err(DspError::CreateFailed);
        }
        *self.created.borrow_mut() += 1;
        Ok(Rc::new(RefCell::new(FakeInstance::default())))
    }
}

/// Observable state of a [`FakePlayer`], shared with the test body.
#[derive(Debug, Default)]
pub(crate) struct PlayerState {
    pub playing: bool,
    pub paused: bool,
    pub position: f32,
    pub route: String,
    pub stream: Option<crate::player::StreamId>,
    pub volume_db: f32,
    pub pitch_scale: f32,
}

pub(crate) struct FakePlayer {
    kind: PlayerKind,
    pub state: Rc<RefCell<PlayerState>>,
}

impl FakePlayer {
    /// Returns the player and a handle for inspecting it after the router
    /// has taken ownership.
    pub fn new(kind: PlayerKind) -> (Self, Rc<RefCell<PlayerState>>) {
        let state = Rc::new(RefCell::new(PlayerState {
            pitch_scale: 1.0,
            ..PlayerState::default()
        }));
        (
            Self {
                kind,
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl StreamPlayer for FakePlayer {
    fn kind(&self) -> PlayerKind {
        self.kind
    }

    fn play(&mut self, from: f32) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.position = from;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.position = 0.0;
    }

    fn seek(&mut self, to: f32) {
        self.state.borrow_mut().position = to;
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn playback_position(&self) -> f32 {
        self.state.borrow().position
    }

    fn set_paused(&mut self, paused: bool) {
        self.state.borrow_mut().paused = paused;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn set_route(&mut self, bus: &str) {
        self.state.borrow_mut().route = bus.to_string();
    }

    fn set_stream(&mut self, stream: Option<crate::player::StreamId>) {
        self.state.borrow_mut().stream = stream;
    }

    fn set_volume_db(&mut self, db: f32) {
        self.state.borrow_mut().volume_db = db;
    }

    fn set_pitch_scale(&mut self, pitch: f32) {
        self.state.borrow_mut().pitch_scale = pitch;
    }
}
