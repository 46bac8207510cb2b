//! The host engine's mixer graph, as seen by this crate.
//!
//! The mixer owns a flat list of named buses. Indices into that list are
//! NOT stable: the host (or the user, in an editor) may insert, remove, or
//! reorder buses at any moment, out of this crate's sight. The name is the
//! only durable handle, which is why [`MixerGraph::find_bus`] exists and
//! why nothing in this crate stores a bus index across calls. Resolve by
//! name, use the index immediately, forget it.

use binaura_core::SharedProcessor;

/// Bus-table operations the host engine exposes.
///
/// Implementations adapt a concrete engine's audio server. All index
/// parameters refer to the bus list as it exists at call time; callers are
/// expected to have just resolved them via [`find_bus`](Self::find_bus).
pub trait MixerGraph {
    /// Appends a new bus and returns its index.
    fn add_bus(&mut self) -> usize;

    /// Number of buses currently in the table.
    fn bus_count(&self) -> usize;

    /// Name of the bus at `index`, or `None` if the index is stale.
    fn bus_name(&self, index: usize) -> Option<String>;

    /// Renames the bus at `index`.
    fn set_bus_name(&mut self, index: usize, name: &str);

    /// Routes the bus's output into the bus named `target`.
    fn set_bus_send(&mut self, index: usize, target: &str);

    /// Mutes or unmutes the bus at `index`.
    fn set_bus_mute(&mut self, index: usize, mute: bool);

    /// Removes the bus at `index` from the table.
    fn remove_bus(&mut self, index: usize);

    /// Attaches a processor instance as an effect on the bus at `index`.
    fn add_bus_effect(&mut self, index: usize, processor: SharedProcessor);

    /// Resolves a bus name to its current index.
    ///
    /// Linear scan by design: the mixer is name-first, index-second, and
    /// bus tables are small.
    fn find_bus(&self, name: &str) -> Option<usize> {
        (0..self.bus_count()).find(|&index| self.bus_name(index).as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeMixer;

    #[test]
    fn find_bus_resolves_by_name() {
        let mut mixer = FakeMixer::with_master();
        let index = mixer.add_bus();
        mixer.set_bus_name(index, "Music");

        assert_eq!(mixer.find_bus("Music"), Some(index));
        assert_eq!(mixer.find_bus("Master"), Some(0));
        assert_eq!(mixer.find_bus("Voice"), None);
    }

    #[test]
    fn find_bus_tracks_external_reordering() {
        let mut mixer = FakeMixer::with_master();
        let a = mixer.add_bus();
        mixer.set_bus_name(a, "A");
        let b = mixer.add_bus();
        mixer.set_bus_name(b, "B");

        // Something else deletes "A"; "B" shifts down.
        mixer.remove_bus(a);
        assert_eq!(mixer.find_bus("B"), Some(a));
        assert_eq!(mixer.find_bus("A"), None);
    }
}
