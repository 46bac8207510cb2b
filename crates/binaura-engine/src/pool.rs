//! The pool of mixer buses that carry the spatializer effect.
//!
//! Buses are a scarce engine-level resource: each one carries a live
//! processor instance whose first-use initialization is expensive, so the
//! pool keeps returned buses warm and lends the most recently returned one
//! first. At most [`capacity`](BusPool::capacity) pooled buses exist at
//! once, idle and lent combined; past that, a returned bus is destroyed
//! instead of pooled and a borrow request comes back empty (the caller
//! falls back to the unprocessed path).
//!
//! The mixer can be mutated out-of-band at any time, so the pool treats its
//! own bookkeeping as a cache of hints: every bus is re-resolved by name
//! before use, and the moment one idle name fails to resolve the entire
//! idle list is discarded and rebuilt on demand. Per-entry repair is not
//! attempted; once one entry is stale the assumptions behind all of them
//! are gone.
//!
//! None of these operations error or panic. Exhaustion and external
//! breakage both degrade to "no bus for you, use the fallback".

use binaura_core::{SharedProcessor, SpatialSettings, push_snapshot};

use crate::host::DspHost;
use crate::mixer::MixerGraph;

/// Base name for pooled buses. Collisions get a numeric suffix.
pub const POOL_BUS_NAME: &str = "[Binaura Bus]";

/// Name of the dedicated muted sink bus.
pub const SILENT_BUS_NAME: &str = "[Binaura Silent]";

/// A bus currently lent out to one emitter.
///
/// Move-only on purpose: returning it to the pool consumes it, so a borrow
/// cannot be returned twice. Exactly one return per borrow is a caller
/// contract in the design; ownership makes it unbreakable.
pub struct BorrowedBus {
    name: String,
    processor: SharedProcessor,
}

impl core::fmt::Debug for BorrowedBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BorrowedBus").field("name", &self.name).finish_non_exhaustive()
    }
}

impl BorrowedBus {
    /// The bus's mixer name, the only durable way to refer to it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The processor instance bound to this bus, for per-tick updates.
    pub fn processor(&self) -> &SharedProcessor {
        &self.processor
    }
}

struct PooledBus {
    name: String,
    processor: SharedProcessor,
}

/// Bounded pool of spatializer buses.
pub struct BusPool {
    /// Idle buses, LIFO: the most recently returned sits at the end and is
    /// lent out next, keeping warm instances in rotation.
    idle: Vec<PooledBus>,
    /// Buses currently lent out. The pool does not track who holds what.
    in_use: usize,
    /// Ceiling on `idle.len() + in_use`.
    capacity: usize,
}

impl BusPool {
    /// Creates an empty pool with the given capacity. No buses are created
    /// until they are needed (or [`prewarm`](Self::prewarm) asks for them).
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Vec::new(),
            in_use: 0,
            capacity,
        }
    }

    /// Maximum number of pooled buses, idle and lent combined.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle buses ready to lend.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Number of buses currently lent out.
    pub fn in_use_count(&self) -> usize {
        self.in_use
    }

    /// Changes the pool capacity.
    ///
    /// Shrinking destroys just enough idle buses to fit, oldest first;
    /// lent-out buses are never touched (they shed naturally as they are
    /// returned). Growing never eagerly creates buses.
    pub fn set_capacity(&mut self, mixer: &mut dyn MixerGraph, new_capacity: usize) {
        if self.idle.len() + self.in_use >= new_capacity {
            let keep = new_capacity.saturating_sub(self.in_use);
            while self.idle.len() > keep {
                // Front of the vec is the least recently returned.
                let stale = self.idle.remove(0);
                destroy_bus(mixer, &stale.name);
            }
        }
        self.capacity = new_capacity;
        tracing::debug!(capacity = new_capacity, "bus pool capacity set");
    }

    /// Creates up to `count` idle buses ahead of time.
    ///
    /// Each gets a processor instance bound immediately, paying the
    /// library's one-time initialization cost now instead of on first
    /// borrow. Clamped to the remaining capacity headroom; quietly does
    /// nothing if the library is unavailable.
    pub fn prewarm(&mut self, mixer: &mut dyn MixerGraph, dsp: &mut DspHost, count: usize) {
        let headroom = self
            .capacity
            .saturating_sub(self.idle.len() + self.in_use);
        for _ in 0..count.min(headroom) {
            let Some(bus) = create_pool_bus(mixer, dsp) else {
                return;
            };
            self.idle.push(bus);
        }
    }

    /// Lends a bus, routed into `target_route` and loaded with `settings`.
    ///
    /// Prefers the most recently returned idle bus. If that bus's name no
    /// longer resolves, the whole idle list is discarded (see the module
    /// docs) and a fresh bus is created instead. Returns `None` when the
    /// pool is at capacity or the library cannot produce an instance; the
    /// caller is expected to fall back to the unprocessed path.
    pub fn borrow(
        &mut self,
        mixer: &mut dyn MixerGraph,
        dsp: &mut DspHost,
        target_route: &str,
        settings: &SpatialSettings,
    ) -> Option<BorrowedBus> {
        let mut pooled = None;
        if let Some(candidate) = self.idle.pop() {
            if mixer.find_bus(&candidate.name).is_some() {
                pooled = Some(candidate);
            } else {
                tracing::warn!(
                    bus = %candidate.name,
                    "pooled bus disappeared from the mixer; discarding idle list"
                );
                self.idle.clear();
            }
        }

        let pooled = match pooled {
            Some(pooled) => pooled,
            None if self.in_use < self.capacity => create_pool_bus(mixer, dsp)?,
            None => {
                tracing::debug!(capacity = self.capacity, "bus pool exhausted");
                return None;
            }
        };

        self.in_use += 1;

        // Order matters: the instance may still carry the previous
        // borrower's state, so the snapshot lands before the bus becomes
        // audible via the send.
        push_snapshot(&pooled.processor, settings);
        if let Some(index) = mixer.find_bus(&pooled.name) {
            mixer.set_bus_send(index, target_route);
        }

        Some(BorrowedBus {
            name: pooled.name,
            processor: pooled.processor,
        })
    }

    /// Takes a bus back from an emitter.
    ///
    /// If there is room it goes back on top of the idle stack (and will be
    /// the next one lent); otherwise the bus is removed from the mixer and
    /// its processor instance released.
    pub fn return_bus(&mut self, mixer: &mut dyn MixerGraph, bus: BorrowedBus) {
        self.in_use = self.in_use.saturating_sub(1);
        if self.idle.len() + self.in_use < self.capacity {
            self.idle.push(PooledBus {
                name: bus.name,
                processor: bus.processor,
            });
        } else {
            destroy_bus(mixer, &bus.name);
        }
    }

    /// Returns the name of the always-muted sink bus, creating it if
    /// needed.
    ///
    /// The silent bus is not part of the pool accounting. Its existence and
    /// mute flag are re-asserted on every call, since the mixer may have
    /// been mutated out-of-band.
    pub fn silent_bus(&mut self, mixer: &mut dyn MixerGraph) -> String {
        let index = match mixer.find_bus(SILENT_BUS_NAME) {
            Some(index) => index,
            None => {
                let (index, _) = allocate_bus(mixer, SILENT_BUS_NAME);
                index
            }
        };
        mixer.set_bus_mute(index, true);
        SILENT_BUS_NAME.to_string()
    }
}

/// Creates a uniquely named pool bus with a fresh processor bound to it.
fn create_pool_bus(mixer: &mut dyn MixerGraph, dsp: &mut DspHost) -> Option<PooledBus> {
    let processor = dsp.create_instance()?;
    let (index, name) = allocate_bus(mixer, POOL_BUS_NAME);
    mixer.add_bus_effect(index, SharedProcessor::clone(&processor));
    tracing::debug!(bus = %name, "created spatializer bus");
    Some(PooledBus { name, processor })
}

/// Adds a bus under `base`, suffixing a counter until the name is free.
///
/// The returned index is only valid until the next mixer mutation; use it
/// immediately or re-resolve by name.
fn allocate_bus(mixer: &mut dyn MixerGraph, base: &str) -> (usize, String) {
    let mut name = base.to_string();
    let mut attempt = 1u32;
    while mixer.find_bus(&name).is_some() {
        attempt += 1;
        name = format!("{base} {attempt}");
    }
    let index = mixer.add_bus();
    mixer.set_bus_name(index, &name);
    (index, name)
}

fn destroy_bus(mixer: &mut dyn MixerGraph, name: &str) {
    // Resolve fresh; the index from creation time means nothing now. A miss
    // means something external already deleted it, which is fine.
    if let Some(index) = mixer.find_bus(name) {
        mixer.remove_bus(index);
    }
    tracing::debug!(bus = %name, "destroyed spatializer bus");
}
