//! The `Simulator`: the single owning aggregate of the four cores, the bus, and main memory.
//!
//! Everything is plain composition from this one struct — no cross-linked ownership between
//! core, bus, and simulator, per §9. The run loop below is the only place the §2 cycle ordering
//! is encoded.

use crate::bus::Bus;
use crate::common::error::SimError;
use crate::config::{MAX_CYCLES, MEM_WORDS, NUM_CORES};
use crate::core::core_unit::Core;
use crate::core::stages;
use crate::io::trace::render_core_line;

/// Owns the whole machine for one run: four cores, the shared bus, and main memory.
pub struct Simulator {
    /// The four cores.
    pub cores: [Core; NUM_CORES],
    /// The shared bus and memory controller.
    pub bus: Bus,
    /// Main memory, 2^21 words.
    pub memory: Vec<i32>,
    /// Global cycle counter.
    pub cycle: u64,
    /// Accumulated core-trace lines, one `Vec` per core.
    pub core_trace: [Vec<String>; NUM_CORES],
    /// Accumulated bus-trace lines.
    pub bus_trace: Vec<String>,
}

impl Simulator {
    /// Builds an idle simulator with zero-filled memory and idle cores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cores: std::array::from_fn(Core::new),
            bus: Bus::new(),
            memory: vec![0; MEM_WORDS],
            cycle: 0,
            core_trace: std::array::from_fn(|_| Vec::new()),
            bus_trace: Vec::new(),
        }
    }

    /// Loads `words` into core `id`'s instruction memory, zero-padding any remainder already in
    /// place from construction.
    pub fn load_imem(&mut self, id: usize, words: &[u32]) {
        let len = words.len().min(self.cores[id].imem.len());
        self.cores[id].imem[..len].copy_from_slice(&words[..len]);
    }

    /// Loads `words` into main memory, zero-padding any remainder already in place.
    pub fn load_memory(&mut self, words: &[i32]) {
        let len = words.len().min(self.memory.len());
        self.memory[..len].copy_from_slice(&words[..len]);
    }

    /// Runs the simulation to completion, per the cycle ordering in §2, until every core has
    /// halted with an empty, bus-quiescent pipeline, or the watchdog trips.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.is_done() {
            if self.cycle >= MAX_CYCLES {
                tracing::error!(cycles = self.cycle, "simulation watchdog exceeded");
                return Err(SimError::WatchdogExceeded { cycles: self.cycle });
            }
            self.step();
        }
        Ok(())
    }

    /// The simulation is done once every core has retired HALT, drained its pipeline, and is not
    /// waiting on the bus, and the bus itself has no transaction in progress (§4.5).
    #[must_use]
    fn is_done(&self) -> bool {
        self.cores
            .iter()
            .all(|c| c.halted && c.pipeline_is_empty() && !c.waiting_for_bus)
            && !self.bus.transaction_in_progress()
    }

    /// Writes every core's Modified cache lines back into main memory. Call once after `run()`
    /// and before dumping the memory image: a write-back cache otherwise leaves committed stores
    /// sitting in cache, never reflected in `memory`.
    pub fn flush_dirty_caches(&mut self) {
        let Self { cores, memory, .. } = self;
        for core in cores.iter() {
            core.cache.flush_modified_into(memory);
        }
    }

    /// Advances the machine by exactly one cycle, in the §2 order: per-core pre-cycle trace and
    /// cycle-counter bump, bus step, core pipeline step, global cycle bump.
    fn step(&mut self) {
        for (i, core) in self.cores.iter_mut().enumerate() {
            if core.is_active() {
                core.stats.cycles += 1;
            }
            if let Some(line) = render_core_line(core, self.cycle) {
                self.core_trace[i].push(line);
            }
        }

        if let Some(line) = self.bus.tick(&mut self.cores, &mut self.memory, self.cycle) {
            self.bus_trace.push(line.render());
        }

        for core in &mut self.cores {
            stages::tick(core);
        }

        self.cycle += 1;
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
