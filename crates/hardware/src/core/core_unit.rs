//! The `Core` struct: one core's architectural and micro-architectural state.

use crate::common::addr::WordAddr;
use crate::config::IMEM_WORDS;
use crate::core::cache::Cache;
use crate::core::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::registers::RegisterFile;
use crate::core::state::CoreState;
use crate::stats::CoreStats;

/// A cache-miss request this core has raised but the arbiter has not yet granted.
#[derive(Clone, Copy, Debug)]
pub struct PendingRequest {
    /// Exact effective address that missed (offset included, for the eventual fill overlay).
    pub addr: WordAddr,
    /// Whether this is a BusRdX (write) rather than a BusRd (read).
    pub exclusive: bool,
}

/// One core: program counter, register file, instruction memory, pipeline latches, cache, and
/// the bus-facing request state the arbiter reads.
#[derive(Debug)]
pub struct Core {
    /// Index of this core (0..NUM_CORES), used as the bus originator id.
    pub id: usize,
    /// 10-bit program counter (always stored pre-masked).
    pub pc: u32,
    /// 16-entry signed register file.
    pub regs: RegisterFile,
    /// Private instruction memory.
    pub imem: Vec<u32>,
    /// IF/ID latch.
    pub if_id: IfId,
    /// ID/EX latch.
    pub id_ex: IdEx,
    /// EX/MEM latch.
    pub ex_mem: ExMem,
    /// MEM/WB latch.
    pub mem_wb: MemWb,
    /// PC of the instruction that committed in WB last cycle, for the core trace's last column.
    pub last_wb_pc: Option<u32>,
    /// Private cache.
    pub cache: Cache,
    /// Cycle state machine.
    pub state: CoreState,
    /// Outstanding bus request not yet granted, if any.
    pub pending_request: Option<PendingRequest>,
    /// Store data awaiting overlay once a write-miss's block finishes filling.
    pub pending_store: Option<i32>,
    /// Set once the arbiter grants this core's request; cleared when the flush completes.
    pub waiting_for_bus: bool,
    /// Set once HALT retires in WB.
    pub halted: bool,
    /// Per-core statistics.
    pub stats: CoreStats,
    /// A branch/JAL target resolved by decode this cycle, applied to `pc` only after this
    /// cycle's fetch has already run — the delay slot is the instruction that fetch reads before
    /// the redirect takes effect.
    pub pending_redirect: Option<u32>,
}

impl Core {
    /// Creates an idle core with id `id` and a zero-filled instruction memory.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            pc: 0,
            regs: RegisterFile::default(),
            imem: vec![0; IMEM_WORDS],
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            last_wb_pc: None,
            cache: Cache::default(),
            state: CoreState::Running,
            pending_request: None,
            pending_store: None,
            waiting_for_bus: false,
            halted: false,
            stats: CoreStats::default(),
            pending_redirect: None,
        }
    }

    /// Returns whether every pipeline latch is invalid — the pipeline is fully drained.
    #[must_use]
    pub fn pipeline_is_empty(&self) -> bool {
        !self.if_id.valid && !self.id_ex.valid && !self.ex_mem.valid && !self.mem_wb.valid
    }

    /// Returns whether this core's per-cycle counter should still advance: a halted core with a
    /// fully drained pipeline is inactive and never ticks again.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !(self.halted && self.pipeline_is_empty())
    }

    /// Raises a BusRd/BusRdX request for `addr` unless one is already outstanding, per §4.2's
    /// "if no request is already pending for this core". `waiting_for_bus` is asserted here, at
    /// the moment the request is raised, not at grant — it stays set across both the MemStall and
    /// WaitingForBus phases until the fill completes.
    pub fn raise_request(&mut self, addr: WordAddr, exclusive: bool, store_data: Option<i32>) {
        if self.pending_request.is_none() {
            self.pending_request = Some(PendingRequest { addr, exclusive });
            self.pending_store = store_data;
            self.waiting_for_bus = true;
        }
    }

    /// Called by the bus arbiter when this core's request is granted: clears the pending request
    /// and moves the core's state machine into `WaitingForBus`.
    pub fn mark_granted(&mut self) {
        self.pending_request = None;
        self.state = CoreState::WaitingForBus;
    }

    /// Called by the memory controller on the 8th flush word: finishes the fill, clears the
    /// waiting-for-bus and pending-store bookkeeping, and resumes normal execution.
    pub fn complete_fill_and_resume(&mut self, addr: WordAddr, final_state: crate::core::cache::MesiState) {
        self.cache.complete_fill(addr, final_state, self.pending_store);
        self.pending_store = None;
        self.waiting_for_bus = false;
        self.state = CoreState::Running;
    }
}
