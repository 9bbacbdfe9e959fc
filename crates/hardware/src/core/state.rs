//! Per-core cycle state machine.

/// The state driving whether a core fetches/decodes this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CoreState {
    /// Normal operation: all stages may advance subject to latch validity.
    #[default]
    Running,
    /// Decode detected a RAW hazard; IF/ID is frozen and no new fetch occurs.
    DecodeStall,
    /// Memory stage issued a cache miss and is waiting on the bus request to be granted.
    MemStall,
    /// The miss has been granted; waiting for the memory controller to finish the flush.
    WaitingForBus,
    /// HALT has retired; the pipeline may still drain stages behind it.
    Halted,
}

impl CoreState {
    /// Whether this core's cycle counter should advance this cycle: any state except a core
    /// that is Halted with a fully drained pipeline (checked separately by the caller).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted)
    }
}
