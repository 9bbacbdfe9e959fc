//! Per-core state: register file, pipeline latches, pipeline stages, cache, and the cycle
//! state machine.

/// The 16-entry signed 32-bit register file.
pub mod registers;
/// IF/ID, ID/EX, EX/MEM, MEM/WB pipeline latches.
pub mod latches;
/// Decode-stage hazard detection.
pub mod hazards;
/// The five pipeline stage functions.
pub mod stages;
/// Per-core cycle state machine.
pub mod state;
/// Private direct-mapped write-back cache with MESI line state.
pub mod cache;
/// The `Core` struct tying register file, pipeline, cache, and state machine together.
pub mod core_unit;

pub use core_unit::Core;
pub use state::CoreState;
