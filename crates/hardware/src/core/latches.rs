//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch carries a `valid` flag, the source PC, the decoded instruction, and whatever
//! stage-specific values downstream stages need. An invalid latch represents a bubble: it
//! produces no writeback and contributes no hazard or destination register.

use crate::isa::Instruction;

/// IF/ID latch: fetched instruction, not yet decoded.
#[derive(Clone, Debug, Default)]
pub struct IfId {
    /// Whether this latch holds a real instruction (vs. a bubble).
    pub valid: bool,
    /// Program counter the instruction was fetched from.
    pub pc: u32,
    /// Raw fetched word, decoded lazily in the decode stage.
    pub inst: u32,
}

/// ID/EX latch: decoded instruction with its operand values.
#[derive(Clone, Debug, Default)]
pub struct IdEx {
    /// Whether this latch holds a real instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Option<Instruction>,
    /// Value read from rs.
    pub rs_val: i32,
    /// Value read from rt.
    pub rt_val: i32,
    /// Value read from rd (used as a source by branches, JAL, and SW).
    pub rd_val: i32,
    /// Pre-computed return address for JAL (PC + 1, masked), carried through EX unchanged.
    pub jal_return: i32,
}

/// EX/MEM latch: ALU result and the values a memory op needs.
#[derive(Clone, Debug, Default)]
pub struct ExMem {
    /// Whether this latch holds a real instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Option<Instruction>,
    /// ALU result, or the JAL return address, or the LW/SW effective address.
    pub alu_result: i32,
    /// Value to store, for SW.
    pub store_data: i32,
}

/// MEM/WB latch: final value to commit to the register file.
#[derive(Clone, Debug, Default)]
pub struct MemWb {
    /// Whether this latch holds a real instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Decoded instruction.
    pub inst: Option<Instruction>,
    /// ALU result (for non-load instructions).
    pub alu_result: i32,
    /// Word loaded from the cache, for LW.
    pub mem_data: i32,
}
