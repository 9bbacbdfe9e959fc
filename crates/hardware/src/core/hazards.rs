//! Decode-stage hazard detection.
//!
//! The register file does not forward: a value written in WB is visible only starting the next
//! cycle's decode read. Decode must therefore stall whenever one of its source registers is the
//! destination of an instruction still in ID/EX, EX/MEM, or MEM/WB.

use crate::core::latches::{ExMem, IdEx, MemWb};
use crate::isa::{Instruction, Opcode};

/// Returns the architectural register an instruction will write in writeback, if any.
///
/// JAL writes register 15 regardless of its `rd` field; SW, branches, HALT, and reserved
/// opcodes write nothing.
#[must_use]
pub fn destination_register(inst: &Instruction) -> Option<usize> {
    match inst.opcode {
        Opcode::Jal => Some(crate::core::registers::RETURN_ADDRESS_REG),
        Opcode::Lw => Some(inst.rd),
        _ if inst.opcode.writes_alu_to_rd() => Some(inst.rd),
        _ => None,
    }
}

/// Returns whether decoding `inst` must stall given the in-flight destinations of the three
/// downstream latches.
///
/// Destinations of 0 or 1 never count (R0 is hardwired, R1 is decoder-owned and re-written every
/// cycle regardless). Source registers examined are rs and rt always, plus rd for every branch,
/// JAL, and SW, since those read rd as the branch target / return check / store data source.
#[must_use]
pub fn need_decode_stall(inst: &Instruction, id_ex: &IdEx, ex_mem: &ExMem, mem_wb: &MemWb) -> bool {
    let mut in_flight = Vec::with_capacity(3);
    if id_ex.valid {
        if let Some(d) = id_ex.inst.as_ref().and_then(destination_register) {
            in_flight.push(d);
        }
    }
    if ex_mem.valid {
        if let Some(d) = ex_mem.inst.as_ref().and_then(destination_register) {
            in_flight.push(d);
        }
    }
    if mem_wb.valid {
        if let Some(d) = mem_wb.inst.as_ref().and_then(destination_register) {
            in_flight.push(d);
        }
    }
    in_flight.retain(|&d| d > 1);

    let mut sources = vec![inst.rs, inst.rt];
    if inst.opcode.reads_rd_as_source() {
        sources.push(inst.rd);
    }

    sources.iter().any(|s| in_flight.contains(s))
}
