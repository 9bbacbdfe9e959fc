//! The five pipeline stage functions and the per-core cycle orchestration that calls them in
//! the order hardware would evaluate them: writeback, memory, execute, decode, fetch.
//!
//! Decode's hazard check reads the ID/EX, EX/MEM, and MEM/WB latches as they stood at the start
//! of the cycle, before memory/execute overwrite them — the two-phase "read old, commit new"
//! rule from §5. `tick` therefore snapshots those three latches before running memory/execute.

use crate::common::addr::WordAddr;
use crate::core::cache::Probe;
use crate::core::core_unit::Core;
use crate::core::hazards::need_decode_stall;
use crate::core::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::registers::RETURN_ADDRESS_REG;
use crate::core::state::CoreState;
use crate::isa::{Instruction, Opcode};

/// Runs one full cycle for `core`: writeback, memory, execute, decode, fetch, in that order,
/// honoring the decode-stall and memory-stall freezes from §4.1.
pub fn tick(core: &mut Core) {
    let prev_id_ex = core.id_ex.clone();
    let prev_ex_mem = core.ex_mem.clone();
    let prev_mem_wb = core.mem_wb.clone();

    writeback_stage(core);
    memory_stage(core);

    // A miss detected by the call above freezes everything upstream starting this very cycle,
    // not the next one — otherwise execute_stage would overwrite the EX/MEM latch the retry
    // depends on before the bus has had a chance to service it.
    if matches!(core.state, CoreState::MemStall | CoreState::WaitingForBus) {
        return;
    }

    execute_stage(core);
    let stalled = decode_stage(core, &prev_id_ex, &prev_ex_mem, &prev_mem_wb);
    if stalled {
        core.stats.decode_stall += 1;
    }
    // HALT retiring this cycle (set by writeback_stage above) is sticky; a hazard check result
    // from the same cycle must never revert it back to Running or DecodeStall.
    if core.state != CoreState::Halted {
        core.state = if stalled {
            CoreState::DecodeStall
        } else {
            CoreState::Running
        };
    }
    // The delay-slot instruction is whatever `pc` already points at before a branch/JAL resolved
    // this cycle; fetch must read it before the redirect takes effect for the cycle after.
    fetch_stage(core, stalled);
    if let Some(target) = core.pending_redirect.take() {
        core.pc = target;
    }
}

/// Fetch: reads the instruction at the current PC into IF/ID and advances PC, unless halted or a
/// decode stall is in effect.
///
/// A decode stall leaves IF/ID exactly as it was (the same instruction must be re-offered to
/// decode next cycle), but HALT retiring invalidates IF/ID outright — otherwise the same stale
/// instruction would keep re-decoding and re-retiring forever, and the pipeline would never
/// report itself empty.
fn fetch_stage(core: &mut Core, decode_stalled: bool) {
    if core.state == CoreState::Halted {
        core.if_id = IfId::default();
        return;
    }
    if decode_stalled {
        return;
    }
    let word = core.imem[core.pc as usize];
    core.if_id = IfId {
        valid: true,
        pc: core.pc,
        inst: word,
    };
    core.pc = (core.pc + 1) % (1 << crate::config::PC_BITS);
}

/// Decode: always rewrites R1 with the decoded immediate, checks the hazard set against the
/// pre-cycle ID/EX, EX/MEM, MEM/WB latches, resolves branches, and either produces a bubble
/// (stall) or a new ID/EX.
///
/// Returns whether a decode stall was asserted this cycle.
fn decode_stage(core: &mut Core, prev_id_ex: &IdEx, prev_ex_mem: &ExMem, prev_mem_wb: &MemWb) -> bool {
    if !core.if_id.valid {
        core.id_ex = IdEx::default();
        return false;
    }

    let inst = Instruction::decode(core.if_id.inst);
    core.regs.set_decoded_immediate(inst.imm);

    if need_decode_stall(&inst, prev_id_ex, prev_ex_mem, prev_mem_wb) {
        core.id_ex = IdEx::default();
        return true;
    }

    let rs_val = core.regs.read(inst.rs);
    let rt_val = core.regs.read(inst.rt);
    let rd_val = core.regs.read(inst.rd);

    let mut jal_return = 0;
    if inst.opcode == Opcode::Jal {
        jal_return = ((core.if_id.pc + 1) % (1 << crate::config::PC_BITS)) as i32;
        core.pending_redirect = Some((rd_val as u32) % (1 << crate::config::PC_BITS));
    } else if inst.opcode.is_branch() {
        let taken = match inst.opcode {
            Opcode::Beq => rs_val == rt_val,
            Opcode::Bne => rs_val != rt_val,
            Opcode::Blt => rs_val < rt_val,
            Opcode::Bgt => rs_val > rt_val,
            Opcode::Ble => rs_val <= rt_val,
            Opcode::Bge => rs_val >= rt_val,
            _ => unreachable!(),
        };
        if taken {
            core.pending_redirect = Some((rd_val as u32) % (1 << crate::config::PC_BITS));
        }
    }

    core.id_ex = IdEx {
        valid: true,
        pc: core.if_id.pc,
        inst: Some(inst),
        rs_val,
        rt_val,
        rd_val,
        jal_return,
    };
    false
}

/// Execute: computes the ALU result (or effective address, or JAL's carried-through return
/// address) from ID/EX into EX/MEM.
fn execute_stage(core: &mut Core) {
    if !core.id_ex.valid {
        core.ex_mem = ExMem::default();
        return;
    }
    let latch = core.id_ex.clone();
    let Some(inst) = latch.inst else {
        core.ex_mem = ExMem::default();
        return;
    };

    let (alu_result, store_data) = match inst.opcode {
        Opcode::Add => (latch.rs_val.wrapping_add(latch.rt_val), 0),
        Opcode::Sub => (latch.rs_val.wrapping_sub(latch.rt_val), 0),
        Opcode::And => (latch.rs_val & latch.rt_val, 0),
        Opcode::Or => (latch.rs_val | latch.rt_val, 0),
        Opcode::Xor => (latch.rs_val ^ latch.rt_val, 0),
        Opcode::Mul => (latch.rs_val.wrapping_mul(latch.rt_val), 0),
        Opcode::Sll => (latch.rs_val.wrapping_shl((latch.rt_val & 0x1F) as u32), 0),
        Opcode::Sra => (latch.rs_val.wrapping_shr((latch.rt_val & 0x1F) as u32), 0),
        Opcode::Srl => (
            ((latch.rs_val as u32).wrapping_shr((latch.rt_val & 0x1F) as u32)) as i32,
            0,
        ),
        Opcode::Lw | Opcode::Sw => (latch.rs_val.wrapping_add(latch.rt_val), latch.rd_val),
        Opcode::Jal => (latch.jal_return, 0),
        _ => (0, 0),
    };

    core.ex_mem = ExMem {
        valid: true,
        pc: latch.pc,
        inst: Some(inst),
        alu_result,
        store_data,
    };
}

/// Memory: services LW/SW against the cache, stalling on a miss until the bus fills the block;
/// any other opcode passes its EX/MEM result straight through.
fn memory_stage(core: &mut Core) {
    if matches!(core.state, CoreState::MemStall | CoreState::WaitingForBus) {
        retry_stalled_access(core);
        return;
    }

    if !core.ex_mem.valid {
        core.mem_wb = MemWb::default();
        return;
    }
    let latch = core.ex_mem.clone();
    let Some(inst) = latch.inst else {
        core.mem_wb = MemWb::default();
        return;
    };

    match inst.opcode {
        Opcode::Lw => {
            let addr = WordAddr::new(latch.alu_result as u32);
            match core.cache.probe_read(addr) {
                Probe::Hit => {
                    core.stats.read_hit += 1;
                    let word = core.cache.read_word(addr);
                    commit_mem_wb(core, latch, inst, word);
                }
                Probe::Miss => {
                    core.stats.read_miss += 1;
                    core.stats.mem_stall += 1;
                    core.raise_request(addr, false, None);
                    core.mem_wb = MemWb::default();
                    core.state = CoreState::MemStall;
                }
            }
        }
        Opcode::Sw => {
            let addr = WordAddr::new(latch.alu_result as u32);
            match core.cache.probe_write(addr) {
                Probe::Hit => {
                    core.stats.write_hit += 1;
                    core.cache.commit_write_hit(addr, latch.store_data);
                    commit_mem_wb(core, latch, inst, 0);
                }
                Probe::Miss => {
                    core.stats.write_miss += 1;
                    core.stats.mem_stall += 1;
                    core.raise_request(addr, true, Some(latch.store_data));
                    core.mem_wb = MemWb::default();
                    core.state = CoreState::MemStall;
                }
            }
        }
        _ => {
            core.mem_wb = MemWb {
                valid: true,
                pc: latch.pc,
                inst: Some(inst),
                alu_result: latch.alu_result,
                mem_data: 0,
            };
        }
    }
}

fn commit_mem_wb(core: &mut Core, latch: ExMem, inst: Instruction, mem_data: i32) {
    core.mem_wb = MemWb {
        valid: true,
        pc: latch.pc,
        inst: Some(inst),
        alu_result: latch.alu_result,
        mem_data,
    };
}

/// While MemStall or WaitingForBus, EX/MEM is frozen and produces no writeback; the bus module
/// moves the core back to Running once the fill completes, at which point the next call to
/// `memory_stage` takes the normal path and re-probes the now-filled cache.
fn retry_stalled_access(core: &mut Core) {
    core.stats.mem_stall += 1;
    core.mem_wb = MemWb::default();
}

/// Writeback: commits MEM/WB into the register file (or sets `halted` for HALT), and increments
/// the instruction counter for every instruction that reaches this stage — a bubble does not.
fn writeback_stage(core: &mut Core) {
    core.last_wb_pc = None;
    if !core.mem_wb.valid {
        return;
    }
    let latch = core.mem_wb.clone();
    let Some(inst) = latch.inst else { return };
    core.last_wb_pc = Some(latch.pc);

    match inst.opcode {
        Opcode::Halt => {
            core.halted = true;
            core.state = CoreState::Halted;
        }
        Opcode::Jal => core.regs.write(RETURN_ADDRESS_REG, latch.alu_result),
        Opcode::Lw => core.regs.write(inst.rd, latch.mem_data),
        _ if inst.opcode.writes_alu_to_rd() => core.regs.write(inst.rd, latch.alu_result),
        _ => {}
    }
    core.stats.instructions += 1;
}
