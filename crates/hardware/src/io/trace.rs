//! Core-trace line rendering (§6). The bus-trace line format lives with [`crate::bus::trace`]
//! since it has no per-core state to borrow.

use crate::core::core_unit::Core;

/// Renders one core-trace line if any pipeline latch is valid or a WB completed last cycle;
/// returns `None` otherwise (the line is skipped entirely, not blanked).
#[must_use]
pub fn render_core_line(core: &Core, cycle: u64) -> Option<String> {
    let any_active = core.if_id.valid
        || core.id_ex.valid
        || core.ex_mem.valid
        || core.mem_wb.valid
        || core.last_wb_pc.is_some();
    if !any_active {
        return None;
    }

    let field = |valid: bool, pc: u32| -> String {
        if valid {
            format!("{:03X}", pc & 0x3FF)
        } else {
            "---".to_string()
        }
    };
    let wb_field = match core.last_wb_pc {
        Some(pc) => format!("{:03X}", pc & 0x3FF),
        None => "---".to_string(),
    };

    let mut out = format!(
        "{} {} {} {} {} {}",
        cycle,
        field(core.if_id.valid, core.if_id.pc),
        field(core.id_ex.valid, core.id_ex.pc),
        field(core.ex_mem.valid, core.ex_mem.pc),
        field(core.mem_wb.valid, core.mem_wb.pc),
        wb_field,
    );
    for word in core.regs.dump_r2_r15() {
        out.push(' ');
        out.push_str(&format!("{word:08X}", word = word as u32));
    }
    out.push('\n');
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::latches::IfId;

    #[test]
    fn skips_line_when_pipeline_fully_idle() {
        let core = Core::new(0);
        assert!(render_core_line(&core, 5).is_none());
    }

    #[test]
    fn renders_dashes_for_invalid_latches() {
        let mut core = Core::new(0);
        core.if_id = IfId {
            valid: true,
            pc: 0x123,
            inst: 0,
        };
        let line = render_core_line(&core, 5).unwrap();
        assert!(line.starts_with("5 123 --- --- --- ---"));
    }
}
