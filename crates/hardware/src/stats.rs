//! Per-core statistics collection and the eight-line stats file format.

/// The eight counters the statistics file reports, in file order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoreStats {
    /// Cycles this core was active (ticked).
    pub cycles: u64,
    /// Instructions retired in writeback, including HALT.
    pub instructions: u64,
    /// Cache read hits.
    pub read_hit: u64,
    /// Cache write hits.
    pub write_hit: u64,
    /// Cache read misses (counted once per miss, not per retry poll).
    pub read_miss: u64,
    /// Cache write misses, including Shared-state upgrade misses.
    pub write_miss: u64,
    /// Cycles a decode stall was asserted.
    pub decode_stall: u64,
    /// Cycles a memory stall (MemStall or WaitingForBus) was in effect.
    pub mem_stall: u64,
}

impl CoreStats {
    /// Renders the eight `name value` lines in the documented order.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "cycles {}\ninstructions {}\nread_hit {}\nwrite_hit {}\nread_miss {}\nwrite_miss {}\ndecode_stall {}\nmem_stall {}\n",
            self.cycles,
            self.instructions,
            self.read_hit,
            self.write_hit,
            self.read_miss,
            self.write_miss,
            self.decode_stall,
            self.mem_stall,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_all_eight_fields_in_order() {
        let s = CoreStats {
            cycles: 1,
            instructions: 2,
            read_hit: 3,
            write_hit: 4,
            read_miss: 5,
            write_miss: 6,
            decode_stall: 7,
            mem_stall: 8,
        };
        let lines: Vec<&str> = s.render().lines().collect();
        assert_eq!(
            lines,
            vec![
                "cycles 1",
                "instructions 2",
                "read_hit 3",
                "write_hit 4",
                "read_miss 5",
                "write_miss 6",
                "decode_stall 7",
                "mem_stall 8",
            ]
        );
    }
}
