//! The bus trace line format from §6: one line per cycle the bus drives a non-idle command.

use crate::bus::BusCommand;

/// One bus-trace line: `cycle origid cmd addr data shared`, all but `cycle` rendered as hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusTraceLine {
    /// Simulator cycle this line was driven on.
    pub cycle: u64,
    /// Bus originator: 0..3 for a core, 4 for main memory.
    pub originator: u8,
    /// The command driven this cycle.
    pub command: BusCommand,
    /// 21-bit word address.
    pub address: u32,
    /// Data word (0 for BusRd/BusRdX, the flushed word for Flush).
    pub data: i32,
    /// Whether the shared signal was asserted.
    pub shared: bool,
}

impl BusTraceLine {
    /// Renders the line in the documented format: decimal cycle, 1-hex originator, 1-hex
    /// command, 6-hex address, 8-hex data, 1-hex shared.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{} {:X} {:X} {:06X} {:08X} {:X}\n",
            self.cycle,
            self.originator,
            self.command.encode(),
            self.address & 0x1F_FFFF,
            self.data as u32,
            u8::from(self.shared),
        )
    }
}
