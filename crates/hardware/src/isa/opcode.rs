//! Opcode table.
//!
//! Opcode 20 is HALT. The source this machine was modeled on carries a second, conflicting HALT
//! encoding (21) in a duplicated file; 20 is the primary header's value and is authoritative
//! here. Any opcode with no table entry is Reserved and behaves as a NOP that still retires.

/// One of the architecturally-defined opcodes, or a reserved value that retires as a NOP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// `rd = rs + rt`
    Add,
    /// `rd = rs - rt`
    Sub,
    /// `rd = rs & rt`
    And,
    /// `rd = rs | rt`
    Or,
    /// `rd = rs ^ rt`
    Xor,
    /// `rd = rs * rt`
    Mul,
    /// `rd = rs << (rt & 0x1F)`
    Sll,
    /// `rd = rs >> (rt & 0x1F)` (arithmetic)
    Sra,
    /// `rd = rs >> (rt & 0x1F)` (logical)
    Srl,
    /// Branch if `rs == rt`
    Beq,
    /// Branch if `rs != rt`
    Bne,
    /// Branch if `rs < rt` (signed)
    Blt,
    /// Branch if `rs > rt` (signed)
    Bgt,
    /// Branch if `rs <= rt` (signed)
    Ble,
    /// Branch if `rs >= rt` (signed)
    Bge,
    /// Unconditional jump; latches the return address for R15.
    Jal,
    /// Load word from `rs + rt`.
    Lw,
    /// Store word to `rs + rt`.
    Sw,
    /// Halts the issuing core.
    Halt,
    /// Any opcode with no architectural meaning; retires as a NOP.
    Reserved,
}

impl Opcode {
    /// Decodes the 8-bit opcode field into an [`Opcode`].
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::And,
            3 => Self::Or,
            4 => Self::Xor,
            5 => Self::Mul,
            6 => Self::Sll,
            7 => Self::Sra,
            8 => Self::Srl,
            9 => Self::Beq,
            10 => Self::Bne,
            11 => Self::Blt,
            12 => Self::Bgt,
            13 => Self::Ble,
            14 => Self::Bge,
            15 => Self::Jal,
            16 => Self::Lw,
            17 => Self::Sw,
            20 => Self::Halt,
            _ => Self::Reserved,
        }
    }

    /// Returns whether this opcode is one of the six conditional branches.
    #[inline]
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Beq | Self::Bne | Self::Blt | Self::Bgt | Self::Ble | Self::Bge
        )
    }

    /// Returns whether this opcode reads `rd` as a source (branches, JAL, SW).
    #[inline]
    #[must_use]
    pub const fn reads_rd_as_source(self) -> bool {
        self.is_branch() || matches!(self, Self::Jal | Self::Sw)
    }

    /// Returns whether this opcode writes its ALU result to `rd` in writeback.
    #[inline]
    #[must_use]
    pub const fn writes_alu_to_rd(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::And | Self::Or | Self::Xor | Self::Mul | Self::Sll | Self::Sra | Self::Srl
        )
    }
}
