//! Simulator configuration: architectural constants and the 27 file paths.
//!
//! This module provides:
//! 1. **Constants:** the fixed architectural parameters §3–§4 depend on (core count, memory
//!    size, cache geometry, flush timing, the watchdog bound).
//! 2. **Paths:** the 27 positional file paths from §6, with the documented defaults used when
//!    the CLI is invoked with zero arguments.

/// Number of cores in the machine.
pub const NUM_CORES: usize = 4;
/// Depth of each core's private instruction memory, in instructions.
pub const IMEM_WORDS: usize = 1024;
/// Width of the program counter, in bits; the PC wraps modulo `1 << PC_BITS`.
pub const PC_BITS: u32 = 10;
/// Size of main memory, in words.
pub const MEM_WORDS: usize = 1 << 21;
/// Number of lines in each private cache.
pub const CACHE_LINES: usize = 64;
/// Number of words per cache line.
pub const LINE_WORDS: usize = 8;
/// Cycles the memory controller holds a granted transaction before the first flush word.
pub const MEM_LATENCY_CYCLES: u64 = 16;
/// Safety bound on total cycles; exceeding it aborts the run with [`crate::SimError::WatchdogExceeded`].
pub const MAX_CYCLES: u64 = 1_000_000;

/// The 27 file paths a run reads from and writes to, in CLI positional order.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Per-core instruction memory input files.
    pub imem: [String; NUM_CORES],
    /// Main memory image input file.
    pub memin: String,
    /// Main memory image output file.
    pub memout: String,
    /// Per-core register dump output files.
    pub regout: [String; NUM_CORES],
    /// Per-core cycle-trace output files.
    pub core_trace: [String; NUM_CORES],
    /// Shared bus-trace output file.
    pub bus_trace: String,
    /// Per-core data-cache dump output files.
    pub dsram: [String; NUM_CORES],
    /// Per-core tag-cache dump output files.
    pub tsram: [String; NUM_CORES],
    /// Per-core statistics output files.
    pub stats: [String; NUM_CORES],
}

/// Number of positional CLI arguments when paths are given explicitly (`4*5 + 2 + 1`).
pub const EXPECTED_ARG_COUNT: usize = 27;

impl Default for Paths {
    /// The documented default file names used when the CLI is invoked with zero arguments.
    fn default() -> Self {
        Self {
            imem: std::array::from_fn(|i| format!("imem{i}.txt")),
            memin: "memin.txt".to_string(),
            memout: "memout.txt".to_string(),
            regout: std::array::from_fn(|i| format!("regout{i}.txt")),
            core_trace: std::array::from_fn(|i| format!("core{i}trace.txt")),
            bus_trace: "bustrace.txt".to_string(),
            dsram: std::array::from_fn(|i| format!("dsram{i}.txt")),
            tsram: std::array::from_fn(|i| format!("tsram{i}.txt")),
            stats: std::array::from_fn(|i| format!("stats{i}.txt")),
        }
    }
}

impl Paths {
    /// Builds `Paths` from exactly 27 positional arguments in CLI order.
    ///
    /// # Arguments
    ///
    /// * `args` - Exactly 27 positional path strings, in the order documented in §6.
    ///
    /// # Panics
    ///
    /// Never panics in release; callers must have already verified `args.len() == EXPECTED_ARG_COUNT`
    /// (the CLI does this before calling in, returning [`crate::SimError::UsageError`] otherwise).
    #[must_use]
    pub fn from_positional(args: &[String]) -> Self {
        let take4 = |start: usize| -> [String; NUM_CORES] {
            std::array::from_fn(|i| args[start + i].clone())
        };
        Self {
            imem: take4(0),
            memin: args[4].clone(),
            memout: args[5].clone(),
            regout: take4(6),
            core_trace: take4(10),
            bus_trace: args[14].clone(),
            dsram: take4(15),
            tsram: take4(19),
            stats: take4(23),
        }
    }
}
