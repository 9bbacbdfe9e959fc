//! Shared test infrastructure: a temp-directory-backed harness that round-trips a program
//! through the same file formats the CLI uses, so integration tests exercise `io::loaders`
//! and `io::writers` rather than only `Simulator`'s in-memory API.

use mesi_core::config::NUM_CORES;
use mesi_core::{io, Simulator};
use std::path::PathBuf;

pub struct FileHarness {
    dir: tempfile::TempDir,
}

impl FileHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir for test harness"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `words` as 8-hex-digit lines to `name` under the harness's temp dir, returning
    /// the path as a string for handing to a loader.
    pub fn write_hex_file(&self, name: &str, words: &[u32]) -> String {
        let contents: String = words.iter().map(|w| format!("{w:08X}\n")).collect();
        std::fs::write(self.path(name), contents).expect("write test input file");
        self.path(name).to_str().expect("utf8 path").to_string()
    }

    pub fn output_path(&self, name: &str) -> String {
        self.path(name).to_str().expect("utf8 path").to_string()
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read test output file")
    }
}

/// Loads `imem` into core 0 via the real loader round-trip (file on disk, not `load_imem`
/// directly), every other core gets a lone HALT, runs to completion, and flushes dirty caches
/// the way the CLI does before dumping output.
pub fn run_single_core_program(harness: &FileHarness, imem: &[u32]) -> Simulator {
    let mut sim = Simulator::new();
    let path = harness.write_hex_file("imem0.txt", imem);
    sim.load_imem(0, &io::loaders::load_imem(&path));
    for id in 1..NUM_CORES {
        sim.load_imem(id, &[0x1400_0000]); // HALT (opcode 20 << 24)
    }
    sim.run().expect("simulation to converge within the watchdog");
    sim.flush_dirty_caches();
    sim
}
