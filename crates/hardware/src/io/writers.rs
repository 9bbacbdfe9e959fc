//! Output file writers: memory image, register dump, cache dumps, and stats.
//!
//! All of these are best-effort per §7 — a failed create or write is logged and otherwise
//! ignored, since simulation itself cannot fail once it has started.

use crate::core::core_unit::Core;
use std::fs::File;
use std::io::Write as _;

fn write_best_effort(path: &str, contents: &str) {
    match File::create(path) {
        Ok(mut file) => {
            if let Err(err) = file.write_all(contents.as_bytes()) {
                tracing::warn!(%path, %err, "failed writing output file");
            }
        }
        Err(err) => tracing::warn!(%path, %err, "cannot create output file"),
    }
}

/// Writes words 0 through the highest non-zero address inclusive, one uppercase hex word per
/// line.
pub fn write_memout(path: &str, memory: &[i32]) {
    let last = memory.iter().rposition(|&w| w != 0).unwrap_or(0);
    let mut out = String::new();
    for word in &memory[..=last] {
        out.push_str(&format!("{:08X}\n", *word as u32));
    }
    write_best_effort(path, &out);
}

/// Writes R2..R15 only, one hex word per line.
pub fn write_regout(path: &str, core: &Core) {
    let mut out = String::new();
    for word in core.regs.dump_r2_r15() {
        out.push_str(&format!("{:08X}\n", word as u32));
    }
    write_best_effort(path, &out);
}

/// Writes the 512-word data-cache dump in linear line order.
pub fn write_dsram(path: &str, core: &Core) {
    let mut out = String::new();
    for word in core.cache.dump_data() {
        out.push_str(&format!("{:08X}\n", word as u32));
    }
    write_best_effort(path, &out);
}

/// Writes the 64-entry `(tag << 2) | mesi` tag-cache dump.
pub fn write_tsram(path: &str, core: &Core) {
    let mut out = String::new();
    for word in core.cache.dump_tags() {
        out.push_str(&format!("{word:08X}\n"));
    }
    write_best_effort(path, &out);
}

/// Writes the eight-line statistics file.
pub fn write_stats(path: &str, core: &Core) {
    write_best_effort(path, &core.stats.render());
}
