//! Input file loaders: instruction memory and the main memory image.
//!
//! Both formats are the same shape — one 8-hex-digit word per non-blank line — so they share a
//! parser and differ only in their target size and the destination array's element type.

use crate::config::{IMEM_WORDS, MEM_WORDS};
use std::fs;

/// Parses the leading contiguous run of hex digits in `trimmed`, ignoring anything after it —
/// matching `sscanf(p, "%x", &inst)`'s prefix match rather than requiring the whole line to be
/// hex. A line with no hex digits at its start (including one that's entirely non-hex) yields
/// `None`, the same as a failed `sscanf`.
fn parse_hex_prefix(trimmed: &str) -> Option<u32> {
    let end = trimmed
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    u32::from_str_radix(&trimmed[..end], 16).ok()
}

fn read_hex_words(path: &str, limit: usize) -> Vec<u32> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(%path, %err, "cannot open input file, treating as empty");
            return Vec::new();
        }
    };
    contents
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                parse_hex_prefix(trimmed)
            }
        })
        .take(limit)
        .collect()
}

/// Loads a per-core instruction-memory file, zero-padded to [`IMEM_WORDS`].
#[must_use]
pub fn load_imem(path: &str) -> Vec<u32> {
    let mut words = vec![0u32; IMEM_WORDS];
    for (i, w) in read_hex_words(path, IMEM_WORDS).into_iter().enumerate() {
        words[i] = w;
    }
    words
}

/// Loads the main-memory image file, zero-padded to [`MEM_WORDS`].
#[must_use]
pub fn load_memin(path: &str) -> Vec<i32> {
    let mut words = vec![0i32; MEM_WORDS];
    for (i, w) in read_hex_words(path, MEM_WORDS).into_iter().enumerate() {
        words[i] = w as i32;
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn loads_hex_lines_and_skips_blank_and_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0000000A").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not hex").unwrap();
        writeln!(file, "0000000B").unwrap();
        let path = file.path().to_str().unwrap();

        let imem = load_imem(path);
        assert_eq!(imem[0], 0xA);
        assert_eq!(imem[1], 0xB);
        assert_eq!(imem[2], 0);
    }

    #[test]
    fn trailing_garbage_after_a_hex_prefix_still_parses_the_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0000000A garbage").unwrap();
        writeln!(file, "not hex").unwrap();
        let path = file.path().to_str().unwrap();

        let imem = load_imem(path);
        assert_eq!(imem[0], 0xA);
        assert_eq!(imem[1], 0);
    }

    #[test]
    fn missing_file_loads_as_zero() {
        let memin = load_memin("/nonexistent/path/for/mesi-sim-tests.txt");
        assert!(memin.iter().all(|&w| w == 0));
        assert_eq!(memin.len(), MEM_WORDS);
    }
}
