//! Private direct-mapped write-back, write-allocate cache with MESI line state.
//!
//! The cache itself is a passive data structure: it reports hits/misses and snoop outcomes, but
//! does not reach across into the bus or other cores' caches. Arbitration, snoop fan-out, and
//! flush-word delivery are the bus's job (see [`crate::bus`]); this module only knows how to
//! answer "hit or miss", "what does a snoop do to me", and "how do I look once a fill completes".

use crate::common::addr::WordAddr;
use crate::config::{CACHE_LINES, LINE_WORDS};

/// MESI coherence state of a cache line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MesiState {
    /// No valid data.
    Invalid,
    /// Valid, clean, possibly shared with peers.
    Shared,
    /// Valid, clean, guaranteed sole owner.
    Exclusive,
    /// Valid, dirty, guaranteed sole owner; memory may be stale.
    Modified,
}

impl MesiState {
    /// Encodes the state as the 2-bit tag-dump field (0=I, 1=S, 2=E, 3=M).
    #[must_use]
    pub const fn encode(self) -> u32 {
        match self {
            Self::Invalid => 0,
            Self::Shared => 1,
            Self::Exclusive => 2,
            Self::Modified => 3,
        }
    }

    /// Decodes the 2-bit tag-dump field back into a state.
    #[must_use]
    pub const fn decode(bits: u32) -> Self {
        match bits & 0b11 {
            1 => Self::Shared,
            2 => Self::Exclusive,
            3 => Self::Modified,
            _ => Self::Invalid,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheLine {
    tag: u32,
    state: MesiState,
    data: [i32; LINE_WORDS],
}

impl Default for CacheLine {
    fn default() -> Self {
        Self {
            tag: 0,
            state: MesiState::Invalid,
            data: [0; LINE_WORDS],
        }
    }
}

/// Outcome of probing the cache for a read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The line is valid and its tag matches.
    Hit,
    /// The line is absent, invalid, or (for a write) present only in Shared (an upgrade miss).
    Miss,
}

/// Outcome of a peer's snoop of this cache on a granted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnoopOutcome {
    /// This cache had no valid copy of the block.
    NotValid,
    /// This cache had a valid copy and was the modified supplier.
    WasModified,
    /// This cache had a valid (non-Modified) copy.
    OtherValid,
}

/// A private 64-line, 8-word-per-line direct-mapped cache.
#[derive(Clone, Debug)]
pub struct Cache {
    lines: Vec<CacheLine>,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            lines: vec![CacheLine::default(); CACHE_LINES],
        }
    }
}

impl Cache {
    /// Probes a read of `addr`. Any valid state is a hit.
    #[must_use]
    pub fn probe_read(&self, addr: WordAddr) -> Probe {
        let line = &self.lines[addr.index()];
        if line.state != MesiState::Invalid && line.tag == addr.tag() {
            Probe::Hit
        } else {
            Probe::Miss
        }
    }

    /// Probes a write of `addr`. Modified/Exclusive is a hit; Shared is an upgrade miss; Invalid
    /// or a tag mismatch is an ordinary miss.
    #[must_use]
    pub fn probe_write(&self, addr: WordAddr) -> Probe {
        let line = &self.lines[addr.index()];
        if line.tag == addr.tag()
            && matches!(line.state, MesiState::Modified | MesiState::Exclusive)
        {
            Probe::Hit
        } else {
            Probe::Miss
        }
    }

    /// Reads the word at `addr`; caller must have already confirmed `probe_read` was a hit.
    #[must_use]
    pub fn read_word(&self, addr: WordAddr) -> i32 {
        self.lines[addr.index()].data[addr.offset() as usize]
    }

    /// Writes `data` into `addr` on a confirmed write hit, transitioning Exclusive to Modified.
    pub fn commit_write_hit(&mut self, addr: WordAddr, data: i32) {
        let line = &mut self.lines[addr.index()];
        line.data[addr.offset() as usize] = data;
        line.state = MesiState::Modified;
    }

    /// If the line this block would occupy currently holds a Modified line of a *different*
    /// block, returns that old block's address and its 8 words for write-back. Returns `None`
    /// (no write-back needed) for any other occupant state, per §4.2.
    #[must_use]
    pub fn writeback_on_evict(&self, incoming: WordAddr) -> Option<(WordAddr, [i32; LINE_WORDS])> {
        let line = &self.lines[incoming.index()];
        if line.state == MesiState::Modified && line.tag != incoming.tag() {
            let old_addr = WordAddr::from_tag_index(line.tag, incoming.index());
            Some((old_addr, line.data))
        } else {
            None
        }
    }

    /// Writes one flush word into the line during fill, before the tag/state are updated.
    pub fn write_fill_word(&mut self, addr: WordAddr, offset: u32, word: i32) {
        self.lines[addr.index()].data[offset as usize] = word;
    }

    /// Completes a fill: sets the line's tag and final MESI state, and — for a write miss —
    /// overlays the originally-requested store word at its offset.
    pub fn complete_fill(
        &mut self,
        addr: WordAddr,
        final_state: MesiState,
        pending_store: Option<i32>,
    ) {
        let line = &mut self.lines[addr.index()];
        line.tag = addr.tag();
        line.state = final_state;
        if let Some(word) = pending_store {
            line.data[addr.offset() as usize] = word;
        }
    }

    /// Reads a word directly out of the line's data array without checking validity; used by the
    /// bus to source a flush from a peer that is about to be invalidated.
    #[must_use]
    pub fn peek_word(&self, addr: WordAddr) -> i32 {
        self.lines[addr.index()].data[addr.offset() as usize]
    }

    /// Writes every Modified line's data back into `memory`, leaving MESI state untouched. Called
    /// once at the end of a run, before the memory image is dumped, since a write-back cache
    /// otherwise leaves dirty data that never reached main memory.
    pub fn flush_modified_into(&self, memory: &mut [i32]) {
        for (index, line) in self.lines.iter().enumerate() {
            if line.state != MesiState::Modified {
                continue;
            }
            let block = WordAddr::from_tag_index(line.tag, index);
            for k in 0..LINE_WORDS as u32 {
                memory[block.block_word(k).val() as usize] = line.data[k as usize];
            }
        }
    }

    /// Applies the snoop rule for an observed BusRd.
    pub fn snoop_bus_rd(&mut self, addr: WordAddr) -> SnoopOutcome {
        let line = &mut self.lines[addr.index()];
        if line.state == MesiState::Invalid || line.tag != addr.tag() {
            return SnoopOutcome::NotValid;
        }
        match line.state {
            MesiState::Modified => {
                line.state = MesiState::Shared;
                SnoopOutcome::WasModified
            }
            MesiState::Exclusive => {
                line.state = MesiState::Shared;
                SnoopOutcome::OtherValid
            }
            MesiState::Shared => SnoopOutcome::OtherValid,
            MesiState::Invalid => unreachable!(),
        }
    }

    /// Applies the snoop rule for an observed BusRdX: invalidates any valid copy.
    pub fn snoop_bus_rdx(&mut self, addr: WordAddr) -> SnoopOutcome {
        let line = &mut self.lines[addr.index()];
        if line.state == MesiState::Invalid || line.tag != addr.tag() {
            return SnoopOutcome::NotValid;
        }
        let was_modified = line.state == MesiState::Modified;
        line.state = MesiState::Invalid;
        if was_modified {
            SnoopOutcome::WasModified
        } else {
            SnoopOutcome::OtherValid
        }
    }

    /// Returns the MESI state of the line at `addr`'s index, regardless of tag match — used by
    /// tests and the tag dump.
    #[must_use]
    pub fn state_at_index(&self, index: usize) -> MesiState {
        self.lines[index].state
    }

    /// Dumps the full 512-word data array in linear line order, for the data-cache dump file.
    #[must_use]
    pub fn dump_data(&self) -> Vec<i32> {
        self.lines.iter().flat_map(|l| l.data).collect()
    }

    /// Dumps the 64 `(tag << 2) | mesi` encoded words, for the tag-cache dump file.
    #[must_use]
    pub fn dump_tags(&self) -> Vec<u32> {
        self.lines
            .iter()
            .map(|l| (l.tag << 2) | l.state.encode())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u32) -> WordAddr {
        WordAddr::new(raw)
    }

    #[test]
    fn miss_on_empty_cache() {
        let c = Cache::default();
        assert_eq!(c.probe_read(addr(0x100)), Probe::Miss);
    }

    #[test]
    fn fill_then_hit() {
        let mut c = Cache::default();
        let a = addr(0x100);
        for k in 0..LINE_WORDS as u32 {
            c.write_fill_word(a, k, k as i32);
        }
        c.complete_fill(a, MesiState::Exclusive, None);
        assert_eq!(c.probe_read(a), Probe::Hit);
        assert_eq!(c.read_word(a), 0);
        assert_eq!(c.read_word(a.block_word(3)), 3);
    }

    #[test]
    fn write_hit_on_shared_is_upgrade_miss() {
        let mut c = Cache::default();
        let a = addr(0x040);
        c.complete_fill(a, MesiState::Shared, None);
        assert_eq!(c.probe_write(a), Probe::Miss);
    }

    #[test]
    fn write_hit_on_exclusive_transitions_to_modified() {
        let mut c = Cache::default();
        let a = addr(0x040);
        c.complete_fill(a, MesiState::Exclusive, None);
        assert_eq!(c.probe_write(a), Probe::Hit);
        c.commit_write_hit(a, 99);
        assert_eq!(c.state_at_index(a.index()), MesiState::Modified);
        assert_eq!(c.read_word(a), 99);
    }

    #[test]
    fn eviction_only_writes_back_modified_different_tag() {
        let mut c = Cache::default();
        let old = addr(0x000);
        c.complete_fill(old, MesiState::Modified, None);
        let new_same_index_diff_tag = addr(0x000 + (1 << 9)); // same index, different tag
        let wb = c.writeback_on_evict(new_same_index_diff_tag);
        assert!(wb.is_some());

        let mut c2 = Cache::default();
        c2.complete_fill(old, MesiState::Shared, None);
        assert!(c2.writeback_on_evict(new_same_index_diff_tag).is_none());
    }

    #[test]
    fn flush_modified_writes_back_only_dirty_lines() {
        let mut c = Cache::default();
        c.complete_fill(addr(0x040), MesiState::Modified, None);
        c.write_fill_word(addr(0x040), 2, 77);
        c.complete_fill(addr(0x100), MesiState::Shared, None);

        let mut memory = vec![0i32; 1 << 21];
        c.flush_modified_into(&mut memory);

        assert_eq!(memory[0x040 + 2], 77);
        assert_eq!(memory[0x100], 0); // Shared line left untouched, never dirty
        assert_eq!(c.state_at_index(addr(0x040).index()), MesiState::Modified); // unchanged
    }

    #[test]
    fn snoop_bus_rd_on_modified_transitions_to_shared_and_reports_supplier() {
        let mut c = Cache::default();
        let a = addr(0x040);
        c.complete_fill(a, MesiState::Modified, None);
        assert_eq!(c.snoop_bus_rd(a), SnoopOutcome::WasModified);
        assert_eq!(c.state_at_index(a.index()), MesiState::Shared);
    }

    #[test]
    fn snoop_bus_rdx_invalidates_any_valid_state() {
        let mut c = Cache::default();
        let a = addr(0x040);
        c.complete_fill(a, MesiState::Exclusive, None);
        assert_eq!(c.snoop_bus_rdx(a), SnoopOutcome::OtherValid);
        assert_eq!(c.state_at_index(a.index()), MesiState::Invalid);
    }

    #[test]
    fn tag_dump_round_trips_through_encode_decode() {
        let mut c = Cache::default();
        c.complete_fill(addr(0x100), MesiState::Modified, None);
        let tags = c.dump_tags();
        let word = tags[addr(0x100).index()];
        let tag = word >> 2;
        let state = MesiState::decode(word);
        assert_eq!(tag, addr(0x100).tag());
        assert_eq!(state, MesiState::Modified);
    }
}
