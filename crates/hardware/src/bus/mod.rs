//! The shared bus: round-robin arbitration, snoop fan-out, and the memory-controller countdown
//! and flush state machine from §4.3–§4.4.
//!
//! The bus owns no cache or register state of its own; it drives transitions on the `Core`s (via
//! [`crate::core::core_unit::Core::mark_granted`] and
//! [`crate::core::core_unit::Core::complete_fill_and_resume`]) and on main memory, and reports
//! what it drove as an optional [`trace::BusTraceLine`] for the caller to log.

pub mod trace;

use crate::config::{LINE_WORDS, MEM_LATENCY_CYCLES, NUM_CORES};
use crate::core::cache::{MesiState, SnoopOutcome};
use crate::core::core_unit::Core;
use trace::BusTraceLine;

/// Bus originator id reserved for main memory, distinct from the four core ids.
pub const BUS_ORIG_MEMORY: u8 = 4;

/// A command the bus can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusCommand {
    /// Shared read request.
    BusRd,
    /// Exclusive (write) request.
    BusRdX,
    /// One flushed word of a granted transaction.
    Flush,
}

impl BusCommand {
    /// The 2-bit wire encoding: 1=BusRd, 2=BusRdX, 3=Flush.
    #[must_use]
    pub const fn encode(self) -> u8 {
        match self {
            Self::BusRd => 1,
            Self::BusRdX => 2,
            Self::Flush => 3,
        }
    }
}

/// Where a granted transaction's data comes from.
#[derive(Clone, Copy, Debug)]
enum Supplier {
    Memory,
    Peer(usize),
}

/// State of the single in-flight granted transaction, if any.
#[derive(Clone, Copy, Debug)]
struct Transaction {
    command: BusCommand,
    requester: usize,
    block: crate::common::addr::WordAddr,
    shared: bool,
    supplier: Supplier,
    countdown: u64,
    next_offset: u32,
}

/// The bus: round-robin arbiter plus the single outstanding transaction's memory-response state.
#[derive(Debug, Default)]
pub struct Bus {
    last_granted_wrapping: Option<usize>,
    transaction: Option<Transaction>,
}

impl Bus {
    /// Creates an idle bus with no prior grant history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transaction is currently in progress (granted but not yet fully flushed).
    #[must_use]
    pub fn transaction_in_progress(&self) -> bool {
        self.transaction.is_some()
    }

    /// Advances the bus by one cycle: continues an in-flight transaction, or else attempts to
    /// grant a new one. Returns the trace line for this cycle if the bus drove a non-idle
    /// command.
    pub fn tick(
        &mut self,
        cores: &mut [Core; NUM_CORES],
        memory: &mut [i32],
        cycle: u64,
    ) -> Option<BusTraceLine> {
        if self.transaction.is_some() {
            self.advance_transaction(cores, memory, cycle)
        } else {
            self.try_grant(cores, memory, cycle)
        }
    }

    fn last_granted(&self) -> usize {
        self.last_granted_wrapping.unwrap_or(NUM_CORES - 1)
    }

    fn try_grant(
        &mut self,
        cores: &mut [Core; NUM_CORES],
        memory: &mut [i32],
        cycle: u64,
    ) -> Option<BusTraceLine> {
        let start = self.last_granted();
        let (winner, req) = (1..=NUM_CORES)
            .map(|k| (start + k) % NUM_CORES)
            .find_map(|i| cores[i].pending_request.map(|req| (i, req)))?;
        let block = req.addr.block_base();

        if let Some((old_addr, data)) = cores[winner].cache.writeback_on_evict(block) {
            for k in 0..LINE_WORDS as u32 {
                memory[old_addr.block_word(k).val() as usize] = data[k as usize];
            }
        }

        let mut shared = false;
        let mut modified_supplier = None;
        for i in 0..NUM_CORES {
            if i == winner {
                continue;
            }
            let outcome = if req.exclusive {
                cores[i].cache.snoop_bus_rdx(block)
            } else {
                cores[i].cache.snoop_bus_rd(block)
            };
            match outcome {
                SnoopOutcome::NotValid => {}
                SnoopOutcome::WasModified => {
                    shared = true;
                    modified_supplier = Some(i);
                }
                SnoopOutcome::OtherValid => shared = true,
            }
        }

        let command = if req.exclusive {
            BusCommand::BusRdX
        } else {
            BusCommand::BusRd
        };
        let supplier = modified_supplier.map_or(Supplier::Memory, Supplier::Peer);

        self.transaction = Some(Transaction {
            command,
            requester: winner,
            block,
            shared,
            supplier,
            countdown: MEM_LATENCY_CYCLES,
            next_offset: 0,
        });
        cores[winner].mark_granted();
        self.last_granted_wrapping = Some(winner);

        Some(BusTraceLine {
            cycle,
            originator: winner as u8,
            command,
            address: block.val(),
            data: 0,
            shared,
        })
    }

    fn advance_transaction(
        &mut self,
        cores: &mut [Core; NUM_CORES],
        memory: &mut [i32],
        cycle: u64,
    ) -> Option<BusTraceLine> {
        let Some(txn) = self.transaction.as_mut() else {
            return None;
        };
        if txn.countdown > 0 {
            txn.countdown -= 1;
            return None;
        }

        let offset = txn.next_offset;
        let block = txn.block;
        let requester = txn.requester;
        let command = txn.command;
        let shared = txn.shared;
        let word_addr = block.block_word(offset);

        let (data, originator) = match txn.supplier {
            Supplier::Peer(peer) => {
                let word = cores[peer].cache.peek_word(word_addr);
                memory[word_addr.val() as usize] = word;
                (word, peer as u8)
            }
            Supplier::Memory => (memory[word_addr.val() as usize], BUS_ORIG_MEMORY),
        };
        cores[requester].cache.write_fill_word(block, offset, data);

        let Some(txn) = self.transaction.as_mut() else {
            return None;
        };
        txn.next_offset += 1;
        let done = txn.next_offset >= LINE_WORDS as u32;

        if done {
            let exclusive = command == BusCommand::BusRdX;
            let final_state = if exclusive {
                MesiState::Modified
            } else if shared {
                MesiState::Shared
            } else {
                MesiState::Exclusive
            };
            cores[requester].complete_fill_and_resume(block, final_state);
            self.transaction = None;
        }

        Some(BusTraceLine {
            cycle,
            originator,
            command: BusCommand::Flush,
            address: word_addr.val(),
            data,
            shared,
        })
    }
}
