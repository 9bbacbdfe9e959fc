//! File-format glue: the text encodings §6 specifies for every input and output file, plus the
//! core- and bus-trace line renderers.
//!
//! Every loader absorbs its own I/O errors per §7: a missing input file is a `tracing::warn!`
//! and an all-zero result, not a `Result::Err`. Writers are best-effort; a failure to create an
//! output file is logged and the run continues.

pub mod loaders;
pub mod trace;
pub mod writers;
