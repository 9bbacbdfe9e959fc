//! Four-core MESI pipeline simulator CLI.
//!
//! Usage is deliberately not clap-shaped: the machine takes either zero arguments (all 27 file
//! paths default per §6) or exactly 27 positional paths in a fixed order, and anything else is a
//! usage error. A hand-rolled parser matches that contract more directly than a flag-based one.

use mesi_core::config::{EXPECTED_ARG_COUNT, NUM_CORES};
use mesi_core::{io, Paths, SimError, Simulator};
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let paths = match parse_paths(&args) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = run(&paths) {
        tracing::error!(%err, "simulation aborted");
        eprintln!("{err}");
        process::exit(1);
    }
}

fn parse_paths(args: &[String]) -> Result<Paths, SimError> {
    match args.len() {
        0 => Ok(Paths::default()),
        EXPECTED_ARG_COUNT => Ok(Paths::from_positional(args)),
        got => Err(SimError::UsageError { got }),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: mesisim [imem0 imem1 imem2 imem3 memin memout regout0-3 core0trace-3 bustrace dsram0-3 tsram0-3 stats0-3]"
    );
}

fn run(paths: &Paths) -> Result<(), SimError> {
    let mut sim = Simulator::new();

    for id in 0..NUM_CORES {
        let words = io::loaders::load_imem(&paths.imem[id]);
        sim.load_imem(id, &words);
    }
    sim.load_memory(&io::loaders::load_memin(&paths.memin));

    // A watchdog trip still leaves a full, inspectable machine state behind — write every
    // output file before surfacing the error, rather than discarding it.
    let run_result = sim.run();
    sim.flush_dirty_caches();

    io::writers::write_memout(&paths.memout, &sim.memory);
    for id in 0..NUM_CORES {
        io::writers::write_regout(&paths.regout[id], &sim.cores[id]);
        io::writers::write_dsram(&paths.dsram[id], &sim.cores[id]);
        io::writers::write_tsram(&paths.tsram[id], &sim.cores[id]);
        io::writers::write_stats(&paths.stats[id], &sim.cores[id]);
        write_lines(&paths.core_trace[id], &sim.core_trace[id]);
    }
    write_lines(&paths.bus_trace, &sim.bus_trace);

    run_result
}

fn write_lines(path: &str, lines: &[String]) {
    match std::fs::File::create(path) {
        Ok(mut file) => {
            use std::io::Write as _;
            if let Err(err) = file.write_all(lines.concat().as_bytes()) {
                tracing::warn!(%path, %err, "failed writing trace file");
            }
        }
        Err(err) => tracing::warn!(%path, %err, "cannot create trace file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arguments_uses_defaults() {
        let paths = parse_paths(&[]).unwrap();
        assert_eq!(paths.memin, "memin.txt");
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        let args: Vec<String> = vec!["one".to_string(), "two".to_string()];
        let err = parse_paths(&args).unwrap_err();
        assert!(matches!(err, SimError::UsageError { got: 2 }));
    }

    #[test]
    fn exactly_twenty_seven_arguments_parses_positionally() {
        let args: Vec<String> = (0..EXPECTED_ARG_COUNT).map(|i| format!("p{i}")).collect();
        let paths = parse_paths(&args).unwrap();
        assert_eq!(paths.imem[0], "p0");
        assert_eq!(paths.stats[3], "p26");
    }
}
