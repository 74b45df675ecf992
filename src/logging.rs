//! Logging setup shared by the orchestrator and its workers

use env_logger::Target;
use log::LevelFilter;
use std::env;

/// Initialize logging for this process
///
/// `Info` by default, `Debug` when `verbose` is set. An explicit `RUST_LOG`
/// overrides both. Records go to stdout, interleaved with the results they
/// narrate. Safe to call more than once; later calls are ignored.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .target(Target::Stdout)
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    // Let RUST_LOG override our defaults if explicitly set
    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    if builder.try_init().is_ok() {
        log::debug!("logger initialized at {level:?} level");
    }
}
