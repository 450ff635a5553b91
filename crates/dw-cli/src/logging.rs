use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger on stderr.
///
/// `verbose` lowers the default level from info to debug. `RUST_LOG` still
/// wins when set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}
