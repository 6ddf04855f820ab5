use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger.
///
/// `verbose` lowers the default filter from `info` to `debug`; `RUST_LOG`
/// still takes precedence when set.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    let _ = builder.format_timestamp_millis().try_init();
}
