//! Logger initialization.

use std::io::Write;

use console::style;
use log::LevelFilter;

use crate::error::InitializationError;

/// Install `env_logger` with coloured level labels.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as
/// the global default. HTTP stack internals stay at `info` or quieter.
pub fn init_logger(level: LevelFilter) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info.min(level));
    builder.filter_module("hyper", LevelFilter::Info.min(level));
    builder.filter_module("hyper_util", LevelFilter::Info.min(level));
    builder.filter_module("ipsight", level);

    builder.format(|buf, record| {
        let level = record.level();
        let label = match level {
            log::Level::Error => style(level).red(),
            log::Level::Warn => style(level).yellow(),
            log::Level::Info => style(level).green(),
            log::Level::Debug => style(level).blue(),
            log::Level::Trace => style(level).magenta(),
        };
        writeln!(
            buf,
            "{} [{}] {}",
            style(record.target()).cyan(),
            label,
            record.args()
        )
    });

    builder.try_init()?;
    Ok(())
}
