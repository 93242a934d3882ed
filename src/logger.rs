use std::io::Write;

use log::LevelFilter;

/// Initialize the logging system
///
/// Logs go to stderr so that `exec` output on stdout stays clean.
///
/// The level defaults to `warn`; each `-v` raises it one step (`info`, then
/// `debug`). `RUST_LOG` is applied on top when set:
///
/// ```bash
/// RUST_LOG=debug git-account use work
/// ```
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok(); // Ignore error if logger is already initialized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(0);
        init_logger(2);
    }
}
