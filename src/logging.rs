use env_logger::Env as LogEnv;

/// Initialise the global logger.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the default level
/// (0 = info, 1 = debug, 2+ = trace). Calling this twice is harmless.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let _ = env_logger::Builder::from_env(LogEnv::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
