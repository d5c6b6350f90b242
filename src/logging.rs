use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// `RUST_LOG` wins when set. Otherwise the level is `debug` when `debug` is
/// true and `info` when it is not. Later calls are ignored.
pub fn init_logging(debug: bool) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if debug {
            builder.filter_level(log::LevelFilter::Debug);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // Another logger may already be installed (test harnesses).
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
