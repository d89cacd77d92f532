use cfg_if::cfg_if;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;

/// Install the global subscriber using settings from the environment.
pub fn init() {
    init_with(&LogConfig::from_env());
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        pub fn init_with(config: &LogConfig) {
            // Log to browser console via tracing-wasm
            let filter = EnvFilter::try_new(&config.filter)
                .unwrap_or_else(|_| EnvFilter::new("info"));

            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            // A host page may initialise twice (hot reload); keep the first subscriber
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(wasm_layer)
                .try_init();

            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;
        use std::io;
        use std::path::Path;
        use std::ffi::OsStr;
        use once_cell::sync::OnceCell;

        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        pub fn init_with(config: &LogConfig) {
            let filter = EnvFilter::try_new(&config.filter)
                .unwrap_or_else(|_| EnvFilter::new("info"));

            // Console (stderr) layer with file/line
            let console_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            let (nb_writer, guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::daily(
                    config.file.parent().unwrap_or(Path::new(".")),
                    config.file.file_name().unwrap_or(OsStr::new("posesync.log")),
                )
            );
            let _ = FILE_GUARD.set(guard);

            let file_layer = fmt::layer()
                .with_writer(nb_writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            if tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .is_err()
            {
                return;
            }

            // Hook panics to log with backtrace
            std::panic::set_hook(Box::new(|info| {
                let bt = std::backtrace::Backtrace::force_capture();
                tracing::error!("{info}\nBacktrace:\n{bt:?}");
            }));
        }
    }
}
