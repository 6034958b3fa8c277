use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_DIR_VAR: &str = "BM_LOG_DIR";
const BACKTRACE_VAR: &str = "BM_LOG_INCLUDE_BACKTRACE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn flag_enabled(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Route panics through `tracing` so they land in the same sink as the
/// rest of the service logs. Installed at most once per process.
pub fn install_tracing_panic_hook(service: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace = std::env::var(BACKTRACE_VAR)
            .map(|value| flag_enabled(&value))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let thread_name = thread.name().unwrap_or("unnamed");

            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".into());

            tracing::error!(
                service,
                %thread_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn daily_file_writer(service: &'static str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os(LOG_DIR_VAR)?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create {LOG_DIR_VAR} {}: {err}; logging to stdout", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{service}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

/// Set up the global subscriber.
///
/// Filtering comes from `RUST_LOG` (default `info`). With `BM_LOG_DIR` set,
/// output goes to `<BM_LOG_DIR>/<service>.log`, rotated daily; otherwise to
/// stdout. Repeat calls are no-ops.
pub fn init_tracing_subscriber(service: &'static str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let _ = match daily_file_writer(service) {
        Some(writer) => builder.with_writer(writer).try_init(),
        None => builder.try_init(),
    };
}
