use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber: stderr output filtered by `RUST_LOG` (or `default_level`),
/// plus a daily log file under the project data directory when one is available.
///
/// Keep the returned guard alive for the lifetime of the process so file logs get flushed.
pub fn init(default_level: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mod_packer_lib={default_level},pack={default_level}")));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file = ProjectDirs::from("com", "martes", "mod_packer")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "pack.log")));

    match file {
        Some((writer, guard)) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init();
            None
        }
    }
}

/// Maps `-v` repetitions to a level name.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
