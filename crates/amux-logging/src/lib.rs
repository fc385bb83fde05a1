use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const RETENTION: Duration = Duration::from_secs(14 * 24 * 60 * 60);
const LOG_FILE_PREFIX: &str = "amux.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global `tracing` subscriber.
///
/// With `log_dir`, logs are written to a daily-rotated file via a
/// non-blocking writer and rotated files older than 14 days are swept
/// once at startup. Without it, logs go to stderr. `json` selects the
/// JSON formatter layer over the compact human one.
///
/// Returns the [`WorkerGuard`] the caller must keep alive for the process
/// lifetime — dropping it stops the background flush thread.
pub fn init_logging(json: bool, log_dir: Option<&Path>) -> WorkerGuard {
    let (non_blocking, guard) = match log_dir {
        Some(dir) => {
            sweep_old_logs(dir);
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(non_blocking);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    guard
}

/// Delete rotated log files under `dir` whose name starts with the log
/// prefix and whose modified time is older than the retention window.
fn sweep_old_logs(dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let now = SystemTime::now();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else { continue };
        let Ok(modified) = metadata.modified() else { continue };
        if now.duration_since(modified).unwrap_or(Duration::ZERO) > RETENTION {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration as StdDuration, SystemTime};

    fn touch_with_age(path: &Path, age: Duration) {
        fs::write(path, b"old log").unwrap();
        let file = fs::File::open(path).unwrap();
        let old_time = SystemTime::now() - age;
        file.set_modified(old_time).unwrap();
    }

    #[test]
    fn test_sweep_removes_only_stale_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();

        let stale = dir.path().join("amux.log.2020-01-01");
        touch_with_age(&stale, RETENTION + StdDuration::from_secs(60));

        let fresh = dir.path().join("amux.log.2026-07-30");
        touch_with_age(&fresh, StdDuration::from_secs(60));

        let unrelated = dir.path().join("other-file.txt");
        touch_with_age(&unrelated, RETENTION + StdDuration::from_secs(60));

        sweep_old_logs(dir.path());

        assert!(!stale.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_sweep_on_missing_directory_is_a_noop() {
        sweep_old_logs(Path::new("/nonexistent/amux-logging-test-dir"));
    }
}
