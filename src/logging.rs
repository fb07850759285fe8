use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Build the `env_logger` filter for the requested verbosity. Dependencies
/// stay at `warn` unless `-vv` or more is given.
pub fn filter_directive(quiet: bool, verbose: u8) -> String {
    if quiet {
        return "error".to_string();
    }
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => return "trace".to_string(),
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Copies every log line to stderr and, when open, the run's log file.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = &mut self.file {
            // Stop teeing on write errors; stderr keeps going
            if file.write_all(buf).is_err() {
                self.file = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Truncated: each run starts a fresh log
    File::create(path)
}

/// Install the global logger. `RUST_LOG` overrides the verbosity flags.
pub fn init(quiet: bool, verbose: u8, log_file: Option<&Path>) {
    let mut open_error = None;
    let file = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(file),
        Err(e) => {
            open_error = Some(format!("Cannot write log file {}: {e}", path.display()));
            None
        }
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter_directive(quiet, verbose)),
    )
    .format_target(false)
    .target(env_logger::Target::Pipe(Box::new(Tee { file })))
    .init();

    if let Some(message) = open_error {
        log::warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(filter_directive(true, 0), "error");
        assert_eq!(filter_directive(false, 0), "warn,plex_ratings_sync=info");
        assert_eq!(filter_directive(false, 1), "warn,plex_ratings_sync=debug");
        assert_eq!(filter_directive(false, 2), "trace");
        assert_eq!(filter_directive(false, 9), "trace");
    }

    #[test]
    fn test_tee_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run.log");
        let mut tee = Tee { file: Some(open_log_file(&path).unwrap()) };

        tee.write_all(b"INFO first\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "INFO first\n");
    }

    #[test]
    fn test_log_file_truncated_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "old run\n").unwrap();

        let mut tee = Tee { file: Some(open_log_file(&path).unwrap()) };
        tee.write_all(b"new run\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new run\n");
    }
}
