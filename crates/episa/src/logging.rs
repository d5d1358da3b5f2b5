use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "episa.log";
/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// `{data_dir}/episa.log`, rotated by size
    File { data_dir: PathBuf },
}

/// Rotate log file if it exceeds `max_size`, keeping the last `keep` bytes
/// starting at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep: u64) -> io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max_size {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// A writer factory that produces writers for the shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

/// A writer that holds a reference to the shared file
struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

/// Initialize logging.
///
/// The level applies to both `episa` and `episa_core`; `RUST_LOG` overrides
/// it. File logs are rotated once they exceed 5 MB, keeping the last 1 MB.
pub fn init_logging(target: &LogTarget, level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("episa={level},episa_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(io::stderr).with_target(false))
                .init();
        }
        LogTarget::File { data_dir } => {
            fs::create_dir_all(data_dir)?;
            let log_path = data_dir.join(LOG_FILE_NAME);

            if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
                eprintln!("Warning: Failed to rotate log file: {e}");
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)?;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(LogWriterFactory {
                            file: Arc::new(Mutex::new(file)),
                        })
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(false),
                )
                .init();

            tracing::info!(log_path = %log_path.display(), "episa logging initialized");
        }
    }
    Ok(())
}
