use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{SinkError, SinkResult};

/// Append-only destination for exported change lines.
pub trait ExportSink: Send + Sync {
    /// Append one line. The sink adds the line terminator.
    fn append_line(&self, line: &str) -> SinkResult<()>;

    /// Short description used in logs and error messages.
    fn describe(&self) -> String;
}

/// Export sink appending to a file on disk.
///
/// The file (and its parent directory) is created on open and never
/// truncated. Each line is flushed as soon as it is written.
pub struct FileExport {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileExport {
    /// Open (or create) the export file at the given path.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "export file opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for FileExport {
    fn append_line(&self, line: &str) -> SinkResult<()> {
        let mut w = self.writer.lock().expect("export mutex poisoned");
        writeln!(w, "{line}")
            .and_then(|_| w.flush())
            .map_err(|source| SinkError::Write {
                destination: self.describe(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl std::fmt::Debug for FileExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileExport").field("path", &self.path).finish()
    }
}

/// Export sink collecting lines in memory.
///
/// Can be switched into a failing mode to simulate an unavailable
/// destination.
#[derive(Debug, Default)]
pub struct MemoryExport {
    lines: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MemoryExport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock poisoned").clone()
    }

    /// Make subsequent appends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ExportSink for MemoryExport {
    fn append_line(&self, line: &str) -> SinkResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Write {
                destination: self.describe(),
                source: io::Error::new(io::ErrorKind::BrokenPipe, "sink unavailable"),
            });
        }
        self.lines
            .lock()
            .expect("lock poisoned")
            .push(line.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
