//! Output destinations for rendered lines

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use mystat_core::{InstanceAddr, Result};

/// Receives rendered lines, one call per line
pub trait OutputSink: Send {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }
}

/// Writes to standard output, flushing after every line
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// `<host>_<port>_mysql_stat.log`
pub fn log_file_name(addr: &InstanceAddr) -> String {
    format!("{}_{}_mysql_stat.log", addr.host(), addr.port())
}

/// Appends to a file, opening and closing it for every line so the file
/// can be rotated or removed while the sampler runs.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-instance log file inside `dir`
    pub fn for_instance(dir: impl AsRef<Path>, addr: &InstanceAddr) -> Self {
        Self::new(dir.as_ref().join(log_file_name(addr)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
