use std::io::{self, BufWriter, Write};

use serde::Serialize;

use bamstats_collectors::Snapshot;

///
/// Status object written in place of snapshots when the run cannot start.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    pub fn error(message: impl Into<String>) -> Self {
        StatusMessage {
            status: "error",
            message: message.into(),
        }
    }
}

///
/// Line-delimited JSON writer. Each value is written as one compact line and flushed immediately,
/// so a downstream reader sees every snapshot as soon as it is taken.
///
pub struct SnapshotWriter<W: Write> {
    inner: BufWriter<W>,
    lines_written: u64,
}

impl SnapshotWriter<io::Stdout> {
    pub fn stdout() -> Self {
        SnapshotWriter::new(io::stdout())
    }
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(inner: W) -> Self {
        SnapshotWriter {
            inner: BufWriter::new(inner),
            lines_written: 0,
        }
    }

    pub fn write_snapshot(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.write_line(snapshot)
    }

    pub fn write_status(&mut self, status: &StatusMessage) -> io::Result<()> {
        self.write_line(status)
    }

    pub fn write_line<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, value)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }
}
