//! Buffered CSV log of computed motion frames.
//!
//! Diagnostic aid for tuning the procedural audio thresholds: every frame
//! the procedural client computes can be appended here and replayed against
//! new tuning values offline. Write failures disable the log and never
//! propagate into the telemetry tick path.

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use treadtone_core::{MotionFrame, MotionLogConfig};

/// Append-only CSV writer for motion frames
#[derive(Debug)]
pub struct MotionLog {
    writer: BufWriter<File>,
    path: PathBuf,
    buffer_rows: usize,
    pending_rows: usize,
    failed: bool,
}

impl MotionLog {
    /// Create the log file (truncating any previous one) and write the
    /// column header. Returns `Ok(None)` when the config disables the log,
    /// without touching the filesystem.
    pub fn create(config: &MotionLogConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let mut writer = BufWriter::new(File::create(&config.path)?);
        writeln!(writer, "{}", MotionFrame::csv_header())?;
        Ok(Some(Self {
            writer,
            path: config.path.clone(),
            buffer_rows: config.buffer_rows.max(1),
            pending_rows: 0,
            failed: false,
        }))
    }

    /// Append one frame. After the first IO failure the log goes quiet.
    pub fn write_frame(&mut self, frame: &MotionFrame) {
        if self.failed {
            return;
        }
        if let Err(err) = self.try_write(frame) {
            tracing::warn!(
                path = %self.path.display(),
                "motion log write failed, disabling log: {err}"
            );
            self.failed = true;
        }
    }

    /// Flush buffered rows to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.pending_rows = 0;
        Ok(())
    }

    fn try_write(&mut self, frame: &MotionFrame) -> std::io::Result<()> {
        writeln!(self.writer, "{}", frame.csv_row())?;
        self.pending_rows += 1;
        if self.pending_rows >= self.buffer_rows {
            self.writer.flush()?;
            self.pending_rows = 0;
        }
        Ok(())
    }
}

impl Drop for MotionLog {
    fn drop(&mut self) {
        if !self.failed {
            let _ = self.flush();
        }
    }
}
