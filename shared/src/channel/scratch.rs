use std::ops::{Deref, DerefMut};

use granular_serde::StreamWriter;

use crate::snapshot::SNAPSHOT_SIZE_BYTES;

/// Owner of a channel's reusable outbound encode buffer.
///
/// The buffer is only reachable through a `ScratchGuard`, which clears it and
/// hands it back when dropped, on every exit path of the sending code.
pub struct ScratchWriter {
    writer: Option<StreamWriter>,
}

impl ScratchWriter {
    pub fn new() -> Self {
        Self {
            writer: Some(StreamWriter::with_capacity(SNAPSHOT_SIZE_BYTES)),
        }
    }

    /// False only while a guard is alive
    pub fn is_available(&self) -> bool {
        self.writer.is_some()
    }

    pub fn acquire(&mut self) -> ScratchGuard<'_> {
        let writer = self
            .writer
            .take()
            .unwrap_or_else(|| StreamWriter::with_capacity(SNAPSHOT_SIZE_BYTES));
        ScratchGuard {
            slot: &mut self.writer,
            writer,
        }
    }
}

impl Default for ScratchWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ScratchGuard<'a> {
    slot: &'a mut Option<StreamWriter>,
    writer: StreamWriter,
}

impl Deref for ScratchGuard<'_> {
    type Target = StreamWriter;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        let mut writer = std::mem::replace(&mut self.writer, StreamWriter::with_capacity(0));
        writer.clear();
        *self.slot = Some(writer);
    }
}
