use granular_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::types::ParticipantId;

/// The replicated owner-authority switch of one object.
///
/// Written only on the server; every change is queued for broadcast and
/// clients apply what the server sends. Peers that appear after a change
/// (late joiners, reconnects) are told the current value once, as long as it
/// differs from the spawn-time value every participant starts from.
#[derive(Clone, Debug)]
pub struct OwnerAuthorityFlag {
    value: bool,
    spawn_value: bool,
    pending_broadcast: bool,
    announced: Vec<ParticipantId>,
}

impl OwnerAuthorityFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            spawn_value: value,
            pending_broadcast: false,
            announced: Vec::new(),
        }
    }

    pub fn get(&self) -> bool {
        self.value
    }

    /// Server-side write. Returns whether the value changed.
    pub fn set(&mut self, value: bool) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.pending_broadcast = true;
        true
    }

    /// Client-side apply of a value received from the server. Returns whether
    /// the value changed.
    pub fn apply_remote(&mut self, value: bool) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    pub fn has_pending_broadcast(&self) -> bool {
        self.pending_broadcast
    }

    /// Server side: which of the currently connected `peers` must be sent the
    /// current value. After a change that is every peer; otherwise only peers
    /// not yet told about a value that differs from the spawn-time one.
    /// Disconnected peers are forgotten, so a reconnect is told again.
    pub fn take_recipients(&mut self, peers: &[ParticipantId]) -> Vec<ParticipantId> {
        self.announced.retain(|id| peers.contains(id));

        let recipients: Vec<ParticipantId> = if self.pending_broadcast {
            peers.to_vec()
        } else if self.value != self.spawn_value {
            peers
                .iter()
                .copied()
                .filter(|id| !self.announced.contains(id))
                .collect()
        } else {
            Vec::new()
        };
        self.pending_broadcast = false;

        for id in &recipients {
            if !self.announced.contains(id) {
                self.announced.push(*id);
            }
        }
        recipients
    }

    pub fn write(value: bool, writer: &mut dyn BitWrite) {
        value.ser(writer);
    }

    pub fn read(payload: &[u8]) -> Result<bool, SerdeErr> {
        let mut reader = BitReader::new(payload);
        let value = bool::de(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}
