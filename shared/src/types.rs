/// Identifies one participant of the network session.
pub type ParticipantId = u64;
/// Identifies a replicated object within the session.
pub type ObjectId = u64;
/// Distinguishes several replicated behaviours attached to one object.
pub type BehaviourId = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn from_is_server(is_server: bool) -> Self {
        if is_server {
            HostType::Server
        } else {
            HostType::Client
        }
    }
}

/// Which half of the replication protocol a participant currently runs for an object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncRole {
    /// Reads the local pose and sends snapshots
    Authority,
    /// Receives snapshots and displays an interpolated pose
    Receiver,
}
