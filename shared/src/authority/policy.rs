//! Pure decisions about who drives an object's pose and where snapshots go.

use crate::types::{HostType, ParticipantId};

/// Where an authoritative participant sends its snapshots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendRoute {
    /// Server to every client
    Broadcast,
    /// Owning client to the server
    ToServer,
}

/// True iff the local participant is the source of truth for the object's
/// pose: the owner under owner-authority, the server otherwise.
pub fn is_authoritative(is_local_server: bool, is_local_owner: bool, owner_authority: bool) -> bool {
    if owner_authority {
        is_local_owner
    } else {
        is_local_server
    }
}

/// True only on the server under owner-authority, where the owner's updates
/// must be forwarded to everyone else. Under server-authority the server's
/// own broadcast already reaches every client.
pub fn must_relay(is_local_server: bool, owner_authority: bool) -> bool {
    is_local_server && owner_authority
}

pub fn send_route(host_type: HostType) -> SendRoute {
    match host_type {
        HostType::Server => SendRoute::Broadcast,
        HostType::Client => SendRoute::ToServer,
    }
}

/// Whether a snapshot arriving from `sender` may be applied by a
/// non-authoritative participant. The server only listens to the owner,
/// clients only listen to the server.
pub fn accepts_sender(
    host_type: HostType,
    sender: ParticipantId,
    owner_id: ParticipantId,
    server_id: ParticipantId,
) -> bool {
    match host_type {
        HostType::Server => sender == owner_id,
        HostType::Client => sender == server_id,
    }
}

/// Everyone who must receive a relayed snapshot: all connected participants
/// except the server and the owner that produced it.
pub fn relay_recipients(
    connected: &[ParticipantId],
    server_id: ParticipantId,
    owner_id: ParticipantId,
) -> Vec<ParticipantId> {
    connected
        .iter()
        .copied()
        .filter(|id| *id != server_id && *id != owner_id)
        .collect()
}
