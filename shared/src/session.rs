//! Narrow interfaces to the collaborators the replication core depends on.
//! All of them are injected per call so a channel can be driven by fakes.

use crate::{
    pose::Pose,
    types::{ObjectId, ParticipantId},
};

/// Delivery of named byte messages between participants
pub trait Transport {
    /// False once the session has been torn down or before it is connected
    fn is_ready(&self) -> bool;
    fn send_to_one(&mut self, channel: &str, participant: ParticipantId, payload: &[u8]);
    /// Sends to every connected participant except the local one and `excluding`
    fn send_to_all(&mut self, channel: &str, payload: &[u8], excluding: &[ParticipantId]);
    fn register_handler(&mut self, channel: &str);
    fn unregister_handler(&mut self, channel: &str);
}

/// Roughly synchronized simulation clock shared by all participants
pub trait SimulationClock {
    /// Server time, in seconds
    fn now(&self) -> f32;
    /// Fixed duration of one simulation tick, in seconds
    fn tick_duration(&self) -> f32;
}

/// Queryable view of who is connected and who holds which role
pub trait ParticipantRegistry {
    fn local_id(&self) -> ParticipantId;
    fn is_local_server(&self) -> bool;
    fn is_local_owner(&self, object_id: ObjectId) -> bool;
    fn owner_id(&self, object_id: ObjectId) -> ParticipantId;
    fn server_id(&self) -> ParticipantId;
    fn connected_participants(&self) -> Vec<ParticipantId>;
}

/// Everything a replication channel needs from the running session
pub trait NetworkSession: Transport + SimulationClock + ParticipantRegistry {}

impl<T: Transport + SimulationClock + ParticipantRegistry> NetworkSession for T {}

/// Scene-graph storage for an object's world pose
pub trait TransformHolder {
    fn pose(&self) -> Pose;
    fn set_pose(&mut self, pose: Pose);
}
