//! # Granular Shared
//! Transform-state replication for networked simulations: one authoritative
//! participant (the object's owner or the server) sends pose snapshots at a
//! motion-adaptive rate, every other participant interpolates toward them.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use glam::{Quat, Vec3};
pub use granular_serde::{
    BitCounter, BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, StreamWriter,
};

mod authority;
mod channel;
mod config;
mod error;
mod pose;
mod session;
mod snapshot;
mod sync;
mod types;

pub use authority::{
    owner_authority::OwnerAuthorityFlag,
    policy::{
        accepts_sender, is_authoritative, must_relay, relay_recipients, send_route, SendRoute,
    },
};
pub use channel::{
    channel_key::{ChannelKey, ChannelNames, MessageRoute},
    replication_channel::{ReceiveOutcome, ReplicationChannel, TickOutcome},
    scratch::{ScratchGuard, ScratchWriter},
};
pub use config::{ConfigError, TransformConfig};
pub use error::ReplicationError;
pub use pose::{angle_degrees, move_towards, rotate_towards, Pose};
pub use session::{
    NetworkSession, ParticipantRegistry, SimulationClock, TransformHolder, Transport,
};
pub use snapshot::{decode_snapshot, encode_snapshot, TransformSnapshot, SNAPSHOT_SIZE_BYTES};
pub use sync::{interpolation::InterpolationEngine, tracker::LocalSnapshotTracker};
pub use types::{BehaviourId, HostType, ObjectId, ParticipantId, SyncRole};
