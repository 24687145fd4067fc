use glam::{Quat, Vec3};
use log::{debug, trace, warn};

use granular_serde::Serde;

use crate::{
    authority::{
        owner_authority::OwnerAuthorityFlag,
        policy::{self, SendRoute},
    },
    channel::{
        channel_key::{ChannelKey, ChannelNames, MessageRoute},
        scratch::ScratchWriter,
    },
    config::TransformConfig,
    error::ReplicationError,
    pose::Pose,
    session::{NetworkSession, TransformHolder},
    snapshot::{decode_snapshot, TransformSnapshot},
    sync::{interpolation::InterpolationEngine, tracker::LocalSnapshotTracker},
    types::{HostType, ParticipantId, SyncRole},
};

/// What a call to `ReplicationChannel::tick` did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Authoritative side sent this snapshot
    Sent(TransformSnapshot),
    /// Authoritative side had nothing new to send
    Idle,
    /// Receiving side wrote this pose to the transform holder
    Displayed(Pose),
}

/// What an inbound message did to the channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReceiveOutcome {
    /// Snapshot became the newest interpolation target
    Applied {
        snapshot: TransformSnapshot,
        relayed: usize,
    },
    /// Snapshot was older than the newest one received and was dropped
    Stale {
        snapshot: TransformSnapshot,
        relayed: usize,
    },
    /// The server's owner-authority flag was applied
    OwnerAuthority { value: bool, changed: bool },
}

/// Replicates the transform of one networked object.
///
/// Each tick the channel either reads the local pose and sends snapshots
/// (when this participant is authoritative), or advances the interpolated
/// pose toward the newest received snapshot and writes it back. Inbound
/// messages are relayed by the server under owner-authority, then decoded
/// and handed to the interpolation engine.
pub struct ReplicationChannel {
    key: ChannelKey,
    names: ChannelNames,
    config: TransformConfig,
    owner_authority: OwnerAuthorityFlag,
    role: SyncRole,
    tracker: LocalSnapshotTracker,
    engine: InterpolationEngine,
    scratch: ScratchWriter,
}

impl ReplicationChannel {
    /// Creates the channel for a freshly spawned object and registers its
    /// message handlers. The local snapshot starts from the current pose.
    pub fn spawn<S: NetworkSession, T: TransformHolder>(
        key: ChannelKey,
        config: TransformConfig,
        session: &mut S,
        transform: &T,
    ) -> Result<Self, ReplicationError> {
        config.validate()?;
        let names = key.names();
        if !session.is_ready() {
            debug!("Transport unavailable, not spawning '{}'", names.snapshot);
            return Err(ReplicationError::TransportUnavailable {
                channel: names.snapshot,
                operation: "spawn",
            });
        }

        let now = session.now();
        let pose = transform.pose();
        let owner_authority = OwnerAuthorityFlag::new(config.owner_authority);
        let role = local_role(session, key, owner_authority.get());

        session.register_handler(&names.snapshot);
        session.register_handler(&names.owner_authority);
        debug!("Spawned transform channel '{}' as {:?}", names.snapshot, role);

        Ok(Self {
            key,
            names,
            config,
            owner_authority,
            role,
            tracker: LocalSnapshotTracker::new(pose, now),
            engine: InterpolationEngine::new(pose, now),
            scratch: ScratchWriter::new(),
        })
    }

    /// Tears the channel down together with its message handlers.
    pub fn despawn<S: NetworkSession>(self, session: &mut S) {
        session.unregister_handler(&self.names.snapshot);
        session.unregister_handler(&self.names.owner_authority);
        debug!("Despawned transform channel '{}'", self.names.snapshot);
    }

    pub fn key(&self) -> ChannelKey {
        self.key
    }

    pub fn names(&self) -> &ChannelNames {
        &self.names
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Role as of the last tick, receive or mutator call
    pub fn role(&self) -> SyncRole {
        self.role
    }

    pub fn owner_authority(&self) -> bool {
        self.owner_authority.get()
    }

    pub fn tracker(&self) -> &LocalSnapshotTracker {
        &self.tracker
    }

    pub fn engine(&self) -> &InterpolationEngine {
        &self.engine
    }

    /// Drives one simulation tick: sends an owed snapshot when authoritative,
    /// otherwise advances interpolation and writes the pose back.
    pub fn tick<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &mut S,
        transform: &mut T,
    ) -> Result<TickOutcome, ReplicationError> {
        self.ensure_ready(session, "tick")?;
        let now = session.now();
        let tick_duration = session.tick_duration();

        self.flush_owner_authority(session);

        match self.refresh_role(session, transform, now) {
            SyncRole::Authority => {
                let pose = transform.pose();
                let Some(snapshot) = self.tracker.evaluate(pose, now, tick_duration, &self.config)
                else {
                    return Ok(TickOutcome::Idle);
                };
                self.send_snapshot(session, &snapshot)?;
                Ok(TickOutcome::Sent(snapshot))
            }
            SyncRole::Receiver => {
                let pose = self.engine.advance(now, tick_duration, self.config.interpolate);
                transform.set_pose(pose);
                Ok(TickOutcome::Displayed(pose))
            }
        }
    }

    /// Dispatches an inbound message by channel name.
    pub fn on_message<S: NetworkSession>(
        &mut self,
        session: &mut S,
        channel: &str,
        sender: ParticipantId,
        payload: &[u8],
    ) -> Result<ReceiveOutcome, ReplicationError> {
        match self.names.route(channel) {
            Some(MessageRoute::Snapshot) => self.receive_snapshot(session, sender, payload),
            Some(MessageRoute::OwnerAuthority) => {
                self.receive_owner_authority(session, sender, payload)
            }
            None => {
                warn!(
                    "Message on '{}' delivered to transform channel '{}'",
                    channel, self.names.snapshot
                );
                Err(ReplicationError::UnknownChannel {
                    channel: channel.to_string(),
                })
            }
        }
    }

    /// Handles a snapshot payload from `sender`. Under owner-authority the
    /// server forwards the original bytes before decoding them.
    pub fn receive_snapshot<S: NetworkSession>(
        &mut self,
        session: &mut S,
        sender: ParticipantId,
        payload: &[u8],
    ) -> Result<ReceiveOutcome, ReplicationError> {
        self.ensure_ready(session, "receive_snapshot")?;
        let object_id = self.key.object_id;
        let is_local_server = session.is_local_server();
        let owner_authority = self.owner_authority.get();

        if policy::is_authoritative(is_local_server, session.is_local_owner(object_id), owner_authority) {
            return Err(self.violation(
                "receive_snapshot",
                "authoritative participant received a snapshot",
            ));
        }

        let owner_id = session.owner_id(object_id);
        let server_id = session.server_id();
        if !policy::accepts_sender(HostType::from_is_server(is_local_server), sender, owner_id, server_id) {
            return Err(self.violation(
                "receive_snapshot",
                "sender has no authority over this object",
            ));
        }

        let mut relayed = 0;
        if policy::must_relay(is_local_server, owner_authority) {
            let recipients =
                policy::relay_recipients(&session.connected_participants(), server_id, owner_id);
            for recipient in &recipients {
                session.send_to_one(&self.names.snapshot, *recipient, payload);
            }
            relayed = recipients.len();
            trace!(
                "Relayed snapshot on '{}' from owner {} to {} participants",
                self.names.snapshot,
                owner_id,
                relayed
            );
        }

        let snapshot = match decode_snapshot(payload) {
            Ok(snapshot) => snapshot,
            Err(source) => {
                warn!(
                    "Dropping malformed snapshot on '{}' from participant {}: {}",
                    self.names.snapshot, sender, source
                );
                return Err(ReplicationError::MalformedPayload {
                    channel: self.names.snapshot.clone(),
                    sender,
                    source,
                });
            }
        };

        if self.engine.receive(snapshot) {
            Ok(ReceiveOutcome::Applied { snapshot, relayed })
        } else {
            debug!(
                "Dropping stale snapshot on '{}' stamped {}",
                self.names.snapshot, snapshot.timestamp
            );
            Ok(ReceiveOutcome::Stale { snapshot, relayed })
        }
    }

    /// Handles the server's owner-authority broadcast.
    pub fn receive_owner_authority<S: NetworkSession>(
        &mut self,
        session: &mut S,
        sender: ParticipantId,
        payload: &[u8],
    ) -> Result<ReceiveOutcome, ReplicationError> {
        self.ensure_ready(session, "receive_owner_authority")?;
        if session.is_local_server() {
            return Err(self.violation(
                "receive_owner_authority",
                "the server is the only writer of the owner-authority flag",
            ));
        }
        if sender != session.server_id() {
            return Err(self.violation(
                "receive_owner_authority",
                "owner-authority updates are only accepted from the server",
            ));
        }

        let value = match OwnerAuthorityFlag::read(payload) {
            Ok(value) => value,
            Err(source) => {
                warn!(
                    "Dropping malformed owner-authority update on '{}': {}",
                    self.names.owner_authority, source
                );
                return Err(ReplicationError::MalformedPayload {
                    channel: self.names.owner_authority.clone(),
                    sender,
                    source,
                });
            }
        };

        let changed = self.owner_authority.apply_remote(value);
        if changed {
            debug!("Owner-authority on '{}' is now {}", self.names.snapshot, value);
        }
        Ok(ReceiveOutcome::OwnerAuthority { value, changed })
    }

    /// Server-side override of the owner-authority flag. The change is
    /// broadcast on the next tick. Returns whether the value changed.
    pub fn set_owner_authority<S: NetworkSession>(
        &mut self,
        session: &S,
        value: bool,
    ) -> Result<bool, ReplicationError> {
        self.ensure_ready(session, "set_owner_authority")?;
        if !session.is_local_server() {
            return Err(self.violation(
                "set_owner_authority",
                "only the server may change the owner-authority flag",
            ));
        }
        Ok(self.owner_authority.set(value))
    }

    /// Moves the object; the move is replicated smoothly on the next tick.
    pub fn set_position_and_rotation<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &S,
        transform: &mut T,
        position: Vec3,
        rotation: Quat,
    ) -> Result<(), ReplicationError> {
        self.ensure_authority(session, transform, "set_position_and_rotation")?;
        transform.set_pose(Pose::new(position, rotation));
        Ok(())
    }

    /// Moves the object and makes receivers snap to the new position.
    pub fn set_position_immediate<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &S,
        transform: &mut T,
        position: Vec3,
    ) -> Result<(), ReplicationError> {
        self.ensure_authority(session, transform, "set_position_immediate")?;
        let pose = Pose::new(position, transform.pose().rotation);
        transform.set_pose(pose);
        self.tracker.teleport(pose);
        Ok(())
    }

    /// Turns the object and makes receivers snap to the new rotation.
    pub fn set_rotation_immediate<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &S,
        transform: &mut T,
        rotation: Quat,
    ) -> Result<(), ReplicationError> {
        self.ensure_authority(session, transform, "set_rotation_immediate")?;
        let pose = Pose::new(transform.pose().position, rotation);
        transform.set_pose(pose);
        self.tracker.teleport(pose);
        Ok(())
    }

    /// Scale is not replicated by this channel.
    pub fn set_scale_immediate(&self, _scale: Vec3) -> Result<(), ReplicationError> {
        warn!(
            "set_scale_immediate called on '{}', scale is not replicated",
            self.names.snapshot
        );
        Err(ReplicationError::Unsupported {
            operation: "set_scale_immediate",
        })
    }

    fn send_snapshot<S: NetworkSession>(
        &mut self,
        session: &mut S,
        snapshot: &TransformSnapshot,
    ) -> Result<(), ReplicationError> {
        let is_local_server = session.is_local_server();
        let is_local_owner = session.is_local_owner(self.key.object_id);
        if !policy::is_authoritative(is_local_server, is_local_owner, self.owner_authority.get()) {
            return Err(self.violation("send", "participant is not authoritative"));
        }

        let server_id = session.server_id();
        let mut writer = self.scratch.acquire();
        snapshot.ser(&mut *writer);
        match policy::send_route(HostType::from_is_server(is_local_server)) {
            SendRoute::Broadcast => {
                session.send_to_all(&self.names.snapshot, writer.bytes(), &[server_id])
            }
            SendRoute::ToServer => {
                session.send_to_one(&self.names.snapshot, server_id, writer.bytes())
            }
        }
        trace!(
            "Sent snapshot on '{}' at {} (teleport: {})",
            self.names.snapshot,
            snapshot.timestamp,
            snapshot.teleport
        );
        Ok(())
    }

    fn flush_owner_authority<S: NetworkSession>(&mut self, session: &mut S) {
        if !session.is_local_server() {
            return;
        }
        let server_id = session.server_id();
        let peers: Vec<ParticipantId> = session
            .connected_participants()
            .into_iter()
            .filter(|id| *id != server_id)
            .collect();
        let recipients = self.owner_authority.take_recipients(&peers);
        if recipients.is_empty() {
            return;
        }

        let value = self.owner_authority.get();
        let mut writer = self.scratch.acquire();
        OwnerAuthorityFlag::write(value, &mut *writer);
        for recipient in &recipients {
            session.send_to_one(&self.names.owner_authority, *recipient, writer.bytes());
        }
        debug!(
            "Sent owner-authority {} on '{}' to {} participants",
            value,
            self.names.owner_authority,
            recipients.len()
        );
    }

    /// Recomputes the local role and re-seeds the half of the protocol that
    /// becomes active when it changes.
    fn refresh_role<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &S,
        transform: &T,
        now: f32,
    ) -> SyncRole {
        let role = local_role(session, self.key, self.owner_authority.get());
        if role == self.role {
            return role;
        }

        debug!(
            "Transform channel '{}' switching from {:?} to {:?}",
            self.names.snapshot, self.role, role
        );
        let pose = transform.pose();
        match role {
            SyncRole::Authority => self.tracker = LocalSnapshotTracker::new(pose, now),
            SyncRole::Receiver => self.engine.reseed(pose, now),
        }
        self.role = role;
        role
    }

    fn ensure_authority<S: NetworkSession, T: TransformHolder>(
        &mut self,
        session: &S,
        transform: &T,
        operation: &'static str,
    ) -> Result<(), ReplicationError> {
        self.ensure_ready(session, operation)?;
        if self.refresh_role(session, transform, session.now()) != SyncRole::Authority {
            return Err(self.violation(operation, "participant is not authoritative"));
        }
        Ok(())
    }

    fn ensure_ready<S: NetworkSession>(
        &self,
        session: &S,
        operation: &'static str,
    ) -> Result<(), ReplicationError> {
        if session.is_ready() {
            return Ok(());
        }
        debug!(
            "Transport unavailable, skipping {} on '{}'",
            operation, self.names.snapshot
        );
        Err(ReplicationError::TransportUnavailable {
            channel: self.names.snapshot.clone(),
            operation,
        })
    }

    fn violation(&self, operation: &'static str, reason: &'static str) -> ReplicationError {
        warn!(
            "Policy violation on '{}' during {}: {}",
            self.names.snapshot, operation, reason
        );
        ReplicationError::PolicyViolation {
            channel: self.names.snapshot.clone(),
            operation,
            reason,
        }
    }
}

fn local_role<S: NetworkSession>(session: &S, key: ChannelKey, owner_authority: bool) -> SyncRole {
    let authoritative = policy::is_authoritative(
        session.is_local_server(),
        session.is_local_owner(key.object_id),
        owner_authority,
    );
    if authoritative {
        SyncRole::Authority
    } else {
        SyncRole::Receiver
    }
}
