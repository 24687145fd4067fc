use crate::{config::TransformConfig, pose::Pose, snapshot::TransformSnapshot};

/// Authoritative-side bookkeeping: the last snapshot sent and whether a new
/// one is owed.
///
/// Send rate adapts to motion. A snapshot is owed once the pose differs from
/// the last sent one and either a full tick has passed or the change exceeds
/// a threshold. An idle object sends nothing.
#[derive(Clone, Debug)]
pub struct LocalSnapshotTracker {
    snapshot: TransformSnapshot,
    dirty: bool,
}

impl LocalSnapshotTracker {
    /// Starts dirty, so the spawn pose is always sent once.
    pub fn new(pose: Pose, now: f32) -> Self {
        Self {
            snapshot: TransformSnapshot::from_pose(pose, now),
            dirty: true,
        }
    }

    pub fn snapshot(&self) -> &TransformSnapshot {
        &self.snapshot
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Compares `pose` against the last sent snapshot and marks the tracker
    /// dirty when a send is owed. Returns the dirty state.
    pub fn observe(&mut self, pose: Pose, now: f32, tick_duration: f32, config: &TransformConfig) -> bool {
        let last = self.snapshot.pose();
        if pose == last {
            return self.dirty;
        }

        let elapsed = now - self.snapshot.timestamp;
        if elapsed >= tick_duration
            || pose.distance(&last) > config.position_threshold
            || pose.angle_degrees(&last) > config.rotation_threshold
        {
            self.snapshot.set_pose(pose);
            self.dirty = true;
        }
        self.dirty
    }

    /// Takes the owed snapshot stamped with `now`, clearing the dirty and
    /// teleport flags.
    pub fn take_pending(&mut self, now: f32) -> Option<TransformSnapshot> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.snapshot.timestamp = now;
        let outgoing = self.snapshot;
        self.snapshot.teleport = false;
        Some(outgoing)
    }

    pub fn evaluate(
        &mut self,
        pose: Pose,
        now: f32,
        tick_duration: f32,
        config: &TransformConfig,
    ) -> Option<TransformSnapshot> {
        self.observe(pose, now, tick_duration, config);
        self.take_pending(now)
    }

    /// Records a discontinuous move. The next snapshot carries the teleport
    /// flag so receivers snap instead of interpolating through the jump.
    pub fn teleport(&mut self, pose: Pose) {
        self.snapshot.set_pose(pose);
        self.snapshot.teleport = true;
        self.dirty = true;
    }
}
