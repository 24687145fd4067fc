use crate::{
    pose::{angle_degrees, move_towards, rotate_towards, Pose},
    snapshot::TransformSnapshot,
};

/// Receiver-side smoothing of replicated snapshots.
///
/// Interpolation runs in segments. When a new target is adopted, the pose
/// displayed at that moment becomes the segment origin, stamped with the time
/// the previous target was adopted. The time between those adoptions
/// (`travel_time`) approximates the gap between two authoritative sends, and
/// the displayed pose moves toward the target at the speed that gap implies,
/// never past it.
///
/// The origin timestamp is restamped on every adoption, not only when
/// snapping, and the speed is computed once per segment rather than from the
/// remaining distance each tick. A target that keeps moving is therefore
/// chased at the pace of its own send gaps.
#[derive(Clone, Debug)]
pub struct InterpolationEngine {
    origin: TransformSnapshot,
    displayed: Pose,
    target: TransformSnapshot,
    newest: TransformSnapshot,
    newest_timestamp: Option<f32>,
    has_new_target: bool,
    should_snap: bool,
    linear_speed: f32,
    angular_speed: f32,
}

impl InterpolationEngine {
    pub fn new(pose: Pose, now: f32) -> Self {
        let snapshot = TransformSnapshot::from_pose(pose, now);
        Self {
            origin: snapshot,
            displayed: pose,
            target: snapshot,
            newest: snapshot,
            newest_timestamp: None,
            has_new_target: false,
            should_snap: false,
            linear_speed: 0.0,
            angular_speed: 0.0,
        }
    }

    /// Pose and adoption time at which the current segment started
    pub fn origin(&self) -> &TransformSnapshot {
        &self.origin
    }

    pub fn newest(&self) -> &TransformSnapshot {
        &self.newest
    }

    pub fn displayed(&self) -> Pose {
        self.displayed
    }

    pub fn should_snap(&self) -> bool {
        self.should_snap
    }

    /// Restarts display from `pose`, as when this participant stops being
    /// authoritative. A received snapshot still waiting to be adopted is
    /// kept; an already adopted one is replaced by `pose`, so a later snap
    /// cannot jump back to it. The stale-rejection timestamp is unchanged.
    pub fn reseed(&mut self, pose: Pose, now: f32) {
        let snapshot = TransformSnapshot::from_pose(pose, now);
        self.origin = snapshot;
        self.displayed = pose;
        self.target = snapshot;
        if !self.has_new_target {
            self.newest = snapshot;
        }
        self.linear_speed = 0.0;
        self.angular_speed = 0.0;
    }

    /// Records a decoded snapshot as the newest target. Snapshots older than
    /// the newest one already received are rejected and `false` is returned.
    ///
    /// The first snapshot ever received, and any teleport, is snapped to on
    /// the next `advance`. A pending snap is not cleared by later snapshots.
    pub fn receive(&mut self, snapshot: TransformSnapshot) -> bool {
        match self.newest_timestamp {
            Some(newest) if snapshot.timestamp < newest => return false,
            None => self.should_snap = true,
            Some(_) => {}
        }
        self.newest_timestamp = Some(snapshot.timestamp);
        self.newest = snapshot;
        self.has_new_target = true;
        self.should_snap |= snapshot.teleport;
        true
    }

    /// Advances the displayed pose by one tick and returns it.
    pub fn advance(&mut self, now: f32, tick_duration: f32, interpolate: bool) -> Pose {
        if self.should_snap || !interpolate {
            return self.snap(now);
        }

        if self.has_new_target {
            self.has_new_target = false;
            // target.timestamp holds the local time the previous target was adopted
            self.origin = TransformSnapshot::from_pose(self.displayed, self.target.timestamp);
            self.target = self.newest;
            self.target.timestamp = now;

            let travel_time = now - self.origin.timestamp;
            if travel_time <= 0.0 {
                self.displayed = self.target.pose();
                self.linear_speed = 0.0;
                self.angular_speed = 0.0;
                return self.displayed;
            }
            self.linear_speed = self.origin.position.distance(self.target.position) / travel_time;
            self.angular_speed = angle_degrees(self.origin.rotation, self.target.rotation) / travel_time;
        }

        self.displayed = Pose::new(
            move_towards(self.displayed.position, self.target.position, self.linear_speed * tick_duration),
            rotate_towards(self.displayed.rotation, self.target.rotation, self.angular_speed * tick_duration),
        );
        self.displayed
    }

    fn snap(&mut self, now: f32) -> Pose {
        self.should_snap = false;
        self.has_new_target = false;
        self.displayed = self.newest.pose();
        self.origin = TransformSnapshot::from_pose(self.displayed, now);
        self.target = self.newest;
        self.target.timestamp = now;
        self.linear_speed = 0.0;
        self.angular_speed = 0.0;
        self.displayed
    }
}
