use granular_shared::{Pose, Quat, TransformHolder, Vec3};

/// Scene-graph stand-in holding a single pose
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TestTransform {
    pub pose: Pose,
}

impl TestTransform {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Pose::new(Vec3::new(x, y, z), Quat::IDENTITY))
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.pose.position += delta;
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }
}

impl TransformHolder for TestTransform {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}
