use glam::{Quat, Vec3};

use granular_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

use crate::pose::Pose;

/// Size of an encoded `TransformSnapshot` on the wire.
pub const SNAPSHOT_SIZE_BYTES: usize = 33;

/// A timestamped pose sample, the unit of transform replication.
///
/// Wire layout, in order, all floats little-endian:
/// `timestamp: f32`, `position: 3 x f32`, `rotation: 4 x f32 (x, y, z, w)`,
/// `teleport: u8 (0 or 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    /// Simulation-clock seconds at which the snapshot was captured or sent
    pub timestamp: f32,
    pub position: Vec3,
    pub rotation: Quat,
    /// Receivers must snap to this snapshot instead of interpolating toward it
    pub teleport: bool,
}

impl TransformSnapshot {
    pub fn new(timestamp: f32, pose: Pose, teleport: bool) -> Self {
        Self {
            timestamp,
            position: pose.position,
            rotation: pose.rotation,
            teleport,
        }
    }

    pub fn from_pose(pose: Pose, timestamp: f32) -> Self {
        Self::new(timestamp, pose, false)
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
    }
}

impl Serde for TransformSnapshot {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.timestamp.ser(writer);
        for value in self.position.to_array() {
            value.ser(writer);
        }
        for value in self.rotation.to_array() {
            value.ser(writer);
        }
        self.teleport.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let timestamp = f32::de(reader)?;
        let position = Vec3::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?);
        let rotation = Quat::from_xyzw(
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
        );
        let teleport = bool::de(reader)?;
        Ok(Self {
            timestamp,
            position,
            rotation,
            teleport,
        })
    }

    fn bit_length(&self) -> u32 {
        Self::const_bit_length()
    }
}

impl ConstBitLength for TransformSnapshot {
    fn const_bit_length() -> u32 {
        f32::const_bit_length() * 8 + bool::const_bit_length()
    }
}

pub fn encode_snapshot(snapshot: &TransformSnapshot, writer: &mut dyn BitWrite) {
    snapshot.ser(writer);
}

/// Decodes exactly one snapshot. Short, long, or otherwise malformed
/// payloads are rejected rather than partially read.
pub fn decode_snapshot(payload: &[u8]) -> Result<TransformSnapshot, SerdeErr> {
    if payload.len() > SNAPSHOT_SIZE_BYTES {
        return Err(SerdeErr::LengthMismatch {
            expected_bytes: SNAPSHOT_SIZE_BYTES,
            actual_bytes: payload.len(),
        });
    }
    let mut reader = BitReader::new(payload);
    let snapshot = TransformSnapshot::de(&mut reader)?;
    reader.finish()?;
    Ok(snapshot)
}
