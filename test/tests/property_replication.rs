/// PROPERTY-BASED TESTS: replication invariants
///
/// Key invariants:
/// 1. The snapshot wire layout is lossless and rejects anything but 33 bytes
/// 2. Interpolation never moves past its target and always arrives
/// 3. Teleports are displayed exactly
/// 4. Exactly one participant is authoritative for an object

use proptest::prelude::*;

use granular_shared::{
    decode_snapshot, encode_snapshot, is_authoritative, InterpolationEngine,
    LocalSnapshotTracker, Pose, Quat, StreamWriter, TransformConfig, TransformSnapshot, Vec3,
    SNAPSHOT_SIZE_BYTES,
};

const TICK: f32 = 1.0 / 30.0;

fn coordinate() -> impl Strategy<Value = f32> {
    -500.0f32..500.0f32
}

fn position_strategy() -> impl Strategy<Value = Vec3> {
    (coordinate(), coordinate(), coordinate()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn rotation_strategy() -> impl Strategy<Value = Quat> {
    (-3.1f32..3.1f32, -1.5f32..1.5f32).prop_map(|(yaw, pitch)| {
        (Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)).normalize()
    })
}

fn snapshot_strategy() -> impl Strategy<Value = TransformSnapshot> {
    (0.0f32..10_000.0, position_strategy(), rotation_strategy(), any::<bool>()).prop_map(
        |(timestamp, position, rotation, teleport)| {
            TransformSnapshot::new(timestamp, Pose::new(position, rotation), teleport)
        },
    )
}

fn encoded(snapshot: &TransformSnapshot) -> Vec<u8> {
    let mut writer = StreamWriter::new();
    encode_snapshot(snapshot, &mut writer);
    writer.to_bytes()
}

proptest! {
    #[test]
    fn prop_snapshot_survives_the_wire(snapshot in snapshot_strategy()) {
        let bytes = encoded(&snapshot);

        prop_assert_eq!(bytes.len(), SNAPSHOT_SIZE_BYTES);
        prop_assert_eq!(decode_snapshot(&bytes), Ok(snapshot));
    }

    /// Any well-formed payload re-encodes to the same bytes, NaN bit patterns included
    #[test]
    fn prop_payload_bytes_are_preserved(
        floats in prop::array::uniform32(any::<u8>()),
        teleport in 0u8..=1,
    ) {
        let mut payload = floats.to_vec();
        payload.push(teleport);

        let snapshot = decode_snapshot(&payload);
        prop_assert!(snapshot.is_ok());
        let reencoded = encoded(&snapshot.unwrap());
        prop_assert_eq!(reencoded, payload);
    }

    #[test]
    fn prop_wrong_length_is_rejected(payload in prop::collection::vec(any::<u8>(), 0..80)) {
        prop_assume!(payload.len() != SNAPSHOT_SIZE_BYTES);

        prop_assert!(decode_snapshot(&payload).is_err());
    }

    #[test]
    fn prop_interpolation_never_overshoots(
        start in position_strategy(),
        end in position_strategy(),
        idle_ticks in 0usize..5,
    ) {
        let mut engine = InterpolationEngine::new(Pose::IDENTITY, 0.0);
        let mut now = 0.0;
        engine.receive(TransformSnapshot::from_pose(Pose::new(start, Quat::IDENTITY), now));
        now += TICK;
        engine.advance(now, TICK, true);
        for _ in 0..idle_ticks {
            now += TICK;
            engine.advance(now, TICK, true);
        }

        engine.receive(TransformSnapshot::from_pose(Pose::new(end, Quat::IDENTITY), now));
        let mut remaining = start.distance(end);
        for _ in 0..idle_ticks + 3 {
            now += TICK;
            let position = engine.advance(now, TICK, true).position;
            let next = position.distance(end);
            prop_assert!(next <= remaining + 1e-3, "moved away from target: {} -> {}", remaining, next);
            remaining = next;
        }
        prop_assert!(remaining < 1e-3, "did not arrive, {} left", remaining);
    }

    #[test]
    fn prop_teleport_is_displayed_exactly(
        start in position_strategy(),
        jump in position_strategy(),
        rotation in rotation_strategy(),
    ) {
        let mut engine = InterpolationEngine::new(Pose::IDENTITY, 0.0);
        engine.receive(TransformSnapshot::from_pose(Pose::new(start, Quat::IDENTITY), 0.0));
        engine.advance(TICK, TICK, true);

        let target = Pose::new(jump, rotation);
        engine.receive(TransformSnapshot::new(TICK, target, true));

        prop_assert_eq!(engine.advance(2.0 * TICK, TICK, true), target);
    }

    /// Whatever the motion, an unchanged pose is never sent twice
    #[test]
    fn prop_resting_pose_sends_once(
        path in prop::collection::vec(position_strategy(), 1..8),
        rest_ticks in 1usize..10,
    ) {
        let config = TransformConfig::default();
        let mut tracker = LocalSnapshotTracker::new(Pose::IDENTITY, 0.0);
        let mut now = 0.0;
        for position in &path {
            now += TICK;
            let pose = Pose::new(*position, Quat::IDENTITY);
            if let Some(sent) = tracker.evaluate(pose, now, TICK, &config) {
                prop_assert_eq!(sent.pose(), pose);
            }
        }

        let resting = Pose::new(*path.last().unwrap(), Quat::IDENTITY);
        for _ in 0..rest_ticks {
            now += TICK;
            prop_assert!(tracker.evaluate(resting, now, TICK, &config).is_none());
        }
    }

    #[test]
    fn prop_exactly_one_authority(
        client_count in 1u64..8,
        owner_seed in any::<u64>(),
        owner_authority in any::<bool>(),
    ) {
        let server = 0u64;
        let owner = owner_seed % (client_count + 1);

        let authorities = (0..=client_count)
            .filter(|id| is_authoritative(*id == server, *id == owner, owner_authority))
            .count();

        prop_assert_eq!(authorities, 1);
    }
}
