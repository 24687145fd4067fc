//! Server-driven replication: the server reads the pose, clients interpolate.

use granular_shared::{Pose, Quat, ReceiveOutcome, SyncRole, TickOutcome, TransformConfig, Vec3};
use granular_test::{assert_pose_eq, assert_position_near, TestWorld, SERVER};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn resting_object_sends_only_its_spawn_snapshot() {
    init_logging();
    let mut world = TestWorld::server_authority(2);

    let reports = world.steps(10);

    let sending_ticks = reports.iter().filter(|report| report.sent_by(SERVER)).count();
    assert_eq!(sending_ticks, 1, "only the spawn snapshot should be sent");
    assert!(reports[0].sent_by(SERVER));
    for report in &reports[1..] {
        assert!(matches!(report.tick_of(SERVER), Some(Ok(TickOutcome::Idle))));
    }

    // the single broadcast reached both clients and nothing else was sent
    let sent = world.snapshots_sent_by(SERVER);
    let mut recipients: Vec<_> = sent.iter().map(|envelope| envelope.to).collect();
    recipients.sort();
    assert_eq!(recipients, vec![1, 2]);
    assert!(world.snapshots_sent_by(1).is_empty());
    assert!(world.snapshots_sent_by(2).is_empty());
}

#[test]
fn object_moving_past_threshold_sends_every_tick() {
    init_logging();
    let config = TransformConfig {
        position_threshold: 0.1,
        ..Default::default()
    };
    let mut world = TestWorld::new(config, 1, SERVER, Pose::IDENTITY);
    world.step();

    for _ in 0..10 {
        world.participant_mut(SERVER).transform.translate(Vec3::X);
        let report = world.step();
        assert!(report.sent_by(SERVER));
    }
    assert_eq!(world.snapshots_sent_by(SERVER).len(), 11);
}

#[test]
fn clients_are_receivers_and_server_is_authority() {
    let world = TestWorld::server_authority(2);

    assert_eq!(world.participant(SERVER).channel().role(), SyncRole::Authority);
    assert_eq!(world.participant(1).channel().role(), SyncRole::Receiver);
    assert_eq!(world.participant(2).channel().role(), SyncRole::Receiver);
}

#[test]
fn no_relay_happens_under_server_authority() {
    init_logging();
    let mut world = TestWorld::server_authority(3);

    let report = world.step();

    for delivery in &report.deliveries {
        assert!(matches!(
            delivery.result,
            Some(Ok(ReceiveOutcome::Applied { relayed: 0, .. }))
        ));
    }
    assert_eq!(world.snapshots_sent_by(SERVER).len(), 3);
}

#[test]
fn clients_converge_on_moving_server_object() {
    init_logging();
    let mut world = TestWorld::server_authority(2);
    world.step();

    for _ in 0..5 {
        world.participant_mut(SERVER).transform.translate(Vec3::new(0.5, 0.0, 0.25));
        world.step();
    }
    world.steps(4);

    let expected = world.participant(SERVER).transform.position();
    assert_position_near!(world.participant(1).transform.position(), expected);
    assert_position_near!(world.participant(2).transform.position(), expected);
}

#[test]
fn client_display_advances_monotonically_toward_target() {
    let mut world = TestWorld::server_authority(1);
    world.step();
    world.step();

    world.participant_mut(SERVER).transform.translate(Vec3::new(3.0, 0.0, 0.0));
    world.step();

    let mut last = world.participant(1).transform.position().x;
    for _ in 0..6 {
        world.step();
        let x = world.participant(1).transform.position().x;
        assert!(x >= last, "display moved backwards: {} -> {}", last, x);
        assert!(x <= 3.0, "display overshot the target: {}", x);
        last = x;
    }
    assert_eq!(last, 3.0);
}

#[test]
fn set_position_immediate_snaps_receivers() {
    init_logging();
    let mut world = TestWorld::server_authority(1);
    world.steps(3);

    let target = Vec3::new(100.0, -4.0, 2.0);
    {
        let server = world.participant_mut(SERVER);
        let channel = server.channel.as_mut().unwrap();
        channel
            .set_position_immediate(&server.session, &mut server.transform, target)
            .unwrap();
    }

    let report = world.step();
    let delivered = report
        .deliveries
        .iter()
        .find(|delivery| delivery.envelope.to == 1)
        .unwrap();
    match delivered.result {
        Some(Ok(ReceiveOutcome::Applied { snapshot, .. })) => assert!(snapshot.teleport),
        ref other => panic!("expected an applied teleport snapshot, got {:?}", other),
    }

    // one tick on the receiver lands exactly on the new position
    world.step();
    assert_pose_eq!(world, 1, Pose::new(target, Quat::IDENTITY));
}

#[test]
fn set_rotation_immediate_snaps_receivers() {
    let mut world = TestWorld::server_authority(1);
    world.steps(2);

    let rotation = Quat::from_rotation_z(2.0);
    {
        let server = world.participant_mut(SERVER);
        let channel = server.channel.as_mut().unwrap();
        channel
            .set_rotation_immediate(&server.session, &mut server.transform, rotation)
            .unwrap();
    }
    world.steps(2);

    assert_eq!(world.participant(1).transform.pose.rotation, rotation);
}

#[test]
fn set_position_and_rotation_is_replicated_smoothly() {
    let mut world = TestWorld::server_authority(1);
    world.steps(2);

    let position = Vec3::new(0.0, 6.0, 0.0);
    {
        let server = world.participant_mut(SERVER);
        let channel = server.channel.as_mut().unwrap();
        channel
            .set_position_and_rotation(&server.session, &mut server.transform, position, Quat::IDENTITY)
            .unwrap();
    }
    let report = world.step();
    match report.tick_of(SERVER) {
        Some(Ok(TickOutcome::Sent(snapshot))) => assert!(!snapshot.teleport),
        other => panic!("expected a sent snapshot, got {:?}", other),
    }

    world.steps(4);
    assert_position_near!(world.participant(1).transform.position(), position);
}

#[test]
fn interpolation_disabled_snaps_every_snapshot() {
    let config = TransformConfig {
        interpolate: false,
        ..Default::default()
    };
    let mut world = TestWorld::new(config, 1, SERVER, Pose::IDENTITY);
    world.steps(2);

    world.participant_mut(SERVER).transform.translate(Vec3::new(8.0, 0.0, 0.0));
    world.steps(2);

    assert_eq!(world.participant(1).transform.position(), Vec3::new(8.0, 0.0, 0.0));
}
