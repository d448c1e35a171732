//! Integration tests for the bubble engine.
//!
//! These spawn a real engine task and drive it through its handle, the same
//! way the application does.

use bubble_engine::body::BodyPose;
use bubble_engine::config::{EngineConfig, Viewport};
use bubble_engine::engine_loop::EngineHandle;
use bubble_shared::decay::{now_millis, MAX_SIZE, MIN_SIZE};
use bubble_shared::entity::{BubbleEntity, Millis};
use bubble_shared::protocol::{EngineEventMsg, PointerMsg, PointerRegion};
use std::time::Duration;

const HOUR: Millis = 3_600_000;

fn test_config() -> EngineConfig {
    EngineConfig {
        viewport: Viewport::new(800.0, 600.0),
        rng_seed: 12345,
        ..EngineConfig::default()
    }
}

fn bubble(id: &str, last: Millis) -> BubbleEntity {
    let mut b = BubbleEntity::new(last);
    b.id = id.to_string();
    b
}

/// Poll the latest snapshot until `f` yields a value or the timeout passes.
async fn wait_for<T>(
    engine: &EngineHandle,
    timeout: Duration,
    mut f: impl FnMut(&EngineHandle) -> Option<T>,
) -> Option<T> {
    let poll = async {
        loop {
            if let Some(v) = f(engine) {
                return v;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(timeout, poll).await.ok()
}

async fn wait_for_pose(engine: &EngineHandle, id: &str) -> BodyPose {
    wait_for(engine, Duration::from_secs(2), |e| e.position(id))
        .await
        .unwrap_or_else(|| panic!("{} never appeared in a snapshot", id))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_registered_body_shows_up_in_snapshots() {
    let engine = EngineHandle::spawn(test_config());

    let handle = engine.register("a", 200.0, 200.0, 20.0).await;
    assert!(handle.is_some(), "register on a running engine returns a handle");

    let pose = wait_for_pose(&engine, "a").await;
    assert_eq!(pose.radius, 20.0);
    assert!(pose.x > 0.0 && pose.x < 800.0);
    assert!(pose.y > 0.0 && pose.y < 600.0);

    engine.join().await;
}

#[tokio::test]
async fn test_duplicate_register_keeps_one_body() {
    let engine = EngineHandle::spawn(test_config());

    let first = engine.register("a", 200.0, 200.0, 20.0).await;
    let second = engine.register("a", 400.0, 400.0, 30.0).await;
    assert_eq!(first, second);

    let pose = wait_for_pose(&engine, "a").await;
    assert_eq!(pose.radius, 20.0);
    assert_eq!(engine.snapshot().len(), 1);

    engine.join().await;
}

#[tokio::test]
async fn test_unregister_removes_body() {
    let engine = EngineHandle::spawn(test_config());

    engine.register("a", 200.0, 200.0, 20.0).await;
    wait_for_pose(&engine, "a").await;

    engine.unregister("a").await;
    let gone = wait_for(&engine, Duration::from_secs(2), |e| {
        e.position("a").is_none().then_some(())
    })
    .await;
    assert!(gone.is_some(), "body should leave the snapshot");

    // Unknown ids are ignored
    engine.unregister("nope").await;
    assert!(engine.is_alive());

    engine.join().await;
}

#[tokio::test]
async fn test_scale_changes_radius() {
    let engine = EngineHandle::spawn(test_config());

    engine.register("a", 300.0, 300.0, 20.0).await;
    wait_for_pose(&engine, "a").await;

    engine.scale("a", 1.5).await;
    let grown = wait_for(&engine, Duration::from_secs(2), |e| {
        e.position("a").filter(|p| (p.radius - 30.0).abs() < 1e-9)
    })
    .await;
    assert!(grown.is_some(), "radius should become 30");

    // Invalid factors leave the body alone
    engine.scale("a", 0.0).await;
    engine.scale("a", f64::NAN).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let pose = wait_for_pose(&engine, "a").await;
    assert!((pose.radius - 30.0).abs() < 1e-9);

    engine.join().await;
}

#[tokio::test]
async fn test_entity_list_drives_bodies_and_sizes() {
    let engine = EngineHandle::spawn(test_config());
    let now = now_millis();

    engine
        .set_entities(vec![bubble("fresh", now), bubble("stale", now - 400 * HOUR)])
        .await;

    let fresh = wait_for_pose(&engine, "fresh").await;
    let stale = wait_for_pose(&engine, "stale").await;
    assert!((fresh.radius - MIN_SIZE).abs() < 0.01);
    assert_eq!(stale.radius, MAX_SIZE);

    // Dropping an entity from the list removes its body
    engine.set_entities(vec![bubble("fresh", now)]).await;
    let gone = wait_for(&engine, Duration::from_secs(2), |e| {
        e.position("stale").is_none().then_some(())
    })
    .await;
    assert!(gone.is_some());
    assert!(engine.position("fresh").is_some());

    engine.join().await;
}

#[tokio::test]
async fn test_logging_activity_shrinks_bubble() {
    let engine = EngineHandle::spawn(test_config());
    let now = now_millis();
    let mut entity = bubble("a", now - 100 * HOUR);

    engine.set_entities(vec![entity.clone()]).await;
    let before = wait_for_pose(&engine, "a").await;
    assert!(before.radius > 40.0);

    entity.log_activity(now_millis());
    engine.set_entities(vec![entity]).await;
    let after = wait_for(&engine, Duration::from_secs(2), |e| {
        e.position("a").filter(|p| p.radius < 16.0)
    })
    .await;
    assert!(after.is_some(), "radius should drop to the minimum");

    engine.join().await;
}

#[tokio::test]
async fn test_tap_on_body_emits_activity_and_drag_does_not() {
    let engine = EngineHandle::spawn(test_config());
    let mut events = engine.events();
    let now = now_millis();

    engine
        .set_entities(vec![bubble("a", now), bubble("b", now)])
        .await;
    let a = wait_for_pose(&engine, "a").await;
    let b = wait_for_pose(&engine, "b").await;

    // 50px travel on a: a drag, no event
    engine
        .pointer(PointerMsg::Down {
            pointer_id: 1,
            x: a.x,
            y: a.y,
            at_ms: 1_000,
            target: Some(("a".to_string(), PointerRegion::Body)),
        })
        .await;
    engine
        .pointer(PointerMsg::Move {
            pointer_id: 1,
            x: a.x + 50.0,
            y: a.y,
        })
        .await;
    engine
        .pointer(PointerMsg::Up {
            pointer_id: 1,
            x: a.x + 50.0,
            y: a.y,
            at_ms: 1_100,
        })
        .await;

    // Still, short press on b: a tap
    engine
        .pointer(PointerMsg::Down {
            pointer_id: 2,
            x: b.x,
            y: b.y,
            at_ms: 2_000,
            target: Some(("b".to_string(), PointerRegion::Body)),
        })
        .await;
    engine
        .pointer(PointerMsg::Up {
            pointer_id: 2,
            x: b.x,
            y: b.y,
            at_ms: 2_050,
        })
        .await;

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event channel closed");
    assert_eq!(event, EngineEventMsg::Activity { id: "b".to_string() });

    let extra = tokio::time::timeout(Duration::from_millis(200), events.recv()).await;
    assert!(extra.is_err(), "the drag on a must not emit anything");

    engine.join().await;
}

#[tokio::test]
async fn test_label_tap_opens_editor() {
    let engine = EngineHandle::spawn(test_config());
    let mut events = engine.events();

    engine
        .pointer(PointerMsg::Down {
            pointer_id: 3,
            x: 100.0,
            y: 100.0,
            at_ms: 0,
            target: Some(("a".to_string(), PointerRegion::Label)),
        })
        .await;
    engine
        .pointer(PointerMsg::Up {
            pointer_id: 3,
            x: 102.0,
            y: 100.0,
            at_ms: 400,
        })
        .await;

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Event channel closed");
    assert_eq!(event, EngineEventMsg::OpenEditor { id: "a".to_string() });

    engine.join().await;
}

#[tokio::test]
async fn test_teardown_is_idempotent_and_stops_registration() {
    let engine = EngineHandle::spawn(test_config());

    engine.register("a", 200.0, 200.0, 20.0).await;
    wait_for_pose(&engine, "a").await;

    engine.teardown();
    engine.teardown();
    assert!(!engine.is_alive());

    assert!(engine.register("b", 100.0, 100.0, 20.0).await.is_none());

    let cleared = wait_for(&engine, Duration::from_secs(2), |e| {
        e.snapshot().is_empty().then_some(())
    })
    .await;
    assert!(cleared.is_some(), "snapshot should be emptied on teardown");

    engine.join().await;
}

#[tokio::test]
async fn test_resize_keeps_bodies() {
    let engine = EngineHandle::spawn(test_config());

    engine.register("a", 200.0, 150.0, 20.0).await;
    engine.register("b", 350.0, 250.0, 20.0).await;
    wait_for_pose(&engine, "a").await;

    engine.resize(Viewport::new(600.0, 400.0)).await;
    let tick = engine.snapshot().tick;
    let later = wait_for(&engine, Duration::from_secs(2), |e| {
        let snap = e.snapshot();
        (snap.tick > tick + 10).then_some(snap)
    })
    .await
    .expect("engine should keep ticking");

    assert_eq!(later.len(), 2);
    for (_, pose) in later.iter() {
        assert!(pose.x > -pose.radius && pose.x < 600.0 + pose.radius);
        assert!(pose.y > -pose.radius && pose.y < 400.0 + pose.radius);
    }

    engine.join().await;
}

#[tokio::test]
async fn test_snapshots_advance_every_tick() {
    let engine = EngineHandle::spawn(test_config());
    let mut rx = engine.snapshots();

    let first = tokio::time::timeout(Duration::from_secs(1), rx.changed()).await;
    assert!(first.is_ok());
    let t1 = rx.borrow_and_update().tick;

    let second = tokio::time::timeout(Duration::from_secs(1), rx.changed()).await;
    assert!(second.is_ok());
    assert!(rx.borrow_and_update().tick > t1);

    engine.join().await;
}
