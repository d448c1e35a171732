use bubble_engine::config::EngineConfig;
use bubble_engine::engine_loop::EngineHandle;
use bubble_shared::decay::now_millis;
use bubble_shared::entity::{BubbleEntity, Millis};
use bubble_shared::interchange::{export_document, export_file_name, import_document, to_json};
use bubble_shared::protocol::{EngineEventMsg, PointerMsg, PointerRegion};
use bubble_shared::store::{EntityStore, MemoryStore};
use std::time::Duration;

const HOUR: Millis = 3_600_000;
const RUN_SECS: u64 = 5;

/// A handful of bubbles at different stages of neglect.
fn demo_bubbles(now: Millis) -> Vec<BubbleEntity> {
    [
        ("bubble-water", "Drink water", 0),
        ("bubble-read", "Read", 6),
        ("bubble-walk", "Walk", 30),
        ("bubble-call", "Call family", 100),
        ("bubble-plants", "Water plants", 400),
    ]
    .into_iter()
    .map(|(id, name, hours_ago)| {
        let mut b = BubbleEntity::new(now - hours_ago * HOUR);
        b.id = id.to_string();
        b.name = Some(name.to_string());
        b
    })
    .collect()
}

fn load_initial(now: Millis) -> Vec<BubbleEntity> {
    let Some(path) = std::env::args().nth(1) else {
        return demo_bubbles(now);
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match import_document(&json, now) {
        Ok(bubbles) => {
            tracing::info!("Imported {} bubbles from {}", bubbles.len(), path);
            bubbles
        }
        Err(e) => {
            eprintln!("Cannot import {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::default();

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid engine configuration: {}", e);
        std::process::exit(1);
    }

    let mut store = MemoryStore::with_entities(load_initial(now_millis()));
    let mut entities = match store.load_entities() {
        Ok(entities) => entities,
        Err(e) => match e {},
    };

    let engine = EngineHandle::spawn(config);
    engine.set_entities(entities.clone()).await;
    let mut events = engine.events();

    tracing::info!("Bubble engine running for {}s", RUN_SECS);

    let mut report = tokio::time::interval(Duration::from_secs(1));
    let tap_at = tokio::time::sleep(Duration::from_secs(1));
    tokio::pin!(tap_at);
    let mut tapped = false;
    let deadline = tokio::time::sleep(Duration::from_secs(RUN_SECS));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = report.tick() => {
                let snap = engine.snapshot();
                tracing::info!("tick {}: {} bodies", snap.tick, snap.len());
                match serde_json::to_string(&snap.to_wire()) {
                    Ok(json) => tracing::debug!("{}", json),
                    Err(e) => tracing::warn!("Snapshot encode failed: {}", e),
                }
            }

            _ = &mut tap_at, if !tapped => {
                tapped = true;
                if let Some(target) = entities.first().map(|e| e.id.clone()) {
                    tap(&engine, &target).await;
                }
            }

            event = events.recv() => {
                match event {
                    Ok(EngineEventMsg::Activity { id }) => {
                        let now = now_millis();
                        if let Some(entity) = entities.iter_mut().find(|e| e.id == id) {
                            entity.log_activity(now);
                            tracing::info!("Activity logged for {}", id);
                        }
                        if let Err(e) = store.save_entities(&entities) {
                            match e {}
                        }
                        engine.set_entities(entities.clone()).await;
                    }
                    Ok(EngineEventMsg::OpenEditor { id }) => {
                        tracing::info!("Editor requested for {}", id);
                    }
                    Err(e) => {
                        tracing::warn!("Event stream: {}", e);
                    }
                }
            }

            _ = &mut deadline => break,
        }
    }

    let now = now_millis();
    match to_json(&export_document(&entities, now)) {
        Ok(json) => {
            println!("{}", export_file_name(now));
            println!("{}", json);
        }
        Err(e) => tracing::warn!("Export failed: {}", e),
    }
    tracing::info!("{} saves during the run", store.save_count());

    engine.join().await;
}

/// Short still press on the body's current position.
async fn tap(engine: &EngineHandle, id: &str) {
    let Some(pose) = engine.position(id) else {
        tracing::warn!("No body for {} yet, skipping tap", id);
        return;
    };
    let at_ms = now_millis();
    engine
        .pointer(PointerMsg::Down {
            pointer_id: 1,
            x: pose.x,
            y: pose.y,
            at_ms,
            target: Some((id.to_string(), PointerRegion::Body)),
        })
        .await;
    engine
        .pointer(PointerMsg::Up {
            pointer_id: 1,
            x: pose.x,
            y: pose.y,
            at_ms: at_ms + 50,
        })
        .await;
}
