//! bus に publish してから store に desired LRP が入るまでの通しテスト

use std::sync::Arc;
use std::time::Duration;

use appmgr_core::app::AppBuilder;
use appmgr_core::domain::{
    DESIRE_APP_SUBJECT, DesireAppMessage, DomainEvent, EnvironmentVariable, StoreError,
};
use appmgr_core::impls::{InMemoryBus, InMemoryDesiredLrpStore, RecordingEventSink};
use appmgr_core::ports::{DesiredLrpStore, MessageBus};

struct Harness {
    bus: Arc<InMemoryBus>,
    store: Arc<InMemoryDesiredLrpStore>,
    events: Arc<RecordingEventSink>,
}

fn harness() -> Harness {
    Harness {
        bus: Arc::new(InMemoryBus::new()),
        store: Arc::new(InMemoryDesiredLrpStore::new()),
        events: Arc::new(RecordingEventSink::new()),
    }
}

async fn wait_for_events(events: &RecordingEventSink, n: usize) {
    for _ in 0..200 {
        if events.records().len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {n} events, got {:?}", events.events());
}

fn sample_message() -> DesireAppMessage {
    DesireAppMessage {
        app_id: "a".to_string(),
        app_version: "v1".to_string(),
        droplet_uri: "http://d".to_string(),
        start_command: "run.sh".to_string(),
        environment: vec![EnvironmentVariable::new("foo", "bar")],
    }
}

#[tokio::test]
async fn published_desire_lands_in_the_store() {
    let h = harness();
    let app = AppBuilder::new()
        .bus(h.bus.clone())
        .store(h.store.clone())
        .event_sink(h.events.clone())
        .build()
        .unwrap();
    let listener = app.start().await.unwrap();

    h.bus
        .publish(DESIRE_APP_SUBJECT, sample_message().encode().unwrap())
        .await
        .unwrap();
    wait_for_events(&h.events, 1).await;
    listener.shutdown_and_join().await;

    let stored = h.store.desired_lrps().await.unwrap();
    assert_eq!(stored.len(), 1);
    let lrp = &stored[0];
    assert_eq!(lrp.guid.as_str(), "a-v1");
    assert_eq!(lrp.actions.len(), 2);
    assert_eq!(
        lrp.actions[0].as_download().unwrap().cache_key,
        "droplets-a-v1"
    );

    let run = lrp.actions[1].as_run().unwrap();
    assert_eq!(run.script, "cd ./app && run.sh");
    let keys: Vec<&str> = run.env.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "foo",
            "PORT",
            "VCAP_APP_PORT",
            "VCAP_APP_HOST",
            "TMPDIR",
            "VCAP_APPLICATION"
        ]
    );
    let vcap: serde_json::Value = serde_json::from_str(&run.env[5].value).unwrap();
    assert_eq!(vcap["instance_id"], "a-v1");
    assert_eq!(vcap["instance_index"], 0);

    // store 上の生データは state を整数で持つ
    let node = h.store.node("/v1/desired_lrp/a-v1").await.unwrap();
    let raw: serde_json::Value = serde_json::from_slice(&node).unwrap();
    assert_eq!(raw["state"], 1);
    assert_eq!(raw["actions"][0]["action"], "download");
    assert_eq!(raw["actions"][1]["action"], "run");
}

#[tokio::test]
async fn invalid_and_failed_messages_are_isolated() {
    let h = harness();
    let app = AppBuilder::new()
        .bus(h.bus.clone())
        .store(h.store.clone())
        .event_sink(h.events.clone())
        .build()
        .unwrap();
    let listener = app.start().await.unwrap();

    h.bus
        .publish(DESIRE_APP_SUBJECT, br#"{"app_version": "v1"}"#.to_vec())
        .await
        .unwrap();
    wait_for_events(&h.events, 1).await;

    h.store
        .fail_with(StoreError::Unavailable("connection error".to_string()))
        .await;
    h.bus
        .publish(DESIRE_APP_SUBJECT, sample_message().encode().unwrap())
        .await
        .unwrap();
    wait_for_events(&h.events, 2).await;

    h.store.clear_failure().await;
    h.bus
        .publish(DESIRE_APP_SUBJECT, sample_message().encode().unwrap())
        .await
        .unwrap();
    wait_for_events(&h.events, 3).await;
    listener.shutdown_and_join().await;

    let events = h.events.events();
    assert!(matches!(&events[0], DomainEvent::MessageRejected { reason } if reason == "missing field app_id"));
    assert!(matches!(&events[1], DomainEvent::StoreWriteFailed { reason, .. } if reason.contains("connection error")));
    assert!(matches!(&events[2], DomainEvent::LrpDesired { guid } if guid.as_str() == "a-v1"));

    // 壊れたメッセージは store に届かない
    assert_eq!(h.store.write_attempts(), 2);
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn desiring_same_app_version_twice_upserts() {
    let h = harness();
    let app = AppBuilder::new()
        .bus(h.bus.clone())
        .store(h.store.clone())
        .event_sink(h.events.clone())
        .build()
        .unwrap();

    app.handler()
        .handle(&sample_message().encode().unwrap())
        .await
        .unwrap();
    let mut changed = sample_message();
    changed.start_command = "run2.sh".to_string();
    app.handler().handle(&changed.encode().unwrap()).await.unwrap();

    let stored = h.store.desired_lrps().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].actions[1].as_run().unwrap().script,
        "cd ./app && run2.sh"
    );
}
