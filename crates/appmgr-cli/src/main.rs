use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{Duration, sleep};
use tracing::info;

use appmgr_core::app::AppBuilder;
use appmgr_core::config::AppConfig;
use appmgr_core::domain::{DesireAppMessage, EnvironmentVariable};
use appmgr_core::impls::{InMemoryBus, InMemoryDesiredLrpStore, TracingEventSink};
use appmgr_core::ports::{DesiredLrpStore, MessageBus};

mod telemetry;

/// `APPMGR_CONFIG` があれば JSON ファイルから、なければ環境変数から読む
fn load_config() -> Result<AppConfig> {
    match std::env::var("APPMGR_CONFIG") {
        Ok(path) => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            Ok(AppConfig::from_json(&bytes)?)
        }
        Err(_) => Ok(AppConfig::from_env()?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    telemetry::init_logging(&config)?;

    // (A) bus と store を用意（開発用の in-memory 実装）
    let bus = Arc::new(InMemoryBus::with_capacity(config.bus_capacity));
    let store = Arc::new(InMemoryDesiredLrpStore::new());

    // (B) ワイヤリングして listener を起動
    let app = AppBuilder::from_config(&config)
        .bus(bus.clone())
        .store(store.clone())
        .event_sink(Arc::new(TracingEventSink))
        .build()?;
    let listener = app.start().await?;

    // (C) サンプルの desire を publish
    let message = DesireAppMessage {
        app_id: "demo-app".to_string(),
        app_version: "v1".to_string(),
        droplet_uri: "http://blobs.example.com/droplets/demo-app".to_string(),
        start_command: "bundle exec rackup -p $PORT".to_string(),
        environment: vec![
            EnvironmentVariable::new("RACK_ENV", "production"),
            EnvironmentVariable::new("VCAP_APPLICATION", r#"{"application_name":"demo"}"#),
        ],
    };
    bus.publish(app.subject(), message.encode()?).await?;
    bus.publish(app.subject(), b"{ not a desire".to_vec()).await?;
    info!(subject = app.subject(), "published sample desires");

    // (D) store に入るのをポーリングで待つ
    for _ in 0..50 {
        if !store.is_empty().await {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }

    listener.shutdown_and_join().await;

    for lrp in store.desired_lrps().await? {
        println!("{}", serde_json::to_string_pretty(&lrp)?);
    }
    Ok(())
}
