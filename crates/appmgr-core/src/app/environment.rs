//! Environment - run action に渡す環境変数を組み立てる
//!
//! # 順序（この順序が優先順位の契約）
//! 1. 呼び出し元の変数（元の順序のまま、`VCAP_APPLICATION` だけ除く）
//! 2. `PORT`
//! 3. `VCAP_APP_PORT`
//! 4. `VCAP_APP_HOST`
//! 5. `TMPDIR`
//! 6. `VCAP_APPLICATION`（呼び出し元の JSON に host/port/instance_id/instance_index を上書きしたもの）

use serde_json::{Map, Value};

use crate::domain::{EnvironmentVariable, ProcessGuid};

/// Port the run action binds inside the container.
pub const CONTAINER_PORT: u16 = 8080;

/// Bind-all host literal.
pub const BIND_ALL_HOST: &str = "0.0.0.0";

/// Temp directory, relative to the container user's home.
pub const TMPDIR_VALUE: &str = "$HOME/tmp";

/// Reserved key carrying JSON-encoded application metadata.
pub const LEGACY_APP_METADATA_KEY: &str = "VCAP_APPLICATION";

/// Identity and networking facts injected into the environment.
#[derive(Debug, Clone, Copy)]
pub struct InstanceFacts<'a> {
    pub guid: &'a ProcessGuid,
    pub index: u32,
    pub host: &'a str,
    pub port: u16,
}

/// The final environment, plus why the caller's legacy metadata was dropped (if it was).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEnvironment {
    pub env: Vec<EnvironmentVariable>,
    pub discarded_legacy_metadata: Option<String>,
}

/// Build the run action's environment from the caller's variables.
///
/// 壊れた `VCAP_APPLICATION` は致命的エラーにしない。
/// 注入する 4 フィールドだけのオブジェクトで置き換え、理由を `discarded_legacy_metadata` に残す。
pub fn enrich_environment(
    caller: &[EnvironmentVariable],
    facts: &InstanceFacts<'_>,
) -> EnrichedEnvironment {
    let mut env = Vec::with_capacity(caller.len() + 5);
    let mut legacy_raw: Option<&str> = None;

    for var in caller {
        if var.key == LEGACY_APP_METADATA_KEY {
            // 複数あれば最後のものを使う
            legacy_raw = Some(var.value.as_str());
        } else {
            env.push(var.clone());
        }
    }

    let port = facts.port.to_string();
    env.push(EnvironmentVariable::new("PORT", port.clone()));
    env.push(EnvironmentVariable::new("VCAP_APP_PORT", port));
    env.push(EnvironmentVariable::new("VCAP_APP_HOST", facts.host));
    env.push(EnvironmentVariable::new("TMPDIR", TMPDIR_VALUE));

    let (metadata, discarded_legacy_metadata) = legacy_metadata(legacy_raw, facts);
    env.push(EnvironmentVariable::new(LEGACY_APP_METADATA_KEY, metadata));

    EnrichedEnvironment {
        env,
        discarded_legacy_metadata,
    }
}

fn legacy_metadata(raw: Option<&str>, facts: &InstanceFacts<'_>) -> (String, Option<String>) {
    let (mut object, discarded) = match raw.map(serde_json::from_str::<Value>) {
        None => (Map::new(), None),
        Some(Ok(Value::Object(object))) => (object, None),
        Some(Ok(_)) => (Map::new(), Some("expected a JSON object".to_string())),
        Some(Err(e)) => (Map::new(), Some(e.to_string())),
    };

    object.insert("host".to_string(), Value::from(facts.host));
    object.insert("port".to_string(), Value::from(facts.port));
    object.insert("instance_id".to_string(), Value::from(facts.guid.as_str()));
    object.insert("instance_index".to_string(), Value::from(facts.index));

    (Value::Object(object).to_string(), discarded)
}
