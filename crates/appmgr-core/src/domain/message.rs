//! DesireAppMessage - bus から届く「アプリを動かしたい」というリクエスト
//!
//! decode は純粋関数。ネットワークや store には触らないので、リテラル payload でテストできる。

use serde::{Deserialize, Serialize};

use super::action::EnvironmentVariable;
use super::errors::DecodeError;
use super::ids::ProcessGuid;

/// Subject on which desire requests are published.
pub const DESIRE_APP_SUBJECT: &str = "diego.desire.app";

/// A validated desire request. Lives only for one translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesireAppMessage {
    pub app_id: String,
    pub app_version: String,
    pub droplet_uri: String,
    pub start_command: String,
    #[serde(default)]
    pub environment: Vec<EnvironmentVariable>,
}

/// 検証前の wire 形式。必須フィールドも Option で受けて、欠落は validate で判定する。
#[derive(Debug, Deserialize)]
struct RawDesireAppMessage {
    app_id: Option<String>,
    app_version: Option<String>,
    droplet_uri: Option<String>,
    start_command: Option<String>,
    environment: Option<Vec<EnvironmentVariable>>,
}

impl DesireAppMessage {
    /// Parse and validate a raw payload.
    ///
    /// # 検証
    /// - JSON として壊れている → `DecodeError::Malformed`
    /// - 必須フィールドが欠落 or 空文字 → `DecodeError::MissingField`（先頭から順に最初の 1 つ）
    /// - `environment` は欠落・null なら空扱い
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawDesireAppMessage =
            serde_json::from_slice(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        Ok(Self {
            app_id: required("app_id", raw.app_id)?,
            app_version: required("app_version", raw.app_version)?,
            droplet_uri: required("droplet_uri", raw.droplet_uri)?,
            start_command: required("start_command", raw.start_command)?,
            environment: raw.environment.unwrap_or_default(),
        })
    }

    /// Wire encoding used by publishers.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn process_guid(&self) -> ProcessGuid {
        ProcessGuid::for_app(&self.app_id, &self.app_version)
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, DecodeError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DecodeError::MissingField(name)),
    }
}
