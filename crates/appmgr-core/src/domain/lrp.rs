//! DesiredLrp - store に書き込む desired long-running process の記述子

use serde::{Deserialize, Serialize};

use super::action::ExecutorAction;
use super::ids::ProcessGuid;

/// Log source tag for application process output.
pub const APP_LOG_SOURCE: &str = "App";

/// LrpState は LRP のライフサイクル状態
///
/// store 上は整数で保存される（0 = invalid, 1 = desired, 2 = running）。
/// このクレートが作るのは常に `Desired`。それ以降の遷移は別コンポーネントの責務。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LrpState {
    Invalid,
    Desired,
    Running,
}

impl From<LrpState> for u8 {
    fn from(state: LrpState) -> Self {
        match state {
            LrpState::Invalid => 0,
            LrpState::Desired => 1,
            LrpState::Running => 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown lrp state {0}")]
pub struct UnknownLrpState(pub u8);

impl TryFrom<u8> for LrpState {
    type Error = UnknownLrpState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LrpState::Invalid),
            1 => Ok(LrpState::Desired),
            2 => Ok(LrpState::Running),
            other => Err(UnknownLrpState(other)),
        }
    }
}

/// Where the process's log lines are routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Routing key (the app id).
    pub guid: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// The canonical descriptor handed to the store.
///
/// 1 メッセージごとに新しく作られ、作成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredLrp {
    pub guid: ProcessGuid,
    pub state: LrpState,
    pub log: LogConfig,
    pub actions: Vec<ExecutorAction>,
}

impl DesiredLrp {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::RunAction;
    use serde_json::json;

    fn sample() -> DesiredLrp {
        DesiredLrp {
            guid: ProcessGuid::for_app("a", "v1"),
            state: LrpState::Desired,
            log: LogConfig {
                guid: "a".to_string(),
                source_name: APP_LOG_SOURCE.to_string(),
                index: Some(0),
            },
            actions: vec![ExecutorAction::Run(RunAction {
                script: "cd ./app && run.sh".to_string(),
                env: vec![],
            })],
        }
    }

    #[test]
    fn state_is_stored_as_integer() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["state"], json!(1));
        assert_eq!(value["guid"], json!("a-v1"));
        assert_eq!(value["log"], json!({"guid": "a", "source_name": "App", "index": 0}));
    }

    #[test]
    fn unknown_state_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["state"] = json!(9);
        let result: Result<DesiredLrp, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn stored_record_reads_back() {
        let lrp = sample();
        let bytes = lrp.to_json().unwrap();
        assert_eq!(DesiredLrp::from_json(&bytes).unwrap(), lrp);
    }

    #[test]
    fn missing_log_index_is_none() {
        let config: LogConfig =
            serde_json::from_value(json!({"guid": "a", "source_name": "App"})).unwrap();
        assert_eq!(config.index, None);
    }
}
