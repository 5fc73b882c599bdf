//! Executor actions: the steps of an LRP's execution plan.
//!
//! store には `{"action": "download", "args": {...}}` の形で保存される。
//! variant は閉じた集合なので、builder や serializer は exhaustive に match できる。

use serde::{Deserialize, Serialize};

/// One `KEY=value` entry of a run action's environment.
///
/// 同じ key が複数あっても重複排除はしない（順序を保持する）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Fetch an artifact from `from` and place it at `to`, optionally extracting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadAction {
    pub from: String,
    pub to: String,
    pub extract: bool,
    /// Same app/version share a cache slot.
    pub cache_key: String,
}

/// Run a shell-style script with the given environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAction {
    pub script: String,
    #[serde(default)]
    pub env: Vec<EnvironmentVariable>,
}

/// A single executable step. List order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "args", rename_all = "snake_case")]
pub enum ExecutorAction {
    Download(DownloadAction),
    Run(RunAction),
}

impl ExecutorAction {
    /// Wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutorAction::Download(_) => "download",
            ExecutorAction::Run(_) => "run",
        }
    }

    pub fn as_download(&self) -> Option<&DownloadAction> {
        match self {
            ExecutorAction::Download(action) => Some(action),
            ExecutorAction::Run(_) => None,
        }
    }

    pub fn as_run(&self) -> Option<&RunAction> {
        match self {
            ExecutorAction::Run(action) => Some(action),
            ExecutorAction::Download(_) => None,
        }
    }
}

impl From<DownloadAction> for ExecutorAction {
    fn from(action: DownloadAction) -> Self {
        ExecutorAction::Download(action)
    }
}

impl From<RunAction> for ExecutorAction {
    fn from(action: RunAction) -> Self {
        ExecutorAction::Run(action)
    }
}
