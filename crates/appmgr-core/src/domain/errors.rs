//! Errors - 1 メッセージの処理で起こりうるエラー
//!
//! どのエラーもプロセスにとっては致命的ではない。
//! listener はログに出してメッセージを捨て、次のメッセージを待つ。

use super::ids::ProcessGuid;

/// Inbound payload was malformed or incomplete. No store write happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("missing field {0}")]
    MissingField(&'static str),
}

/// The store upsert failed. Never retried here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode lrp {guid}: {reason}")]
    Encode { guid: ProcessGuid, reason: String },

    #[error("cannot parse lrp JSON for key {key}: {reason}")]
    InvalidRecord { key: String, reason: String },
}

/// DesireError は 1 メッセージ分の処理失敗
#[derive(Debug, thiserror::Error)]
pub enum DesireError {
    #[error("failed to parse inbound message: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to desire lrp {guid}: {source}")]
    Store {
        guid: ProcessGuid,
        #[source]
        source: StoreError,
    },
}
