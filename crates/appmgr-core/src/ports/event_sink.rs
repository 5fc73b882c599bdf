//! EventSink port - 診断イベントの記録
//!
//! # 実装
//! - TracingEventSink: `tracing` に流す（本番用）
//! - RecordingEventSink: メモリに貯める（テスト用）
//! - NoopEventSink: 何もしない

use crate::domain::EventRecord;

/// EventSink はパイプラインの結果（成功・失敗）を受け取る
///
/// 配送は並行に処理されるので、emit は `&self` で呼べる必要がある。
/// 書き込みで失敗しても呼び出し側には返さない（ログの失敗でメッセージ処理を止めない）。
pub trait EventSink: Send + Sync {
    fn emit(&self, record: EventRecord);
}
