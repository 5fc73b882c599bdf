//! DesiredLrpStore port - desired LRP の正本（distributed store）
//!
//! レプリケーションや一貫性はこのクレートの関心外。
//! 必要なのは「guid をキーにした upsert」だけ。

use async_trait::async_trait;

use crate::domain::{DesiredLrp, ProcessGuid, StoreError};

/// Key prefix under which desired LRPs are stored.
pub const DESIRED_LRP_SCHEMA_ROOT: &str = "/v1/desired_lrp";

/// Store key of a desired LRP.
pub fn desired_lrp_key(guid: &ProcessGuid) -> String {
    format!("{DESIRED_LRP_SCHEMA_ROOT}/{guid}")
}

/// DesiredLrpStore は desired LRP を永続化する
///
/// # 契約
/// - `desire_lrp` は同じ guid で何度呼んでも安全（上書き。重複キーエラーにはしない）
/// - 失敗はそのメッセージにとって終端。リトライは store クライアント側の責務
/// - 呼び出し側はこの呼び出しの間ロックを持たない
#[async_trait]
pub trait DesiredLrpStore: Send + Sync {
    async fn desire_lrp(&self, lrp: &DesiredLrp) -> Result<(), StoreError>;

    async fn desired_lrps(&self) -> Result<Vec<DesiredLrp>, StoreError>;
}
