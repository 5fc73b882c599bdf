//! App - アプリケーション層
//!
//! ports を組み合わせて desire パイプラインを実装する。
//!
//! # 主要コンポーネント
//! - **environment**: run action の環境変数の組み立て（純粋関数）
//! - **lrp_builder**: DesiredLrp の組み立て（純粋関数）
//! - **DesireHandler**: 1 メッセージ分の decode→enrich→build→store
//! - **DesireListener**: bus の購読ループ
//! - **AppBuilder**: ワイヤリング

pub mod environment;
pub mod lrp_builder;
pub mod handler;
pub mod listener;
pub mod builder;

// 主要な型を再エクスポート
pub use self::environment::{EnrichedEnvironment, InstanceFacts, enrich_environment};
pub use self::lrp_builder::build_desired_lrp;
pub use self::handler::DesireHandler;
pub use self::listener::DesireListener;
pub use self::builder::{App, AppBuilder, BuildError};
