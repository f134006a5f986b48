//! Application Layer
//!
//! フレームループ制御、ランタイム状態、アクションディスパッチ、
//! 統計管理などのユースケースを実装します。
//!
//! ## モジュール構成
//! - `runtime_state`: フレームごとに更新される状態コンテナ（モード回転、平滑化リング、エッジ検出）
//! - `dispatch`: ジェスチャー → ポインタアクション変換とフラグのライフサイクル
//! - `pipeline`: 単一所有のフレームループ + 統計スレッド
//! - `stats`: 統計情報管理（FPS、レイテンシ、ジェスチャー数）

pub mod dispatch;
pub mod pipeline;
pub mod runtime_state;
pub mod stats;
