//! Infrastructure Layer
//!
//! Domain層のPort traitに対する具体実装を提供します。
//!
//! ## モジュール構成
//! - `mappings`: ジェスチャー → アクション対応表のJSON読み込み
//! - `mock_capture`: スクリプト化されたキャプチャモック
//! - `mock_classifier`: スクリプト化された分類モック
//! - `mock_pointer`: 操作を記録するポインタモック

pub mod mappings;
pub mod mock_capture;
pub mod mock_classifier;
pub mod mock_pointer;
