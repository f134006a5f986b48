/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - ランタイム状態のバッファ・モード操作は全域関数であり失敗しない。
///   状態コンテナで定義される失敗は `InvalidFlag` のみ（呼び出し側の
///   統合ミスを即座に表面化させる）

use thiserror::Error;

/// Domain層の統一エラー型
#[derive(Error, Debug)]
pub enum DomainError {
    /// キャプチャ関連のエラー
    #[error("Capture error: {0}")]
    Capture(String),

    /// ジェスチャー分類関連のエラー
    #[error("Classification error: {0}")]
    Classification(String),

    /// ポインタデバイス関連のエラー
    #[error("Pointer error: {0}")]
    Pointer(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// ジェスチャーマッピング関連のエラー
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// 未知のマウス制御フラグ名
    ///
    /// フラグのキー集合は固定であり、これは統合ミス（タイポ等）を示す。
    /// リトライも握り潰しもせず、即座に呼び出し側へ返す。
    #[error("Invalid mouse flag: {0}")]
    InvalidFlag(String),

    /// 初期化エラー
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// その他のエラー
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;
