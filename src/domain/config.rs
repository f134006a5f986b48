//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。
//! 起動時に一度だけ構築される不変のスナップショットであり、
//! ランタイム状態はここから初期値（start_mode / mouse_track）のみを受け取る。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult, Mode};

/// ポインタ平滑化の方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingPolicy {
    /// バッファ全体の単純平均（デフォルト）
    #[default]
    Mean,
    /// 新しいサンプルほど重みを大きくする線形加重平均
    Weighted,
}

/// アプリケーション設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// キャプチャ設定
    pub capture: CaptureConfig,
    /// 推論モデル設定
    pub models: ModelConfig,
    /// ジェスチャーマッピング設定
    pub mappings: MappingConfig,
    /// ポインタ制御設定
    pub pointer: PointerConfig,
    /// インタラクション初期状態
    pub interaction: InteractionConfig,
    /// パイプライン設定
    pub pipeline: PipelineSettings,
}

/// キャプチャ設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaptureConfig {
    /// カメラデバイスのインデックス
    ///
    /// 通常は0
    #[serde(default)]
    pub camera_index: u32,

    /// フレーム間隔（ミリ秒）
    ///
    /// 例: 16ms = 約60fps、33ms = 約30fps
    /// デフォルト: 16ms
    pub frame_interval_ms: u64,

    /// 手が検出されないフレームの待機時間（ミリ秒）
    ///
    /// デフォルト: 5ms
    pub idle_sleep_ms: u64,
}

impl CaptureConfig {
    /// デフォルトのフレーム間隔（ミリ秒）
    pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
    /// デフォルトのアイドル待機時間（ミリ秒）
    pub const DEFAULT_IDLE_SLEEP_MS: u64 = 5;

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            frame_interval_ms: Self::DEFAULT_FRAME_INTERVAL_MS,
            idle_sleep_ms: Self::DEFAULT_IDLE_SLEEP_MS,
        }
    }
}

/// 推論モデル設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelConfig {
    /// 静的ジェスチャーモデルのパス
    pub static_model_path: String,

    /// 動的ジェスチャーモデルのパス
    pub dynamic_model_path: String,

    /// 静的モデルの入力次元（1フレーム分のキーポイント数）
    ///
    /// デフォルト: 49
    pub static_input_dim: usize,

    /// 動的モデルの1フレームあたり入力次元
    ///
    /// デフォルト: 36
    pub dynamic_input_dim: usize,
}

impl ModelConfig {
    pub const DEFAULT_STATIC_INPUT_DIM: usize = 49;
    pub const DEFAULT_DYNAMIC_INPUT_DIM: usize = 36;
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            static_model_path: "models/gesture_net.pth".to_string(),
            dynamic_model_path: "models/shrec_net.pth".to_string(),
            static_input_dim: Self::DEFAULT_STATIC_INPUT_DIM,
            dynamic_input_dim: Self::DEFAULT_DYNAMIC_INPUT_DIM,
        }
    }
}

/// ジェスチャーマッピング設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MappingConfig {
    /// ジェスチャー → アクション対応表（JSON）のパス
    pub action_config_path: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            action_config_path: "data/action_config.json".to_string(),
        }
    }
}

/// ポインタ制御設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PointerConfig {
    /// 平滑化方式
    ///
    /// 選択肢: "mean" (単純平均), "weighted" (線形加重平均)
    /// デフォルト: "mean"
    #[serde(default)]
    pub smoothing: SmoothingPolicy,

    /// カーソル移動の感度（倍率）
    ///
    /// デフォルト: 1.0
    pub sensitivity: f32,

    /// スクロール量への変換係数
    ///
    /// 平滑化座標と直前座標の縦方向差分に掛ける
    /// デフォルト: 10.0
    pub scroll_scale: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingPolicy::Mean,
            sensitivity: 1.0,
            scroll_scale: 10.0,
        }
    }
}

/// インタラクション初期状態
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// 起動時のモード
    ///
    /// 選択肢: "static", "dynamic"
    /// デフォルト: "static"
    #[serde(default)]
    pub start_mode: Mode,

    /// 起動時にカーソル追従を有効にするか
    pub mouse_track: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            start_mode: Mode::Static,
            mouse_track: true,
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineSettings {
    /// 統計情報の出力間隔（秒）
    pub stats_interval_sec: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            stats_interval_sec: 10,
        }
    }
}

impl PipelineSettings {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_sec)
    }
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    #[allow(dead_code)]
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            DomainError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        if self.capture.frame_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "Frame interval must be greater than 0".to_string(),
            ));
        }

        if self.models.static_input_dim == 0 || self.models.dynamic_input_dim == 0 {
            return Err(DomainError::Configuration(
                "Model input dimensions must be greater than 0".to_string(),
            ));
        }

        if self.mappings.action_config_path.is_empty() {
            return Err(DomainError::Configuration(
                "Action config path must not be empty".to_string(),
            ));
        }

        if self.pointer.sensitivity <= 0.0 {
            return Err(DomainError::Configuration(
                "Sensitivity value must be positive".to_string(),
            ));
        }

        if self.pointer.scroll_scale < 0.0 {
            return Err(DomainError::Configuration(
                "Scroll scale must be non-negative".to_string(),
            ));
        }

        if self.pipeline.stats_interval_sec == 0 {
            return Err(DomainError::Configuration(
                "Stats interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.capture.frame_interval_ms, 16);
        assert_eq!(config.models.static_input_dim, 49);
        assert_eq!(config.models.dynamic_input_dim, 36);
        assert_eq!(config.interaction.start_mode, Mode::Static);
        assert!(config.interaction.mouse_track);
        assert_eq!(config.pointer.smoothing, SmoothingPolicy::Mean);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // 不正なフレーム間隔
        config.capture.frame_interval_ms = 0;
        assert!(config.validate().is_err());

        config.capture.frame_interval_ms = 16;

        // 不正な感度
        config.pointer.sensitivity = 0.0;
        assert!(config.validate().is_err());

        config.pointer.sensitivity = 1.0;

        // 不正な入力次元
        config.models.static_input_dim = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_mode_parsing() {
        let toml = r#"
            start_mode = "dynamic"
            mouse_track = false
        "#;
        let config: InteractionConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.start_mode, Mode::Dynamic);
        assert!(!config.mouse_track);
    }

    #[test]
    fn test_smoothing_policy_parsing() {
        let toml = r#"
            smoothing = "weighted"
            sensitivity = 2.0
            scroll_scale = 5.0
        "#;
        let config: PointerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.smoothing, SmoothingPolicy::Weighted);
        assert_eq!(config.sensitivity, 2.0);
    }

    #[test]
    fn test_full_config_parsing() {
        let toml = r#"
            [capture]
            camera_index = 1
            frame_interval_ms = 33
            idle_sleep_ms = 5

            [models]
            static_model_path = "models/gesture_net.pth"
            dynamic_model_path = "models/shrec_net.pth"
            static_input_dim = 49
            dynamic_input_dim = 36

            [mappings]
            action_config_path = "data/action_config.json"

            [pointer]
            smoothing = "mean"
            sensitivity = 1.0
            scroll_scale = 10.0

            [interaction]
            start_mode = "static"
            mouse_track = true

            [pipeline]
            stats_interval_sec = 10
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.capture.camera_index, 1);
        assert_eq!(config.capture.frame_interval_ms, 33);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_loads() {
        // config.tomlが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml").expect("config.tomlが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");

        assert!(
            config.capture.frame_interval_ms > 0,
            "frame_interval_msは0より大きい必要があります"
        );
        assert!(
            config.pointer.sensitivity > 0.0,
            "sensitivityは0より大きい必要があります"
        );
    }

    #[test]
    fn test_config_example_loads() {
        // config.toml.exampleが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml.example")
            .expect("config.toml.exampleが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");
    }
}
