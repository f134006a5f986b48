mod application;
mod domain;
mod infrastructure;
mod logging;

use crate::application::pipeline::{PipelineConfig, PipelineRunner};
use crate::application::runtime_state::RuntimeState;
use crate::domain::config::AppConfig;
use crate::infrastructure::mappings::GestureMappings;
use crate::infrastructure::mock_capture::MockCaptureAdapter;
use crate::infrastructure::mock_classifier::MockClassifierAdapter;
use crate::infrastructure::mock_pointer::MockPointerAdapter;
use crate::logging::init_logging;
use anyhow::Context;
use std::path::PathBuf;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("FingerGuns starting...");

    match run() {
        Ok(_) => {
            tracing::info!("FingerGuns terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> anyhow::Result<()> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    // 設定の検証
    config.validate().context("invalid configuration")?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Capture: frame_interval={}ms, camera={}",
        config.capture.frame_interval_ms,
        config.capture.camera_index
    );
    tracing::info!(
        "Interaction: start_mode={:?}, mouse_track={}, smoothing={:?}",
        config.interaction.start_mode,
        config.interaction.mouse_track,
        config.pointer.smoothing
    );

    // ジェスチャー → アクション対応表の読み込み
    let mappings = GestureMappings::from_file(&config.mappings.action_config_path)
        .context("failed to load gesture mappings")?;
    let (static_count, dynamic_count) = mappings.len();
    tracing::info!(
        "Loaded gesture mappings from {}: {} static, {} dynamic",
        config.mappings.action_config_path,
        static_count,
        dynamic_count
    );
    let (static_actions, dynamic_actions) = mappings.into_tables();

    // モックキャプチャアダプタの初期化（実カメラ + 手検出は未実装）
    tracing::info!("Initializing mock capture adapter...");
    let capture = MockCaptureAdapter::demo(600, config.models.static_input_dim);

    // モック分類アダプタの初期化（学習済みモデルの統合は未実装）
    tracing::info!(
        "Initializing mock classifiers (static: {}, dynamic: {})...",
        config.models.static_model_path,
        config.models.dynamic_model_path
    );
    let static_classifier = MockClassifierAdapter::fixed(config.models.static_input_dim, "seven");
    let dynamic_classifier =
        MockClassifierAdapter::fixed(config.models.dynamic_input_dim, "swipe_right");

    // モックポインタアダプタの初期化（実カーソル制御は未実装）
    tracing::info!("Initializing mock pointer adapter...");
    let pointer = MockPointerAdapter::new();

    // ランタイム状態の初期化
    let state = RuntimeState::new(
        config.interaction.mouse_track,
        config.interaction.start_mode,
        config.pointer.smoothing,
    );

    // パイプライン設定
    let pipeline_config = PipelineConfig {
        stats_interval: config.pipeline.stats_interval(),
        frame_interval: config.capture.frame_interval(),
        idle_sleep: config.capture.idle_sleep(),
        sensitivity: config.pointer.sensitivity,
        scroll_scale: config.pointer.scroll_scale,
    };

    tracing::info!("Starting pipeline (frame loop + stats thread)...");

    // パイプラインの起動（ブロッキング）
    let runner = PipelineRunner::new(
        capture,
        static_classifier,
        dynamic_classifier,
        pointer,
        static_actions,
        dynamic_actions,
        state,
        pipeline_config,
    );

    let summary = runner.run()?;
    tracing::info!(
        "Session summary: frames={}, static={}, dynamic={}, mode_switches={}",
        summary.frames,
        summary.static_gestures,
        summary.dynamic_gestures,
        summary.mode_switches
    );

    Ok(())
}
