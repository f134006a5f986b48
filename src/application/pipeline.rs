//! パイプライン制御モジュール
//!
//! キャプチャ → 修飾キーエッジ/モード回転 → 平滑化/分類 → ディスパッチの
//! フレームループを制御します。ランタイム状態はこのループが単一所有し、
//! ロックなしで毎フレーム更新します。統計のみ専用スレッドへ
//! チャネル経由で送ります（満杯時は破棄、ホットパスはブロックしない）。

use crate::application::{
    dispatch::ActionDispatcher,
    runtime_state::RuntimeState,
    stats::{StatKind, StatsCollector},
};
use crate::domain::{
    Action, CapturePort, ClassifierPort, DomainResult, HandSample, HistoryBuffer, Mode,
    ModifierEdge, Point, PointerPort,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 安定ラベルの成立条件（リング5件中の最低一致数）
pub const STABLE_LABEL_QUORUM: usize = 4;

/// パイプライン設定
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 統計出力間隔
    pub stats_interval: Duration,
    /// フレーム間隔（1フレームの時間予算）
    pub frame_interval: Duration,
    /// 手が検出されないフレームの待機時間
    pub idle_sleep: Duration,
    /// カーソル移動の感度（倍率）
    pub sensitivity: f32,
    /// スクロール量への変換係数
    pub scroll_scale: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stats_interval: Duration::from_secs(10),
            frame_interval: Duration::from_millis(16),
            idle_sleep: Duration::from_millis(5),
            sensitivity: 1.0,
            scroll_scale: 10.0,
        }
    }
}

/// 1フレーム分の統計レポート（統計スレッドへ送信用）
#[derive(Debug, Clone, Default)]
struct FrameReport {
    total: Duration,
    classify: Option<Duration>,
    dispatch: Option<Duration>,
    mode_switched: bool,
    dispatched: bool,
}

/// パイプライン実行結果のサマリ
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub frames: u64,
    pub static_gestures: u64,
    pub dynamic_gestures: u64,
    pub mode_switches: u64,
}

/// パイプライン実行コンテキスト
pub struct PipelineRunner<C, S, D, P>
where
    C: CapturePort,
    S: ClassifierPort,
    D: ClassifierPort,
    P: PointerPort,
{
    capture: C,
    static_classifier: S,
    dynamic_classifier: D,
    dispatcher: ActionDispatcher<P>,
    /// 静的ジェスチャー名 → アクション
    static_actions: HashMap<String, Action>,
    /// 動的ジェスチャー名 → アクション
    dynamic_actions: HashMap<String, Action>,
    state: RuntimeState,
    config: PipelineConfig,
    /// 最後にディスパッチを判定した安定ラベル
    last_stable_label: Option<String>,
    summary: PipelineSummary,
}

impl<C, S, D, P> PipelineRunner<C, S, D, P>
where
    C: CapturePort,
    S: ClassifierPort,
    D: ClassifierPort,
    P: PointerPort,
{
    /// 新しいPipelineRunnerを作成
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        capture: C,
        static_classifier: S,
        dynamic_classifier: D,
        pointer: P,
        static_actions: HashMap<String, Action>,
        dynamic_actions: HashMap<String, Action>,
        state: RuntimeState,
        config: PipelineConfig,
    ) -> Self {
        let dispatcher = ActionDispatcher::new(pointer, config.scroll_scale);
        Self {
            capture,
            static_classifier,
            dynamic_classifier,
            dispatcher,
            static_actions,
            dynamic_actions,
            state,
            config,
            last_stable_label: None,
            summary: PipelineSummary::default(),
        }
    }

    /// パイプラインを起動（ブロッキング）
    ///
    /// キャプチャソースが閉じられるまで実行し、サマリを返す。
    pub fn run(mut self) -> DomainResult<PipelineSummary> {
        let source = self.capture.source_info();
        tracing::info!(
            "Pipeline started: source={} ({}x{} @ {}fps)",
            source.name,
            source.width,
            source.height,
            source.fps
        );

        // 統計スレッドの起動
        let (stats_tx, stats_rx) = bounded::<FrameReport>(64);
        let report_interval = self.config.stats_interval;
        let stats_handle = std::thread::spawn(move || stats_thread(stats_rx, report_interval));

        loop {
            let frame_started = Instant::now();

            let sample = match self.capture.next_sample()? {
                Some(sample) => sample,
                None => {
                    tracing::info!("Capture source closed, shutting down");
                    break;
                }
            };
            let detected = sample.detected;

            let report = crate::measure_span!("process_frame", self.process_frame(sample))?;
            self.summary.frames += 1;
            send_latest_only(&stats_tx, report);

            // フレーム間隔の調整
            let budget = if detected {
                self.config.frame_interval
            } else {
                self.config.idle_sleep
            };
            let elapsed = frame_started.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }

        drop(stats_tx);
        let _ = stats_handle.join();

        tracing::info!(
            "Pipeline finished: frames={}, static={}, dynamic={}, mode_switches={}",
            self.summary.frames,
            self.summary.static_gestures,
            self.summary.dynamic_gestures,
            self.summary.mode_switches
        );

        Ok(self.summary)
    }

    /// 1フレーム分の処理
    ///
    /// 修飾キーのエッジ検出は1フレームにつき1回だけ行う（状態コンテナの
    /// 前提条件）。どちらのエッジでもモードを回転させ、Dynamicを離れる
    /// 回転の直前に蓄積を確定する。start_modeがどちらであっても、蓄積の
    /// 排出者はこのループである。2回の回転は恒等なので、静止状態のモードは
    /// 常にstart_mode。
    fn process_frame(&mut self, sample: HandSample) -> DomainResult<FrameReport> {
        let sampled_at = sample.timestamp;
        let mut report = FrameReport::default();

        let edge = self.state.update_modifier(sample.modifier_down);
        if edge != ModifierEdge::None {
            // Dynamicを離れる瞬間がジェスチャー境界
            if self.state.current_mode() == Mode::Dynamic {
                self.finalize_dynamic(&mut report)?;
            }
            self.state.cycle_mode();
            report.mode_switched = true;
            self.summary.mode_switches += 1;
            tracing::debug!(
                "Modifier edge {:?}, mode -> {:?}",
                edge,
                self.state.current_mode()
            );
        }

        // 手が検出されないフレームはバッファを汚さない
        if sample.detected {
            match self.state.current_mode() {
                Mode::Static => self.static_frame(&sample, &mut report)?,
                Mode::Dynamic => self.state.append_keypoint_frame(sample.keypoints),
            }
        }

        // サンプル取得時刻からのエンドツーエンド時間
        report.total = sampled_at.elapsed();
        Ok(report)
    }

    /// 静的モードの1フレーム: 平滑化・カーソル追従・分類・ディスパッチ
    fn static_frame(&mut self, sample: &HandSample, report: &mut FrameReport) -> DomainResult<()> {
        self.state.push_pointer(sample.pointer);

        if self.state.mouse_track() {
            let smoothed = self.state.smoothed_pointer();
            let scaled = Point::new(
                smoothed.x * self.config.sensitivity,
                smoothed.y * self.config.sensitivity,
            );
            self.dispatcher.move_cursor(scaled)?;
        }

        // スクロール中は分類の成否に関わらず毎フレーム進める
        self.dispatcher.scroll_tick(&self.state)?;

        // モデル契約と異なる次元のフレームは分類をスキップ
        let expected = self.static_classifier.input_dim();
        if sample.keypoints.len() != expected {
            tracing::warn!(
                "Static keypoint dimension mismatch: got {}, expected {}",
                sample.keypoints.len(),
                expected
            );
            return Ok(());
        }

        let classify_started = Instant::now();
        let label = self.static_classifier.classify(&sample.keypoints)?;
        report.classify = Some(classify_started.elapsed());
        self.state.push_static_label(label);

        let stable =
            stable_label(self.state.static_labels(), STABLE_LABEL_QUORUM).map(str::to_string);
        if let Some(stable) = stable {
            if self.last_stable_label.as_deref() != Some(stable.as_str()) {
                self.last_stable_label = Some(stable.clone());
                match self.static_actions.get(&stable).copied() {
                    Some(action) => {
                        let dispatch_started = Instant::now();
                        self.dispatcher.dispatch(action, &mut self.state)?;
                        report.dispatch = Some(dispatch_started.elapsed());
                        report.dispatched = true;
                        self.summary.static_gestures += 1;
                        tracing::info!("Static gesture dispatched: {} -> {:?}", stable, action);
                    }
                    None => {
                        tracing::debug!("No action mapped for static gesture: {}", stable);
                    }
                }
            }
        }

        Ok(())
    }

    /// 動的モード終了時の確定処理: 蓄積分を分類してディスパッチし、排出する
    fn finalize_dynamic(&mut self, report: &mut FrameReport) -> DomainResult<()> {
        let frames = self.state.keypoint_frames();
        if frames.is_empty() {
            return Ok(());
        }

        let frame_count = frames.len();
        let input: Vec<f32> = frames.iter().flatten().copied().collect();

        let classify_started = Instant::now();
        let label = self.dynamic_classifier.classify(&input)?;
        report.classify = Some(classify_started.elapsed());
        tracing::info!(
            "Dynamic gesture classified: {} ({} frames)",
            label,
            frame_count
        );

        self.state.clear_keypoint_buffer();

        match self.dynamic_actions.get(&label).copied() {
            Some(action) => {
                self.dispatcher.dispatch(action, &mut self.state)?;
                report.dispatched = true;
                self.summary.dynamic_gestures += 1;
            }
            None => {
                tracing::debug!("No action mapped for dynamic gesture: {}", label);
            }
        }

        Ok(())
    }
}

/// 直近ラベルの多数決
///
/// 最新のラベルがリング内で `quorum` 件以上を占める場合に安定とみなす。
/// 空文字（シード値）は安定ラベルにならない。
pub fn stable_label(labels: &HistoryBuffer<String>, quorum: usize) -> Option<&str> {
    let latest = labels.latest();
    if latest.is_empty() {
        return None;
    }
    let count = labels.iter_ordered().filter(|l| *l == latest).count();
    (count >= quorum).then_some(latest.as_str())
}

/// 満杯時は破棄するポリシーで統計レポートを送信
///
/// 統計は欠けてもよいが、ホットパスをブロックしてはならない。
fn send_latest_only<T>(tx: &Sender<T>, value: T) {
    match tx.try_send(value) {
        Ok(_) => {}
        Err(TrySendError::Full(_)) => {
            // キューが満杯 - 古いデータは受信側が処理中、単に破棄
        }
        Err(TrySendError::Disconnected(_)) => {
            // Channel closed
        }
    }
}

/// 統計スレッドのメインループ
fn stats_thread(rx: Receiver<FrameReport>, report_interval: Duration) {
    tracing::debug!("Stats thread started");
    let mut stats = StatsCollector::new(report_interval);

    while let Ok(report) = rx.recv() {
        stats.record_frame();
        stats.record_duration(StatKind::EndToEnd, report.total);
        if let Some(duration) = report.classify {
            stats.record_duration(StatKind::Classify, duration);
        }
        if let Some(duration) = report.dispatch {
            stats.record_duration(StatKind::Dispatch, duration);
        }
        if report.mode_switched {
            stats.record_mode_switch();
        }
        if report.dispatched {
            stats.record_gesture();
        }

        if stats.should_report() {
            stats.report_and_reset();
        }
    }
}
