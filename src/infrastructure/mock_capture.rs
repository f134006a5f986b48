/// モックキャプチャアダプタ
///
/// テスト・開発用のキャプチャモック実装。
/// スクリプト化されたサンプル列を順に返し、尽きたらソース終端を報告する。
/// 実カメラ + 手検出の統合は別アダプタの責務。

use crate::domain::{CapturePort, DomainResult, HandSample, Point, SourceInfo};
use std::collections::VecDeque;

/// モックキャプチャアダプタ
pub struct MockCaptureAdapter {
    samples: VecDeque<HandSample>,
}

impl MockCaptureAdapter {
    /// スクリプトからモックを作成
    pub fn from_script(samples: Vec<HandSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// デモ用の合成サンプル列を作成
    ///
    /// ポインタが左上から右下へ滑らかに移動するスクリプト。
    /// キーポイントは全フレーム同一（静的ジェスチャーが安定する）。
    pub fn demo(frames: usize, keypoint_dim: usize) -> Self {
        let samples = (0..frames)
            .map(|i| {
                let t = i as f32 / frames.max(1) as f32;
                HandSample::detected(Point::new(t, t), vec![0.5; keypoint_dim], false)
            })
            .collect();
        Self::from_script(samples)
    }

    /// 残りサンプル数
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl CapturePort for MockCaptureAdapter {
    fn next_sample(&mut self) -> DomainResult<Option<HandSample>> {
        let sample = self.samples.pop_front();

        #[cfg(debug_assertions)]
        if sample.is_none() {
            tracing::debug!("MockCapture: script exhausted");
        }

        Ok(sample)
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            width: 640,
            height: 480,
            fps: 60,
            name: "Mock Camera".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_exhaustion_reports_closed() {
        let mut capture = MockCaptureAdapter::from_script(vec![HandSample::missed(false)]);

        assert!(capture.next_sample().unwrap().is_some());
        assert!(capture.next_sample().unwrap().is_none());
        // 終端後も一貫してNone
        assert!(capture.next_sample().unwrap().is_none());
    }

    #[test]
    fn test_demo_script_moves_pointer() {
        let mut capture = MockCaptureAdapter::demo(10, 49);
        assert_eq!(capture.remaining(), 10);

        let first = capture.next_sample().unwrap().unwrap();
        assert!(first.detected);
        assert_eq!(first.keypoints.len(), 49);
        assert_eq!(first.pointer, Point::new(0.0, 0.0));

        let second = capture.next_sample().unwrap().unwrap();
        assert!(second.pointer.x > first.pointer.x);
    }
}
