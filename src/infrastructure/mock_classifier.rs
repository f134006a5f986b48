/// モック分類アダプタ
///
/// テスト・開発用のClassifierPortモック実装。
/// 学習済みモデルの代わりにスクリプト化されたラベル列を返す。
/// 実モデル（ONNX等）の統合は別アダプタの責務。

use crate::domain::{ClassifierPort, DomainResult};

/// モック分類アダプタ
pub struct MockClassifierAdapter {
    labels: Vec<String>,
    cursor: usize,
    input_dim: usize,
}

impl MockClassifierAdapter {
    /// 常に同じラベルを返すモックを作成
    pub fn fixed(input_dim: usize, label: &str) -> Self {
        Self {
            labels: vec![label.to_string()],
            cursor: 0,
            input_dim,
        }
    }

    /// ラベル列を順に返すモックを作成（末尾に達したら最後のラベルを繰り返す）
    ///
    /// # Panics
    /// `labels` が空の場合（構築時のプログラミングエラー）
    pub fn scripted(input_dim: usize, labels: Vec<String>) -> Self {
        assert!(!labels.is_empty(), "scripted classifier needs labels");
        Self {
            labels,
            cursor: 0,
            input_dim,
        }
    }
}

impl ClassifierPort for MockClassifierAdapter {
    fn classify(&mut self, input: &[f32]) -> DomainResult<String> {
        let label = self.labels[self.cursor.min(self.labels.len() - 1)].clone();
        self.cursor += 1;

        #[cfg(debug_assertions)]
        tracing::debug!("MockClassifier: {} values -> {}", input.len(), label);
        #[cfg(not(debug_assertions))]
        let _ = input;

        Ok(label)
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_classifier() {
        let mut classifier = MockClassifierAdapter::fixed(49, "fist");
        assert_eq!(classifier.input_dim(), 49);
        assert_eq!(classifier.classify(&[0.0; 49]).unwrap(), "fist");
        assert_eq!(classifier.classify(&[1.0; 49]).unwrap(), "fist");
    }

    #[test]
    fn test_scripted_classifier_repeats_last() {
        let mut classifier = MockClassifierAdapter::scripted(
            36,
            vec!["a".to_string(), "b".to_string()],
        );
        assert_eq!(classifier.classify(&[]).unwrap(), "a");
        assert_eq!(classifier.classify(&[]).unwrap(), "b");
        assert_eq!(classifier.classify(&[]).unwrap(), "b");
    }

    #[test]
    #[should_panic]
    fn test_scripted_requires_labels() {
        let _ = MockClassifierAdapter::scripted(36, Vec::new());
    }
}
