/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、Application層がDIで注入する。

use crate::domain::{DomainResult, HandSample, Point};

/// キャプチャポート: 手のサンプル取得を抽象化
pub trait CapturePort: Send {
    /// 次のサンプルを取得する
    ///
    /// 実装はフレームが用意できるまでブロックしてよい。
    ///
    /// # Returns
    /// - `Ok(Some(HandSample))`: 新しいサンプル
    /// - `Ok(None)`: ソースが閉じられた（カメラ切断・スクリプト終端）
    /// - `Err(DomainError)`: 致命的エラー
    fn next_sample(&mut self) -> DomainResult<Option<HandSample>>;

    /// キャプチャソースの情報を取得
    fn source_info(&self) -> SourceInfo;
}

/// キャプチャソース情報
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub name: String,
}

/// 分類ポート: 学習済みモデルによる推論を抽象化
///
/// ランタイムから見たモデルは「入力ベクトル → ジェスチャー名」の
/// 不透明な能力であり、モデル構造には依存しない。
/// 静的・動的それぞれのモデルに対して1インスタンスずつ注入される。
pub trait ClassifierPort: Send {
    /// 入力ベクトルを分類してジェスチャー名を返す
    ///
    /// # Arguments
    /// - `input`: 静的の場合は1フレーム分のキーポイント、
    ///   動的の場合は蓄積フレームを平坦化したベクトル
    fn classify(&mut self, input: &[f32]) -> DomainResult<String>;

    /// 1フレームあたりの期待入力次元
    fn input_dim(&self) -> usize;
}

/// ポインタポート: システムカーソルの制御を抽象化
pub trait PointerPort: Send {
    /// カーソルを指定座標へ移動
    fn move_to(&mut self, position: Point) -> DomainResult<()>;

    /// 左ボタンを押下（押しっぱなしにする）
    fn press(&mut self) -> DomainResult<()>;

    /// 左ボタンを解放
    fn release(&mut self) -> DomainResult<()>;

    /// 右クリック
    fn right_click(&mut self) -> DomainResult<()>;

    /// 垂直スクロール（正=上方向）
    fn scroll(&mut self, delta: f32) -> DomainResult<()>;

    /// 左クリック（デフォルト実装: press + release）
    fn click(&mut self) -> DomainResult<()> {
        self.press()?;
        self.release()
    }

    /// ダブルクリック（デフォルト実装: click x2）
    fn double_click(&mut self) -> DomainResult<()> {
        self.click()?;
        self.click()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// press/release の呼び出し回数のみ数えるモック
    struct CountingPointer {
        presses: u32,
        releases: u32,
    }

    impl PointerPort for CountingPointer {
        fn move_to(&mut self, _position: Point) -> DomainResult<()> {
            Ok(())
        }

        fn press(&mut self) -> DomainResult<()> {
            self.presses += 1;
            Ok(())
        }

        fn release(&mut self) -> DomainResult<()> {
            self.releases += 1;
            Ok(())
        }

        fn right_click(&mut self) -> DomainResult<()> {
            Ok(())
        }

        fn scroll(&mut self, _delta: f32) -> DomainResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_click_default_impl() {
        let mut pointer = CountingPointer {
            presses: 0,
            releases: 0,
        };
        pointer.click().unwrap();
        assert_eq!(pointer.presses, 1);
        assert_eq!(pointer.releases, 1);
    }

    #[test]
    fn test_double_click_default_impl() {
        let mut pointer = CountingPointer {
            presses: 0,
            releases: 0,
        };
        pointer.double_click().unwrap();
        assert_eq!(pointer.presses, 2);
        assert_eq!(pointer.releases, 2);
    }
}
