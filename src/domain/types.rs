/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// キャプチャ・分類・ポインタ制御のすべてで共有される型。

use std::time::Instant;

/// ポインタ座標 (x, y)
///
/// キャプチャソースが出力する正規化座標（通常 [0, 1]）を想定するが、
/// 値域の制約は持たない。任意の座標ペアを受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// 原点 (0, 0)
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// 新しい座標を作成
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 動的ジェスチャー1フレーム分のキーポイントベクトル
///
/// 次元数はモデル側の契約（config.toml の models セクション）で決まる。
pub type KeypointFrame = Vec<f32>;

/// インタラクションモード
///
/// 各モードはシステムとの異なる対話方法を表す。
/// - `Static`: 1フレームの手形状で操作（カーソル移動、クリック、スクロール）
/// - `Dynamic`: 複数フレームの軌跡で操作（複合アクション）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Static,
    Dynamic,
}

/// ジェスチャーに対応付けられるアクション（閉じた集合）
///
/// マッピングJSONの値はこの集合に対してserdeで検証されるため、
/// 未知のアクション名は読み込み時点で失敗する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// 左クリック
    LeftClick,
    /// 右クリック
    RightClick,
    /// ダブルクリック
    DoubleClick,
    /// 左ボタンを押しっぱなしにする（ドラッグ開始）
    LeftMouseDown,
    /// スクロールモード
    Scroll,
    /// カーソル追従のオン/オフ切り替え
    TrackToggle,
    /// 何もしない
    None,
}

/// 修飾キーのエッジ検出結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierEdge {
    /// 変化なし（押され続けている、離され続けている）
    None,
    /// 立ち上がりエッジ（押された瞬間）
    Pressed,
    /// 立ち下がりエッジ（離された瞬間）
    Released,
}

/// キャプチャソースが出力する1フレーム分のサンプル
#[derive(Debug, Clone)]
pub struct HandSample {
    /// サンプル取得時刻
    pub timestamp: Instant,
    /// ポインタ座標（手の基準点）
    pub pointer: Point,
    /// キーポイントベクトル
    pub keypoints: KeypointFrame,
    /// 修飾キーの押下状態
    pub modifier_down: bool,
    /// 手が検出されたか（falseのフレームはバッファに反映しない）
    pub detected: bool,
}

impl HandSample {
    /// 検出ありのサンプルを作成
    pub fn detected(pointer: Point, keypoints: KeypointFrame, modifier_down: bool) -> Self {
        Self {
            timestamp: Instant::now(),
            pointer,
            keypoints,
            modifier_down,
            detected: true,
        }
    }

    /// 検出なしのサンプルを作成（修飾キー状態のみ有効）
    pub fn missed(modifier_down: bool) -> Self {
        Self {
            timestamp: Instant::now(),
            pointer: Point::ZERO,
            keypoints: Vec::new(),
            modifier_down,
            detected: false,
        }
    }
}

/// 固定長履歴バッファ（常に満杯のFIFOリング）
///
/// 構築時に全スロットをシード値で満たし、以降のpushは最古の要素を
/// 上書きする。長さが容量を下回る状態は構造上存在しないため、
/// 「サンプル不足」の特別扱いが不要になる。
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    slots: Vec<T>,
    /// 次に書き込むスロット（= 現在の最古要素の位置）
    head: usize,
}

impl<T: Clone> HistoryBuffer<T> {
    /// 全スロットをシード値で満たしたバッファを作成
    ///
    /// # Panics
    /// `capacity == 0` の場合（構築時のプログラミングエラー）
    pub fn filled(capacity: usize, seed: T) -> Self {
        assert!(capacity > 0, "HistoryBuffer capacity must be non-zero");
        Self {
            slots: vec![seed; capacity],
            head: 0,
        }
    }

    /// 要素を追加し、最古の要素を追い出す
    pub fn push(&mut self, item: T) {
        self.slots[self.head] = item;
        self.head = (self.head + 1) % self.slots.len();
    }

    /// バッファ容量（= 常に保持している要素数）
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 最新の要素
    pub fn latest(&self) -> &T {
        let len = self.slots.len();
        &self.slots[(self.head + len - 1) % len]
    }

    /// 最古→最新の順で走査
    pub fn iter_ordered(&self) -> impl Iterator<Item = &T> {
        let (tail, front) = self.slots.split_at(self.head);
        front.iter().chain(tail.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_buffer_starts_full() {
        let buffer = HistoryBuffer::filled(5, 0i32);
        assert_eq!(buffer.capacity(), 5);
        assert_eq!(buffer.iter_ordered().count(), 5);
        assert!(buffer.iter_ordered().all(|&v| v == 0));
    }

    #[test]
    fn test_history_buffer_evicts_oldest() {
        let mut buffer = HistoryBuffer::filled(3, 0i32);
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);
        buffer.push(4);

        // 常に容量ぴったり、最新3件をpush順で保持
        assert_eq!(buffer.iter_ordered().count(), 3);
        let contents: Vec<i32> = buffer.iter_ordered().copied().collect();
        assert_eq!(contents, vec![2, 3, 4]);
        assert_eq!(*buffer.latest(), 4);
    }

    #[test]
    fn test_history_buffer_latest_before_push() {
        let buffer = HistoryBuffer::filled(5, (0.0f32, 0.0f32));
        assert_eq!(*buffer.latest(), (0.0, 0.0));
    }

    #[test]
    fn test_history_buffer_long_sequence() {
        let mut buffer = HistoryBuffer::filled(5, 0u64);
        for i in 1..=100u64 {
            buffer.push(i);
            assert_eq!(buffer.iter_ordered().count(), 5);
            assert_eq!(*buffer.latest(), i);
        }
        let contents: Vec<u64> = buffer.iter_ordered().copied().collect();
        assert_eq!(contents, vec![96, 97, 98, 99, 100]);
    }

    #[test]
    #[should_panic]
    fn test_history_buffer_zero_capacity_panics() {
        let _ = HistoryBuffer::filled(0, 0i32);
    }

    #[test]
    fn test_hand_sample_constructors() {
        let sample = HandSample::detected(Point::new(0.5, 0.5), vec![1.0; 49], true);
        assert!(sample.detected);
        assert!(sample.modifier_down);
        assert_eq!(sample.keypoints.len(), 49);

        let missed = HandSample::missed(false);
        assert!(!missed.detected);
        assert!(missed.keypoints.is_empty());
        assert_eq!(missed.pointer, Point::ZERO);
    }
}
