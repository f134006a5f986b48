//! ランタイム状態管理（Application層）
//!
//! 入力処理ループが毎フレーム読み書きする状態コンテナです。
//! インタラクションモードの回転、ポインタ平滑化リング、静的ジェスチャーの
//! ラベル履歴、動的ジェスチャーのキーポイント蓄積、修飾キーのエッジ検出を
//! 保持します。
//!
//! # 所有モデル
//! 単一の入力処理ループが排他的に所有し、`&mut self` で毎フレーム更新する。
//! ロックは不要（並列化する場合は「サンプル投入→出力導出」を1つの
//! 排他区間で包むこと。`prev_pointer` と修飾キーの前回値は、2回の書き込みの
//! 間に読み取りが割り込まない前提でのみ意味を持つ）。
//!
//! # 計算量
//! すべての操作は O(1) または O(バッファ容量) で完了し、ブロックしない。

use crate::domain::{
    config::SmoothingPolicy,
    error::{DomainError, DomainResult},
    types::{HistoryBuffer, KeypointFrame, Mode, ModifierEdge, Point},
};

/// ポインタ平滑化リングの容量（保持するフレーム数）
pub const POINTER_BUFFER_LEN: usize = 5;

/// 静的ラベル履歴リングの容量
pub const LABEL_BUFFER_LEN: usize = 5;

/// マウス制御フラグ（閉じたキー集合）
///
/// 下流のポインタ制御はちょうどこの2条件で分岐するため、
/// 開いたマップではなく固定フィールドの構造体として持つ。
/// 文字列アクセサは未知のキー名を `InvalidFlag` で即座に弾く。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseFlags {
    button_down: bool,
    scroll: bool,
}

impl MouseFlags {
    /// 左ボタン押しっぱなし状態のフラグ名
    pub const BUTTON_DOWN: &'static str = "button_down";
    /// スクロールモードのフラグ名
    pub const SCROLL: &'static str = "scroll";

    /// フラグを設定する
    ///
    /// # Errors
    /// `name` が固定キー集合に含まれない場合 `DomainError::InvalidFlag`
    pub fn set(&mut self, name: &str, value: bool) -> DomainResult<()> {
        match name {
            Self::BUTTON_DOWN => {
                self.button_down = value;
                Ok(())
            }
            Self::SCROLL => {
                self.scroll = value;
                Ok(())
            }
            _ => Err(DomainError::InvalidFlag(name.to_string())),
        }
    }

    /// フラグを読み取る
    ///
    /// # Errors
    /// `name` が固定キー集合に含まれない場合 `DomainError::InvalidFlag`
    pub fn get(&self, name: &str) -> DomainResult<bool> {
        match name {
            Self::BUTTON_DOWN => Ok(self.button_down),
            Self::SCROLL => Ok(self.scroll),
            _ => Err(DomainError::InvalidFlag(name.to_string())),
        }
    }

    /// 左ボタンが押しっぱなしか
    pub fn button_down(&self) -> bool {
        self.button_down
    }

    /// スクロールモードか
    pub fn scroll(&self) -> bool {
        self.scroll
    }
}

/// ランタイム状態（単一所有、フレームごとに更新）
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// ポインタ位置をカーソル移動へ変換するか
    mouse_track: bool,
    /// 起動時のモード（構築後は不変）
    start_mode: Mode,
    /// モードの回転列。headの指す要素が現在のモード
    modes: [Mode; 2],
    head: usize,
    /// マウス制御フラグ
    flags: MouseFlags,
    /// ポインタ平滑化リング（容量5、(0,0)でシード）
    pointer_buffer: HistoryBuffer<Point>,
    /// 直前フレームのポインタ（速度・差分計算用）
    prev_pointer: Point,
    /// 静的ジェスチャーの直近ラベル（容量5、空文字でシード）
    static_label_buffer: HistoryBuffer<String>,
    /// 動的ジェスチャーのキーポイント蓄積（可変長、消費側が排出する）
    keypoint_buffer: Vec<KeypointFrame>,
    /// 修飾キーの現在値
    modifier_down: bool,
    /// 修飾キーの前フレーム値
    modifier_down_prev: bool,
    /// 平滑化方式
    smoothing: SmoothingPolicy,
}

impl RuntimeState {
    /// 新しいランタイム状態を作成
    ///
    /// # Arguments
    /// - `mouse_track`: カーソル追従の初期値
    /// - `start_mode`: 起動時のモード
    /// - `smoothing`: ポインタ平滑化方式
    pub fn new(mouse_track: bool, start_mode: Mode, smoothing: SmoothingPolicy) -> Self {
        let other = match start_mode {
            Mode::Static => Mode::Dynamic,
            Mode::Dynamic => Mode::Static,
        };

        Self {
            mouse_track,
            start_mode,
            modes: [start_mode, other],
            head: 0,
            flags: MouseFlags::default(),
            pointer_buffer: HistoryBuffer::filled(POINTER_BUFFER_LEN, Point::ZERO),
            prev_pointer: Point::ZERO,
            static_label_buffer: HistoryBuffer::filled(LABEL_BUFFER_LEN, String::new()),
            keypoint_buffer: Vec::new(),
            modifier_down: false,
            modifier_down_prev: false,
            smoothing,
        }
    }

    // ===== モード =====

    /// 現在のモード（回転列の先頭）
    pub fn current_mode(&self) -> Mode {
        self.modes[self.head]
    }

    /// 起動時のモード
    pub fn start_mode(&self) -> Mode {
        self.start_mode
    }

    /// モードを1つ回転させる（先頭が末尾へ移る）
    ///
    /// モードは2つなので、2回呼べば元のモードに戻る。
    pub fn cycle_mode(&mut self) {
        self.head ^= 1;
    }

    // ===== ポインタ平滑化 =====

    /// ポインタサンプルを追加する
    ///
    /// 副作用として `prev_pointer` を「このpush直前の最新サンプル」に
    /// 更新する。消費側はこれで1フレーム分の差分を計算できる。
    pub fn push_pointer(&mut self, sample: Point) {
        self.prev_pointer = *self.pointer_buffer.latest();
        self.pointer_buffer.push(sample);
    }

    /// 平滑化されたポインタ位置
    ///
    /// リングは常に満杯なので「サンプル不足」の特別扱いはない。
    /// 読み取り専用で状態を変更しない。
    pub fn smoothed_pointer(&self) -> Point {
        let n = self.pointer_buffer.capacity() as f32;
        match self.smoothing {
            SmoothingPolicy::Mean => {
                let (sx, sy) = self
                    .pointer_buffer
                    .iter_ordered()
                    .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
                Point::new(sx / n, sy / n)
            }
            SmoothingPolicy::Weighted => {
                // 最古=1 ... 最新=n の線形重み
                let mut sx = 0.0f32;
                let mut sy = 0.0f32;
                let mut total = 0.0f32;
                for (i, p) in self.pointer_buffer.iter_ordered().enumerate() {
                    let w = (i + 1) as f32;
                    sx += p.x * w;
                    sy += p.y * w;
                    total += w;
                }
                Point::new(sx / total, sy / total)
            }
        }
    }

    /// 直前フレームのポインタ位置
    pub fn prev_pointer(&self) -> Point {
        self.prev_pointer
    }

    /// 平滑化リングへの参照（検査用）
    pub fn pointer_buffer(&self) -> &HistoryBuffer<Point> {
        &self.pointer_buffer
    }

    // ===== 静的ラベル履歴 =====

    /// 静的ジェスチャーの分類結果を追加する（FIFO追い出し）
    pub fn push_static_label(&mut self, label: String) {
        self.static_label_buffer.push(label);
    }

    /// 直近の静的ラベル履歴（多数決・デバウンスは消費側の責務）
    pub fn static_labels(&self) -> &HistoryBuffer<String> {
        &self.static_label_buffer
    }

    // ===== 動的キーポイント蓄積 =====

    /// キーポイントフレームを蓄積する
    ///
    /// 動的ジェスチャーの長さは事前に分からないため上限を設けない。
    /// ジェスチャー境界を検出した消費側が `clear_keypoint_buffer` で
    /// 明示的に閉じる。
    pub fn append_keypoint_frame(&mut self, frame: KeypointFrame) {
        self.keypoint_buffer.push(frame);
    }

    /// 蓄積中のキーポイントフレーム
    pub fn keypoint_frames(&self) -> &[KeypointFrame] {
        &self.keypoint_buffer
    }

    /// キーポイント蓄積を空にする（ジェスチャー確定時に消費側が呼ぶ）
    pub fn clear_keypoint_buffer(&mut self) {
        self.keypoint_buffer.clear();
    }

    // ===== 修飾キーのエッジ検出 =====

    /// 修飾キー状態を更新してエッジを返す
    ///
    /// 保持している現在値と比較してエッジを計算した後、
    /// `前回値 = 現在値; 現在値 = is_down` の順で更新する。
    ///
    /// # 前提条件（内部では強制しない）
    /// 1フレームにつき最大1回だけ呼ぶこと。同一フレームで2回呼ぶと
    /// 前回値/現在値の区別が壊れる。
    pub fn update_modifier(&mut self, is_down: bool) -> ModifierEdge {
        let edge = match (is_down, self.modifier_down) {
            (true, false) => ModifierEdge::Pressed,
            (false, true) => ModifierEdge::Released,
            _ => ModifierEdge::None,
        };

        self.modifier_down_prev = self.modifier_down;
        self.modifier_down = is_down;

        edge
    }

    /// 修飾キーの現在値
    pub fn modifier_down(&self) -> bool {
        self.modifier_down
    }

    /// 修飾キーの前フレーム値
    pub fn modifier_down_prev(&self) -> bool {
        self.modifier_down_prev
    }

    // ===== フラグ・追従 =====

    /// マウス制御フラグを設定する
    ///
    /// # Errors
    /// 未知のフラグ名の場合 `DomainError::InvalidFlag`
    pub fn set_flag(&mut self, name: &str, value: bool) -> DomainResult<()> {
        self.flags.set(name, value)
    }

    /// マウス制御フラグを読み取る
    ///
    /// # Errors
    /// 未知のフラグ名の場合 `DomainError::InvalidFlag`
    pub fn get_flag(&self, name: &str) -> DomainResult<bool> {
        self.flags.get(name)
    }

    /// フラグ構造体への参照
    pub fn flags(&self) -> &MouseFlags {
        &self.flags
    }

    /// カーソル追従が有効か
    pub fn mouse_track(&self) -> bool {
        self.mouse_track
    }

    /// カーソル追従を切り替える
    pub fn set_mouse_track(&mut self, enabled: bool) {
        self.mouse_track = enabled;
    }
}
