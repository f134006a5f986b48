//! アクションディスパッチ（Application層）
//!
//! 確定したジェスチャー名に対応付けられたアクションをポインタポートへ
//! 変換します。`button_down` / `scroll` フラグのライフサイクル
//! （保持と解放）はここで一元管理します。

use crate::application::runtime_state::{MouseFlags, RuntimeState};
use crate::domain::{Action, DomainResult, Point, PointerPort};

/// アクションディスパッチャ
///
/// ポインタポートを所有し、アクション実行とカーソル移動を仲介する。
pub struct ActionDispatcher<P: PointerPort> {
    pointer: P,
    /// 平滑化座標の縦方向差分をスクロール量へ変換する係数
    scroll_scale: f32,
}

impl<P: PointerPort> ActionDispatcher<P> {
    /// 新しいディスパッチャを作成
    pub fn new(pointer: P, scroll_scale: f32) -> Self {
        Self {
            pointer,
            scroll_scale,
        }
    }

    /// カーソルを移動する（追従が有効なフレームで毎回呼ばれる）
    pub fn move_cursor(&mut self, position: Point) -> DomainResult<()> {
        self.pointer.move_to(position)
    }

    /// アクションを実行する
    ///
    /// 保持型のアクション（LeftMouseDown / Scroll）は対応するフラグを立て、
    /// 異なるアクションが確定した時点で解放する。
    pub fn dispatch(&mut self, action: Action, state: &mut RuntimeState) -> DomainResult<()> {
        // 直前のアクションで保持していた状態を先に解放する
        if state.get_flag(MouseFlags::BUTTON_DOWN)? && action != Action::LeftMouseDown {
            self.pointer.release()?;
            state.set_flag(MouseFlags::BUTTON_DOWN, false)?;
        }
        if state.get_flag(MouseFlags::SCROLL)? && action != Action::Scroll {
            state.set_flag(MouseFlags::SCROLL, false)?;
        }

        match action {
            Action::LeftClick => self.pointer.click(),
            Action::RightClick => self.pointer.right_click(),
            Action::DoubleClick => self.pointer.double_click(),
            Action::LeftMouseDown => {
                if !state.get_flag(MouseFlags::BUTTON_DOWN)? {
                    self.pointer.press()?;
                    state.set_flag(MouseFlags::BUTTON_DOWN, true)?;
                }
                Ok(())
            }
            Action::Scroll => state.set_flag(MouseFlags::SCROLL, true),
            Action::TrackToggle => {
                let enabled = !state.mouse_track();
                state.set_mouse_track(enabled);
                tracing::info!("Mouse tracking toggled: {}", enabled);
                Ok(())
            }
            Action::None => Ok(()),
        }
    }

    /// スクロールモード中の毎フレーム処理
    ///
    /// 平滑化座標と直前座標の縦方向差分をスクロール出力へ変換する。
    pub fn scroll_tick(&mut self, state: &RuntimeState) -> DomainResult<()> {
        if !state.get_flag(MouseFlags::SCROLL)? {
            return Ok(());
        }

        let delta = (state.smoothed_pointer().y - state.prev_pointer().y) * self.scroll_scale;
        if delta != 0.0 {
            self.pointer.scroll(delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::SmoothingPolicy;
    use crate::domain::types::Mode;

    #[derive(Debug, PartialEq)]
    enum Event {
        Moved(f32, f32),
        Pressed,
        Released,
        RightClicked,
        Scrolled(f32),
    }

    struct RecordingPointer {
        events: Vec<Event>,
    }

    impl RecordingPointer {
        fn new() -> Self {
            Self { events: Vec::new() }
        }
    }

    impl PointerPort for RecordingPointer {
        fn move_to(&mut self, position: Point) -> DomainResult<()> {
            self.events.push(Event::Moved(position.x, position.y));
            Ok(())
        }

        fn press(&mut self) -> DomainResult<()> {
            self.events.push(Event::Pressed);
            Ok(())
        }

        fn release(&mut self) -> DomainResult<()> {
            self.events.push(Event::Released);
            Ok(())
        }

        fn right_click(&mut self) -> DomainResult<()> {
            self.events.push(Event::RightClicked);
            Ok(())
        }

        fn scroll(&mut self, delta: f32) -> DomainResult<()> {
            self.events.push(Event::Scrolled(delta));
            Ok(())
        }
    }

    fn new_state() -> RuntimeState {
        RuntimeState::new(true, Mode::Static, SmoothingPolicy::Mean)
    }

    #[test]
    fn test_left_click_dispatch() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();

        dispatcher.dispatch(Action::LeftClick, &mut state).unwrap();
        assert_eq!(dispatcher.pointer.events, vec![Event::Pressed, Event::Released]);
    }

    #[test]
    fn test_left_mouse_down_held_until_other_action() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();

        dispatcher
            .dispatch(Action::LeftMouseDown, &mut state)
            .unwrap();
        assert!(state.flags().button_down());
        assert_eq!(dispatcher.pointer.events, vec![Event::Pressed]);

        // 同じアクションの再ディスパッチでは押下し直さない
        dispatcher
            .dispatch(Action::LeftMouseDown, &mut state)
            .unwrap();
        assert_eq!(dispatcher.pointer.events, vec![Event::Pressed]);

        // 別のアクションが確定したら解放される
        dispatcher.dispatch(Action::None, &mut state).unwrap();
        assert!(!state.flags().button_down());
        assert_eq!(
            dispatcher.pointer.events,
            vec![Event::Pressed, Event::Released]
        );
    }

    #[test]
    fn test_scroll_flag_lifecycle() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();

        dispatcher.dispatch(Action::Scroll, &mut state).unwrap();
        assert!(state.flags().scroll());

        dispatcher.dispatch(Action::None, &mut state).unwrap();
        assert!(!state.flags().scroll());
    }

    #[test]
    fn test_scroll_tick_converts_vertical_delta() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();

        dispatcher.dispatch(Action::Scroll, &mut state).unwrap();

        // 縦方向に動くサンプルを入れる
        state.push_pointer(Point::new(0.0, 0.5));
        dispatcher.scroll_tick(&state).unwrap();

        match dispatcher.pointer.events.as_slice() {
            [Event::Scrolled(delta)] => {
                // smoothed.y = 0.5/5 = 0.1, prev.y = 0.0, scale = 10 → 1.0
                assert!((delta - 1.0).abs() < 1e-6);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_scroll_tick_noop_without_flag() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();

        state.push_pointer(Point::new(0.0, 1.0));
        dispatcher.scroll_tick(&state).unwrap();
        assert!(dispatcher.pointer.events.is_empty());
    }

    #[test]
    fn test_track_toggle() {
        let mut dispatcher = ActionDispatcher::new(RecordingPointer::new(), 10.0);
        let mut state = new_state();
        assert!(state.mouse_track());

        dispatcher
            .dispatch(Action::TrackToggle, &mut state)
            .unwrap();
        assert!(!state.mouse_track());

        dispatcher
            .dispatch(Action::TrackToggle, &mut state)
            .unwrap();
        assert!(state.mouse_track());
    }

}
