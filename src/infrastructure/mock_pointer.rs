/// モックポインタアダプタ
///
/// テスト・開発用のPointerPortモック実装。
/// 実行されたポインタ操作を記録し、ログに出力するのみで
/// 実際のシステムカーソルは動かさない。

use crate::domain::{DomainResult, Point, PointerPort};
use std::sync::{Arc, Mutex};

/// 記録されるポインタ操作
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    MovedTo(Point),
    Pressed,
    Released,
    RightClicked,
    Scrolled(f32),
}

/// モックポインタアダプタ
pub struct MockPointerAdapter {
    events: Arc<Mutex<Vec<PointerEvent>>>,
}

impl MockPointerAdapter {
    /// 新しいモックポインタアダプタを作成
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 記録へのハンドルを取得（アダプタがパイプラインへムーブされた後の検査用）
    pub fn events_handle(&self) -> Arc<Mutex<Vec<PointerEvent>>> {
        Arc::clone(&self.events)
    }

    fn record(&self, event: PointerEvent) {
        #[cfg(debug_assertions)]
        tracing::debug!("MockPointer: {:?}", event);

        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for MockPointerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerPort for MockPointerAdapter {
    fn move_to(&mut self, position: Point) -> DomainResult<()> {
        self.record(PointerEvent::MovedTo(position));
        Ok(())
    }

    fn press(&mut self) -> DomainResult<()> {
        self.record(PointerEvent::Pressed);
        Ok(())
    }

    fn release(&mut self) -> DomainResult<()> {
        self.record(PointerEvent::Released);
        Ok(())
    }

    fn right_click(&mut self) -> DomainResult<()> {
        self.record(PointerEvent::RightClicked);
        Ok(())
    }

    fn scroll(&mut self, delta: f32) -> DomainResult<()> {
        self.record(PointerEvent::Scrolled(delta));
        Ok(())
    }
}
