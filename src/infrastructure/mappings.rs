//! ジェスチャーマッピング読み込み（Infrastructure層）
//!
//! ジェスチャー名 → アクションの対応表をJSONから読み込みます。
//! アクション名は閉じた集合（`Action`）に対してserdeで検証されるため、
//! タイポした対応表は起動時に失敗します。
//!
//! # ファイル形式
//! ```json
//! {
//!   "static": { "fist": "left_mouse_down", "palm": "none" },
//!   "dynamic": { "swipe_up": "right_click" }
//! }
//! ```

use crate::domain::{Action, DomainError, DomainResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// ジェスチャー → アクション対応表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GestureMappings {
    /// 静的ジェスチャーの対応表
    #[serde(rename = "static", default)]
    static_actions: HashMap<String, Action>,

    /// 動的ジェスチャーの対応表
    #[serde(rename = "dynamic", default)]
    dynamic_actions: HashMap<String, Action>,
}

impl GestureMappings {
    /// JSONファイルから対応表を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DomainError::Mapping(format!(
                "Failed to read mapping file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| DomainError::Mapping(format!("Failed to parse mapping file: {}", e)))
    }

    /// 静的ジェスチャーに対応するアクション
    pub fn static_action(&self, label: &str) -> Option<Action> {
        self.static_actions.get(label).copied()
    }

    /// 動的ジェスチャーに対応するアクション
    pub fn dynamic_action(&self, label: &str) -> Option<Action> {
        self.dynamic_actions.get(label).copied()
    }

    /// 対応表の件数 (静的, 動的)
    pub fn len(&self) -> (usize, usize) {
        (self.static_actions.len(), self.dynamic_actions.len())
    }

    /// 両方の対応表が空か
    pub fn is_empty(&self) -> bool {
        self.static_actions.is_empty() && self.dynamic_actions.is_empty()
    }

    /// 対応表の所有権を (静的, 動的) のペアで取り出す
    pub fn into_tables(self) -> (HashMap<String, Action>, HashMap<String, Action>) {
        (self.static_actions, self.dynamic_actions)
    }
}
