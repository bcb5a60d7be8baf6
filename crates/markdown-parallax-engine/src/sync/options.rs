use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the two panes are kept aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// Map the top visible line/block through the block segmentation.
    #[default]
    Blocks,
    /// Mirror the scroll fraction. Insensitive to document structure.
    Ratio,
    /// Blocks when both documents segment and fragments have been measured,
    /// ratio otherwise.
    Auto,
}

/// Strategy actually used for one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Blocks,
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    pub strategy: SyncStrategy,
    /// Quiet window after a sync during which the other pane is ignored.
    pub lock_window_ms: u64,
    /// Source pane line height, in the host's scroll units.
    pub line_height: f64,
    /// Slack added to the scroll offset when deciding what is at the top.
    pub visibility_epsilon: f64,
}

impl SyncOptions {
    pub const DEFAULT_LOCK_WINDOW_MS: u64 = 120;
    pub const DEFAULT_LINE_HEIGHT: f64 = 20.0;
    pub const DEFAULT_VISIBILITY_EPSILON: f64 = 1.0;

    pub fn lock_window(&self) -> Duration {
        Duration::from_millis(self.lock_window_ms)
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            strategy: SyncStrategy::default(),
            lock_window_ms: Self::DEFAULT_LOCK_WINDOW_MS,
            line_height: Self::DEFAULT_LINE_HEIGHT,
            visibility_epsilon: Self::DEFAULT_VISIBILITY_EPSILON,
        }
    }
}
