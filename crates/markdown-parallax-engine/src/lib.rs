pub mod document;
pub mod highlight;
pub mod index;
pub mod parsing;
pub mod render;
pub mod sync;
pub mod viewport;

// Re-export key types for easier usage
pub use document::Document;
pub use highlight::{GutterLine, HighlightRange, gutter_lines};
pub use index::{BlockIndex, block_index_of, block_range_of};
pub use parsing::{Block, normalize_text, segment};
pub use render::{BlockFragment, BlockRenderer, MarkdownRenderer, render_fragments};
pub use sync::{
    SyncCoordinator, SyncMode, SyncObserver, SyncOptions, SyncOutcome, SyncState, SyncStrategy,
};
pub use viewport::{
    FragmentLayout, LineLayout, PaneId, ScrollSurface, UnitLayout, ViewportController,
    VisibilityChange, VisibleUnit,
};
