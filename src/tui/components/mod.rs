//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: mode, save indicator, status message
//! - `SuggestionPopup`: the open slash-command menu
//!
//! ### Transient Wrappers Over Persistent State
//!
//! Components built each frame around borrowed core data plus a small state
//! struct that lives in `TuiState` (scroll offsets, last cursor cell):
//! - `RawEditor` + `ViewportState`: the raw buffer with wrapping
//! - `BlockView` + `BlockViewState`: the block tree, one row per block
//! - `Preview` + `PreviewState`: rendered Markdown export
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, not by reaching into `App`.
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! TitleBar::new(app.mode(), app.dirty, app.saved_at, app.status_message.clone())
//!     .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (Top status bar)
//! ├── raw_editor/         (Raw buffer: wrapping, cursor, scroll)
//! ├── block_view.rs       (Block tree rows)
//! ├── suggestion_popup.rs (Slash-command menu)
//! └── preview.rs          (Markdown preview pane)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod block_view;
pub mod preview;
pub mod raw_editor;
pub mod suggestion_popup;

pub use block_view::{BlockView, BlockViewState};
pub use preview::{Preview, PreviewState};
pub use raw_editor::{RawEditor, ViewportState};
pub use suggestion_popup::SuggestionPopup;
