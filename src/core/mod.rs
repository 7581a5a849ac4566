//! # Core Application Logic
//!
//! This module contains Blackboard's editing logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │             CORE             │
//!                    │                              │
//!  KeyInput ───────▶ │  engine / blocks (commands)  │
//!                    │  text / document (models)    │
//!                    │  markdown (serializer)       │
//!                    │  state + action (reducer)    │
//!                    └──────────────┬───────────────┘
//!                                   │ Effect
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!     ┌────────────┐         ┌────────────┐         ┌────────────┐
//!     │  storage   │         │   export   │         │    TUI     │
//!     │ (snapshot) │         │  (.md)     │         │ (ratatui)  │
//!     └────────────┘         └────────────┘         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: command rules over a raw text buffer
//! - [`blocks`]: the same rules over a block tree
//! - [`suggestion`] / [`trigger`]: the slash-command menu and its table
//! - [`offset_map`]: flattened offset → `(span, local)` lookup
//! - [`markdown`]: deterministic block tree → Markdown
//! - [`state`] / [`action`]: the `App` and its reducer
//! - [`storage`], [`autosave`], [`export`], [`config`]: the edges

pub mod action;
pub mod autosave;
pub mod blocks;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;
pub mod key;
pub mod markdown;
pub mod offset_map;
pub mod state;
pub mod storage;
pub mod suggestion;
pub mod text;
pub mod trigger;
