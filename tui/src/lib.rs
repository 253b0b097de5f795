//! Bodhi sample TUI - terminal surface for the harness
//!
//! A full-screen form over [`harness_core::Harness`]: status and auth on
//! top, the request tester and streaming chat side by side below.
//!
//! # Architecture
//!
//! - **App**: Event loop, key handling and layout
//! - **Focus**: Section / field navigation
//! - **Sections**: One renderer per panel, drawing from harness views
//! - **Widgets**: Borderless scrollable text blocks
//! - **Theme**: Badge colours and accents

pub mod app;
pub mod focus;
pub mod sections;
pub mod theme;
pub mod widgets;

pub use app::App;
