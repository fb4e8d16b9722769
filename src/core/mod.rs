//! # Navigation Core
//!
//! Which page is showing, what a click or a submit does, and how finished
//! requests land on the page.
//!
//! ```text
//!     user event                  gateway completion
//!         │                              │
//!         ▼                              ▼
//!   ┌──────────────────────────────────────────┐
//!   │  update(app, action) → Vec<Effect>        │
//!   │  • navigate_to() owns the active page     │
//!   │  • renders through crate::view            │
//!   └───────────────────┬──────────────────────┘
//!                       ▼
//!            NavigationController::spawn
//!              (gateway call on tokio)
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the race policy
//! - [`action`]: The `Action`/`Effect` enums and the `update()` reducer
//! - [`controller`]: Runs effects and feeds completions back in
//! - [`page`]: The page identifiers
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod config;
pub mod controller;
pub mod page;
pub mod state;

pub use action::{Action, Effect};
pub use controller::NavigationController;
pub use page::Page;
pub use state::{App, RacePolicy};
