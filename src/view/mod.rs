//! # View Renderer
//!
//! Turns question records into escaped markup and writes it into the
//! [`Document`]. No dependency on the gateway.

pub mod document;
pub mod render;

pub use document::{Container, Document, Form, FormId, NavLink, NavLinkId, PageElement, ViewError};
pub use render::{Notice, render_notice, render_question_detail, render_question_list};
