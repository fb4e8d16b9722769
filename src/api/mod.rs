//! # Data Gateway
//!
//! Requests against the Q&A API. Knows nothing about pages or markup.

pub mod client;
pub mod gateway;
pub mod types;

pub use client::HttpGateway;
pub use gateway::{Gateway, GatewayError};
pub use types::{Answer, Author, Credentials, NewQuestion, Question, QuestionId, QuestionPatch, Session};
