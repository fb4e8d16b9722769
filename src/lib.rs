//! askbox library exports for testing

pub mod api;
pub mod core;
pub mod view;

#[cfg(test)]
pub mod test_support;
