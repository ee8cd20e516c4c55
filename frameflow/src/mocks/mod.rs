//! Mocked entities for testing purposes.

pub mod sprite;
