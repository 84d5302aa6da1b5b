pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod gitmoji;
pub mod manifest;
pub mod ui;

pub use error::{GitShipError, Result};
