//! Test harnesses for the navigation compiler.
//!
//! Provides fixture helpers for end-to-end compilation tests and the
//! CLI regression tests for the `navigation` binary.

#[cfg(test)]
pub mod cli;
pub mod fixtures;

pub use fixtures::{compile_fixture, fixture_path, fixtures_dir};
