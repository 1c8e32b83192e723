//! Shared configuration fixtures under `tests/fixtures/`.

use std::path::PathBuf;

use navigation_compiler::{compile_file, CompileError, CompileOptions, CompileResult};

/// Absolute path to the shared test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/navigation-test
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|root| root.join("tests/fixtures"))
        .unwrap_or_else(|| manifest_dir.join("tests/fixtures"))
}

/// Absolute path to one fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Compile a fixture with default options.
pub fn compile_fixture(name: &str) -> Result<CompileResult, CompileError> {
    compile_file(&fixture_path(name), &CompileOptions::default())
}
