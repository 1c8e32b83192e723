//! Plan artifact: the compiled plan packaged for the assembly container.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::compile::{compile_str, CompileOptions, CompileResult};
use crate::error::{CompileError, CompileWarning};
use crate::plan::CompilationPlan;

/// Current plan artifact format version.
pub const PLAN_FORMAT_VERSION: u32 = 1;

/// Compiler version (from Cargo.toml).
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A compiled plan with provenance metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PlanArtifact {
    pub plan_format_version: u32,
    pub compiled_at: String,
    pub compiler_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceDocument>,
    pub entries: CompilationPlan,
}

/// Metadata about the configuration document a plan was compiled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub file: String,
    pub sha256: String,
}

impl PlanArtifact {
    pub fn new(entries: CompilationPlan, source: Option<SourceDocument>) -> Self {
        Self {
            plan_format_version: PLAN_FORMAT_VERSION,
            compiled_at: chrono::Utc::now().to_rfc3339(),
            compiler_version: COMPILER_VERSION.to_string(),
            source,
            entries,
        }
    }
}

/// Compile a configuration file into a plan artifact.
///
/// Returns the artifact together with the compilation warnings.
pub fn build_artifact(
    path: &Path,
    options: &CompileOptions,
) -> Result<(PlanArtifact, Vec<CompileWarning>), CompileError> {
    let content = std::fs::read_to_string(path)?;
    let CompileResult { plan, warnings } = compile_str(&content, options)?;

    let source = SourceDocument {
        file: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string(),
        sha256: compute_sha256(&content),
    };

    Ok((PlanArtifact::new(plan, Some(source)), warnings))
}

/// Write an artifact as pretty-printed JSON.
pub fn write_artifact<W: Write>(artifact: &PlanArtifact, writer: W) -> Result<(), CompileError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, artifact)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write an artifact to a file, replacing any existing one.
pub fn write_artifact_file(artifact: &PlanArtifact, output: &Path) -> Result<(), CompileError> {
    let file = File::create(output)?;
    write_artifact(artifact, file)
}

/// Load a plan artifact back as untyped JSON.
pub fn load_artifact(path: &Path) -> Result<serde_json::Value, CompileError> {
    let content = std::fs::read_to_string(path)?;
    let artifact: serde_json::Value = serde_json::from_str(&content)?;

    let version = artifact
        .get("plan_format_version")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| CompileError::Parse("missing 'plan_format_version'".into()))?;
    if version != u64::from(PLAN_FORMAT_VERSION) {
        return Err(CompileError::Parse(format!(
            "unsupported plan format version: {} (expected {})",
            version, PLAN_FORMAT_VERSION
        )));
    }

    Ok(artifact)
}

/// Compute SHA-256 hash of a string.
fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
