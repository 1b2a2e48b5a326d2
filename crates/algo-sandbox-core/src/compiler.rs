//! Program compilation through the node.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use algo_transport::NodeApi;

/// Compile program source text into bytecode.
pub fn compile_program(node: &dyn NodeApi, source: &str) -> Result<Vec<u8>> {
    let compiled = node
        .compile(source.as_bytes())
        .context("Failed to compile program")?;
    debug!(hash = %compiled.hash, size = compiled.program.len(), "compiled program");
    Ok(compiled.program)
}

/// Read a UTF-8 source file and compile it.
pub fn compile_file(node: &dyn NodeApi, path: &Path) -> Result<Vec<u8>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program source {}", path.display()))?;
    compile_program(node, &source).with_context(|| format!("Compiling {}", path.display()))
}
