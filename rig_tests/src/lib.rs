//! Fixtures shared by the integration tests.

use std::path::PathBuf;

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Writes `lines` to a per-process temp file and returns its path.
pub fn write_recording(name: &str, lines: &[&str]) -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("rig_{}_{}.txt", std::process::id(), name));
    let mut text = lines.join("\n");
    text.push('\n');
    std::fs::write(&path, text)?;
    Ok(path)
}
