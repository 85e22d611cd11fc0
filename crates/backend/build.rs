use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Places the workspace config.toml next to the built binary, where
/// `load_config` looks for it.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let Some(target_dir) = profile_dir() else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.toml");
    if !source.exists() {
        println!("cargo:warning=config.toml not found, the embedded default will be used");
        return;
    }

    let dest = target_dir.join("config.toml");
    if let Err(e) = fs::copy(&source, &dest) {
        println!("cargo:warning=failed to copy config.toml: {}", e);
    }
}

// OUT_DIR is target/<profile>/build/backend-xxx/out
fn profile_dir() -> Option<PathBuf> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let profile = env::var("PROFILE").ok()?;
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}
