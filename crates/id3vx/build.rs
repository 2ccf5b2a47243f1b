use std::env;
use std::process::Command;

/// Record build provenance for `id3vx version --extended`.
fn main() {
    for (var, key) in [("TARGET", "ID3VX_BUILD_TARGET"), ("PROFILE", "ID3VX_BUILD_PROFILE")] {
        if let Ok(value) = env::var(var) {
            println!("cargo:rustc-env={key}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok());
    if let Some(version) = version {
        println!("cargo:rustc-env=ID3VX_RUSTC_VERSION={}", version.trim());
    }
}
