use std::env;
use std::process::Command;

const SHA_LENGTH: usize = 7;

/// Exposes `TAPSFLOW_VERSION` to the binary: the package version, followed
/// by the commit it was built from when one is known.
fn main() {
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    println!("cargo:rustc-env=TAPSFLOW_VERSION={}", version_string());
}

fn version_string() -> String {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    match build_commit() {
        Some(commit) => format!("{version} ({commit})"),
        None => version,
    }
}

/// CI exports the full commit in `GITHUB_SHA`; local builds ask git.
fn build_commit() -> Option<String> {
    let full = match env::var("GITHUB_SHA") {
        Ok(sha) => sha,
        Err(_) => {
            let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            if !output.status.success() {
                return None;
            }
            String::from_utf8(output.stdout).ok()?
        }
    };
    let commit: String = full.trim().chars().take(SHA_LENGTH).collect();
    (!commit.is_empty()).then_some(commit)
}
