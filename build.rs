use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

// Stamps the bundle so the home footer can show which build is being served.
fn main() {
    let hash = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(hash) if worktree_dirty() => format!("{hash}*"),
        Some(hash) => hash,
        None => "unknown".to_string(),
    };
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    println!("cargo:rustc-env=BUILD_HASH={hash}");
    println!("cargo:rustc-env=BUILD_EPOCH={epoch}");

    for path in [".git/HEAD", ".git/index", ".git/refs/heads"] {
        println!("cargo:rerun-if-changed={path}");
    }
    for var in ["DINNER_OS_SERVER_URL", "DINNER_OS_LOG"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
}

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn worktree_dirty() -> bool {
    git(&["status", "--porcelain", "-uno"]).is_some()
}
