//! Build script for Nomad Spoon
//!
//! Stamps each binary (MCP and HTTP) with a build number and UTC timestamp.
//! The counter lives in `build_number.txt` at the package root.

use std::fs;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn previous_build() -> u64 {
    fs::read_to_string(BUILD_NUMBER_FILE)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let build = previous_build() + 1;
    if let Err(e) = fs::write(BUILD_NUMBER_FILE, build.to_string()) {
        // Read-only checkouts still build; the number just won't advance
        println!("cargo:warning=could not update {}: {}", BUILD_NUMBER_FILE, e);
    }

    let built_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=NOMAD_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=NOMAD_BUILD_TIMESTAMP={}", built_at);
}
