//! Build script for Nutrilog
//!
//! Embeds the build timestamp and cargo profile for the status tool.

fn main() {
    println!("cargo:rerun-if-changed=src");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=NUTRILOG_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=NUTRILOG_BUILD_PROFILE={}", profile);
}
