//! Build information module
//!
//! Compile-time constants reported by the status tool and the startup banner.

use serde::Serialize;

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRILOG_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Cargo profile the binary was built with ("debug" or "release")
pub const BUILD_PROFILE: &str = match option_env!("NUTRILOG_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            build_profile: BUILD_PROFILE,
            description: DESCRIPTION,
        }
    }
}

/// Print the startup banner to stderr (stdout carries MCP frames)
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("-----------------------------------------------");
    eprintln!("  Nutrilog v{} ({})", info.version, info.build_profile);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("-----------------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_uses_package_metadata() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "nutrilog");
        assert!(!info.version.is_empty());
    }
}
