//! Data compilation framework.
//!
//! A *data compiler* turns a human-editable source description into a
//! compiled container loadable at runtime (see [`lgn_data_runtime`]). This
//! crate provides what every compiler needs:
//!
//! * [`compiler_api`] - compiler declaration, compilation context and the
//!   `compiler_main` entry point of compiler binaries.
//! * [`process`] - invocation of external tools with captured output.
//! * [`settings`] - configuration shared by compilers.

// crate-specific lint exceptions:
#![warn(missing_docs)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod compiler_api;
pub mod process;
pub mod settings;

/// Platform the data is compiled for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows desktop.
    Windows,
    /// Linux desktop.
    Linux,
    /// Android devices.
    Android,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Self; 3] = [Self::Windows, Self::Linux, Self::Android];

    /// Name of the platform, as used to key platform specific settings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Android => "android",
        }
    }

    /// The platform the compiler runs on.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = compiler_api::CompilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.name() == s)
            .ok_or_else(|| compiler_api::CompilerError::InvalidPlatform(s.to_owned()))
    }
}

/// Flavor of the running compiler build.
///
/// External tools are shipped in the same flavors; a compiler invokes the
/// tool matching its own build.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildVariant {
    /// Unoptimized build with debug assertions.
    Debug,
    /// Optimized build with development features.
    Development,
    /// Shipping build.
    Release,
}

impl BuildVariant {
    /// Flavor of the running build.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else if cfg!(feature = "development") {
            Self::Development
        } else {
            Self::Release
        }
    }

    /// Suffix of external tool names built in this flavor.
    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Development => "development",
            Self::Release => "release",
        }
    }

    /// Executable names to look for, in order, for tool `base`: the generic
    /// name first, then the one matching this flavor.
    pub fn exe_candidates(self, base: &str) -> Vec<String> {
        vec![base.to_owned(), format!("{}-{}", base, self.name())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_str(&platform.to_string()).unwrap(), platform);
        }
        assert!(Platform::from_str("Windows").is_err());
        assert!(Platform::from_str("ps5").is_err());
    }

    #[test]
    fn exe_candidates() {
        assert_eq!(
            BuildVariant::Debug.exe_candidates("texturec"),
            vec!["texturec".to_owned(), "texturec-debug".to_owned()]
        );
        assert_eq!(
            BuildVariant::Release.exe_candidates("texturec")[1],
            "texturec-release"
        );
        assert_eq!(
            BuildVariant::current().exe_candidates("tool").len(),
            2
        );
    }
}
