//! Compiler configuration.
//!
//! Settings live in the `[data_compiler]` section of `legion.toml`:
//!
//! ```toml
//! [data_compiler]
//! source_dir = "data"
//! exe_dir = "tools/bin"
//! temp_dir = "target/tmp"
//! log_level = "debug"
//! ```
//!
//! Every key can be overridden from the environment, e.g.
//! `LGN_DATA_COMPILER__EXE_DIR=/opt/tools`.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use log::LevelFilter;
use serde::Deserialize;

use crate::compiler_api::CompilerError;

/// The default filename for configuration files.
pub static DEFAULT_FILENAME: &str = "legion.toml";

const SECTION: &str = "data_compiler";

/// Settings shared by all data compilers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Directory relative source names are resolved against.
    /// Defaults to the current directory.
    pub source_dir: Option<PathBuf>,
    /// Directory external tools are looked up in.
    /// Defaults to the directory of the running executable.
    pub exe_dir: Option<PathBuf>,
    /// Directory intermediate files are staged in.
    /// Defaults to the system temporary directory.
    pub temp_dir: Option<PathBuf>,
    /// Log verbosity.
    pub log_level: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            source_dir: None,
            exe_dir: None,
            temp_dir: None,
            log_level: "info".to_owned(),
        }
    }
}

impl CompilerSettings {
    /// Loads the settings from `legion.toml` in the current directory, the
    /// file named by `LGN_CONFIG` and `LGN_` prefixed environment variables,
    /// in that order of precedence.
    ///
    /// # Errors
    ///
    /// Fails if a source is malformed. A missing section yields the defaults.
    pub fn load() -> Result<Self, CompilerError> {
        let mut figment = Figment::new().merge(Toml::file(DEFAULT_FILENAME));
        if let Some(config_file_path) = env::var_os("LGN_CONFIG") {
            figment = figment.merge(Toml::file(config_file_path));
        }
        Self::from_figment(&figment.merge(Env::prefixed("LGN_").split("__")))
    }

    /// Creates the settings from a TOML string.
    ///
    /// Useful for tests mostly.
    ///
    /// # Errors
    ///
    /// Fails if the section is malformed.
    pub fn from_toml(toml: &str) -> Result<Self, CompilerError> {
        Self::from_figment(&Figment::new().merge(Toml::string(toml)))
    }

    fn from_figment(figment: &Figment) -> Result<Self, CompilerError> {
        match figment.extract_inner::<Self>(SECTION) {
            Ok(settings) => Ok(settings),
            Err(err) => match &err.kind {
                figment::error::Kind::MissingField(missing_key) if missing_key.as_ref() == SECTION => {
                    Ok(Self::default())
                }
                _ => Err(CompilerError::Settings(err.to_string())),
            },
        }
    }

    /// Replaces the directories given explicitly, command line flags
    /// typically.
    #[must_use]
    pub fn with_overrides(
        mut self,
        source_dir: Option<PathBuf>,
        exe_dir: Option<PathBuf>,
        temp_dir: Option<PathBuf>,
    ) -> Self {
        self.source_dir = source_dir.or(self.source_dir);
        self.exe_dir = exe_dir.or(self.exe_dir);
        self.temp_dir = temp_dir.or(self.temp_dir);
        self
    }

    /// Log verbosity, `info` if the configured value is unknown.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Resolved source directory.
    pub fn source_dir(&self) -> PathBuf {
        self.source_dir
            .clone()
            .or_else(|| env::current_dir().ok())
            .unwrap_or_default()
    }

    /// Resolved tool directory.
    pub fn exe_dir(&self) -> PathBuf {
        self.exe_dir
            .clone()
            .or_else(|| {
                env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(Path::to_path_buf))
            })
            .unwrap_or_default()
    }

    /// Resolved staging directory.
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(env::temp_dir)
    }
}
