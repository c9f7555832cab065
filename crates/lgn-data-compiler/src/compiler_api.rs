//! Data compiler interface.
//!
//! Data compiler is a binary that takes as input a source description
//! (typically a JSON document referencing a source asset) and produces a
//! compiled container (see [`lgn_data_runtime::ResourceHeader`]) for a given
//! [`Platform`].
//!
//! [`compiler_api`] allows to structure *data compiler* in a specific way.
//!
//! # Data Compiler's main()
//!
//! A data compiler binary must use a [`compiler_main`] function provided by
//! this module. The signature requires data compiler to provide a static
//! [`CompilerDescriptor`] structure defining the properties of the data
//! compiler.
//!
//! Below you can see a minimum code required to compile a data compiler:
//!
//! ```no_run
//! # use lgn_data_compiler::compiler_api::{
//! #     compiler_main, CompilerContext, CompilerDescriptor, CompilerError, DATA_BUILD_VERSION,
//! # };
//! # use lgn_data_runtime::{write_resource, ResourceTag, ResourceType};
//! const OUTPUT_TYPE: ResourceType = ResourceType::new(b"copy");
//!
//! static COMPILER_INFO: CompilerDescriptor = CompilerDescriptor {
//!    name: env!("CARGO_CRATE_NAME"),
//!    build_version: DATA_BUILD_VERSION,
//!    code_version: "1",
//!    data_version: "1",
//!    resource_type: OUTPUT_TYPE,
//!    compile_func: compile,
//! };
//!
//! fn compile(context: &mut CompilerContext<'_>) -> Result<(), CompilerError> {
//!    let content = context.read_source()?;
//!    write_resource(context.output(), ResourceTag::new(OUTPUT_TYPE, 1), &content)?;
//!    Ok(())
//! }
//!
//! fn main() {
//!    std::process::exit(match compiler_main(std::env::args(), &COMPILER_INFO) {
//!        Ok(_) => 0,
//!        Err(_) => 1,
//!    });
//! }
//! ```
//!
//! [`compiler_api`]: ../compiler_api/index.html

// This disables the lint crate-wide as a workaround to allow the doc above.
#![allow(clippy::needless_doctest_main)]

use std::{
    env,
    ffi::OsString,
    fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Instant,
};

use clap::{
    error::ErrorKind, AppSettings, CommandFactory, FromArgMatches, Parser, Subcommand,
};
use lgn_data_runtime::{ResourceError, ResourceType};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;
use tempfile::TempPath;

use crate::{
    process::{MergedOutputRunner, ProcessOutput, ProcessRunner},
    settings::CompilerSettings,
    Platform,
};

/// Current version of data pipeline.
///
/// > **NOTE**: This does not follow *Semantic Versioning* rules.
pub const DATA_BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiler error.
#[derive(thiserror::Error, Debug)]
pub enum CompilerError {
    /// Cannot write to stdout.
    #[error("IOError")]
    StdoutError,
    /// Invalid command line arguments.
    #[error("InvalidArgs")]
    InvalidArgs,
    /// Unknown platform.
    #[error("Unknown platform: '{0}'")]
    InvalidPlatform(String),
    /// Malformed settings.
    #[error("Invalid settings: {0}")]
    Settings(String),
    /// A file the source description references is missing.
    #[error("file does not exist: '{}'", .0.display())]
    SourceNotFound(PathBuf),
    /// None of the candidate executables of an external tool exists.
    #[error("{0} not found")]
    ExecutableNotFound(String),
    /// An external tool could not be started.
    #[error("Failed to spawn `{}`: {source}", .program.display())]
    SpawnFailed {
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// An external tool reported a failure.
    #[error("`{}` {}:\n{output}", .program.display(), describe_exit(.exit_code))]
    ProcessFailed {
        /// Executable that failed.
        program: PathBuf,
        /// Exit code, `None` if the process was terminated by a signal.
        exit_code: Option<i32>,
        /// Everything the tool wrote to its output streams.
        output: String,
    },
    /// The source description is invalid.
    #[error("Invalid source: {0}")]
    InvalidSource(String),
    /// IO failure.
    #[error("ResourceReadFailed: {0}")]
    ResourceReadFailed(io::Error),
    /// IO failure.
    #[error("ResourceWriteFailed: {0}")]
    ResourceWriteFailed(io::Error),
    /// Container write failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// Compiler-specific compilation error.
    #[error("CompilationError: '{0}'")]
    CompilationError(String),
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated".to_owned(),
    }
}

/// The compilation environment - the context in which compilation runs.
pub struct CompilationEnv {
    /// Output platform.
    pub platform: Platform,
    /// Directory relative source names are resolved against.
    pub source_dir: PathBuf,
    /// Directory external tools are looked up in.
    pub exe_dir: PathBuf,
    /// Directory intermediate files are staged in.
    pub temp_dir: PathBuf,
    /// Service running external tools.
    pub process_runner: Arc<dyn ProcessRunner>,
}

impl CompilationEnv {
    /// Creates an environment from resolved settings, running external tools
    /// as child processes.
    pub fn new(platform: Platform, settings: &CompilerSettings) -> Self {
        Self {
            platform,
            source_dir: settings.source_dir(),
            exe_dir: settings.exe_dir(),
            temp_dir: settings.temp_dir(),
            process_runner: Arc::new(MergedOutputRunner),
        }
    }

    /// Replaces the service running external tools.
    #[must_use]
    pub fn with_process_runner(mut self, process_runner: Arc<dyn ProcessRunner>) -> Self {
        self.process_runner = process_runner;
        self
    }
}

/// *Data Compiler's* output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompilationOutput {
    /// Type of the compiled resource.
    pub resource_type: ResourceType,
    /// Size of the compiled container in bytes.
    pub size: usize,
    /// Files read during compilation, besides the source description.
    pub source_dependencies: Vec<PathBuf>,
}

/// Compiler information.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompilerInfo {
    /// Name of data compiler.
    pub name: String,
    /// Data build version of data compiler.
    pub build_version: String,
    /// Code version of data compiler.
    pub code_version: String,
    /// Resource data version.
    pub data_version: String,
    /// Type of the resource the compiler produces.
    pub resource_type: ResourceType,
}

impl From<&CompilerDescriptor> for CompilerInfo {
    fn from(descriptor: &CompilerDescriptor) -> Self {
        Self {
            name: descriptor.name.to_owned(),
            build_version: descriptor.build_version.to_owned(),
            code_version: descriptor.code_version.to_owned(),
            data_version: descriptor.data_version.to_owned(),
            resource_type: descriptor.resource_type,
        }
    }
}

/// Context of the current compilation process.
pub struct CompilerContext<'a> {
    /// Absolute path of the source description being compiled.
    pub source: PathBuf,
    /// Compilation environment.
    pub env: &'a CompilationEnv,
    output: &'a mut Vec<u8>,
    source_dependencies: Vec<PathBuf>,
}

impl<'a> CompilerContext<'a> {
    fn new(source: PathBuf, env: &'a CompilationEnv, output: &'a mut Vec<u8>) -> Self {
        Self {
            source,
            env,
            output,
            source_dependencies: vec![],
        }
    }

    /// Target platform.
    pub fn platform(&self) -> Platform {
        self.env.platform
    }

    /// Reads the source description.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read.
    pub fn read_source(&self) -> Result<Vec<u8>, CompilerError> {
        fs::read(&self.source).map_err(CompilerError::ResourceReadFailed)
    }

    /// Resolves `name` against the source directory.
    pub fn absolute_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.env.source_dir.join(name)
    }

    /// Whether the file `name` exists in the source directory.
    pub fn file_exists(&self, name: impl AsRef<Path>) -> bool {
        self.absolute_path(name).is_file()
    }

    /// Checks the file `name` exists in the source directory.
    ///
    /// # Errors
    ///
    /// Fails with [`CompilerError::SourceNotFound`] if it does not.
    pub fn ensure_file_exists(&self, name: impl AsRef<Path>) -> Result<(), CompilerError> {
        let path = self.absolute_path(name);
        if path.is_file() {
            Ok(())
        } else {
            Err(CompilerError::SourceNotFound(path))
        }
    }

    /// Records that the output depends on file `name`, read by a tool rather
    /// than by the compiler itself.
    pub fn add_source_dependency(&mut self, name: impl AsRef<Path>) {
        let path = self.absolute_path(name);
        if !self.source_dependencies.contains(&path) {
            self.source_dependencies.push(path);
        }
    }

    /// Allocates a unique path with `extension` in the staging directory.
    ///
    /// The file is removed when the returned path is dropped.
    ///
    /// # Errors
    ///
    /// Fails if the staging directory is not writable.
    pub fn temporary_path(&self, extension: &str) -> Result<TempPath, CompilerError> {
        let file = tempfile::Builder::new()
            .prefix("lgn-")
            .suffix(&format!(".{}", extension))
            .tempfile_in(&self.env.temp_dir)
            .map_err(CompilerError::ResourceWriteFailed)?;
        Ok(file.into_temp_path())
    }

    /// Reads a file staged by an external tool.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read.
    pub fn read_temporary(&self, path: &Path) -> Result<Vec<u8>, CompilerError> {
        fs::read(path).map_err(CompilerError::ResourceReadFailed)
    }

    /// Deletes a staged file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be removed.
    pub fn delete_file(&self, path: TempPath) -> Result<(), CompilerError> {
        path.close().map_err(CompilerError::ResourceWriteFailed)
    }

    /// Returns the first of `candidates` present in the tool directory.
    pub fn exe_path(&self, candidates: &[String]) -> Option<PathBuf> {
        candidates
            .iter()
            .map(|name| {
                self.env
                    .exe_dir
                    .join(format!("{}{}", name, env::consts::EXE_SUFFIX))
            })
            .find(|path| path.is_file())
    }

    /// Runs an external tool and waits for its completion.
    ///
    /// # Errors
    ///
    /// Fails with [`CompilerError::SpawnFailed`] if the tool cannot be
    /// started. The exit code is left to the caller to interpret.
    pub fn run_process(
        &self,
        program: &Path,
        args: &[OsString],
    ) -> Result<ProcessOutput, CompilerError> {
        info!("Running {} {:?}", program.display(), args);
        self.env
            .process_runner
            .run(program, args)
            .map_err(|source| CompilerError::SpawnFailed {
                program: program.to_owned(),
                source,
            })
    }

    /// Sink of the compiled container.
    pub fn output(&mut self) -> &mut dyn io::Write {
        &mut *self.output
    }
}

/// Defines data compiler properties.
pub struct CompilerDescriptor {
    /// Compiler name
    pub name: &'static str,
    /// Data build version of data compiler.
    pub build_version: &'static str,
    /// Version of compiler's code.
    pub code_version: &'static str,
    /// Version of resource data formats.
    pub data_version: &'static str,
    /// Type of the resource the compiler produces.
    pub resource_type: ResourceType,
    /// Data compilation function.
    pub compile_func: fn(context: &mut CompilerContext<'_>) -> Result<(), CompilerError>,
}

impl CompilerDescriptor {
    /// Compiles the description at `source` and writes the container to
    /// `writer`.
    ///
    /// The container is staged in memory: nothing is written to `writer`
    /// unless compilation succeeds.
    ///
    /// # Errors
    ///
    /// Any error reported by the compiler.
    pub fn compile(
        &self,
        source: &Path,
        env: &CompilationEnv,
        writer: &mut dyn io::Write,
    ) -> Result<CompilationOutput, CompilerError> {
        let source = env.source_dir.join(source);
        info!("Compiling {} for {}", source.display(), env.platform);
        let start = Instant::now();

        let mut content = vec![];
        let source_dependencies = {
            let mut context = CompilerContext::new(source.clone(), env, &mut content);
            if let Err(error) = (self.compile_func)(&mut context) {
                warn!("{} failed to compile {}: {}", self.name, source.display(), error);
                return Err(error);
            }
            context.source_dependencies
        };

        writer
            .write_all(&content)
            .map_err(CompilerError::ResourceWriteFailed)?;

        info!(
            "Compiled {} ({} bytes) in {:?}",
            source.display(),
            content.len(),
            start.elapsed()
        );
        Ok(CompilationOutput {
            resource_type: self.resource_type,
            size: content.len(),
            source_dependencies,
        })
    }
}

fn run(
    command: Commands,
    descriptor: &CompilerDescriptor,
    settings: CompilerSettings,
) -> Result<(), CompilerError> {
    match command {
        Commands::Info => {
            serde_json::to_writer_pretty(stdout(), &CompilerInfo::from(descriptor))
                .map_err(|_e| CompilerError::StdoutError)?;
            Ok(())
        }
        Commands::Compile {
            source,
            output,
            platform,
            source_dir,
            exe_dir,
            temp_dir,
        } => {
            let platform = platform
                .map(|platform| Platform::from_str(&platform))
                .transpose()?
                .unwrap_or_else(Platform::current);
            let settings = settings.with_overrides(source_dir, exe_dir, temp_dir);
            let env = CompilationEnv::new(platform, &settings);

            let mut content = vec![];
            let compilation_output = descriptor.compile(&source, &env, &mut content)?;
            fs::write(&output, &content).map_err(CompilerError::ResourceWriteFailed)?;

            serde_json::to_writer_pretty(stdout(), &compilation_output)
                .map_err(|_e| CompilerError::StdoutError)?;
            Ok(())
        }
    }
}

#[derive(Parser, Debug)]
#[clap(about = "Legion data compiler", author)]
#[clap(setting(AppSettings::ArgRequiredElseHelp))]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Information about the compiler.
    #[clap(name = "info")]
    Info,
    /// Compile given source description.
    #[clap(name = "compile")]
    Compile {
        /// Source description to compile.
        source: PathBuf,
        /// Compiled container to write.
        #[clap(long)]
        output: PathBuf,
        /// Build platform (windows, linux, android). Defaults to the host.
        #[clap(long)]
        platform: Option<String>,
        /// Directory source names are resolved against.
        #[clap(long)]
        source_dir: Option<PathBuf>,
        /// Directory external tools are looked up in.
        #[clap(long)]
        exe_dir: Option<PathBuf>,
        /// Directory intermediate files are staged in.
        #[clap(long)]
        temp_dir: Option<PathBuf>,
    },
}

/// The main function of every data compiler.
///
/// This must be called by the data compiler. It will parse and validate command
/// line arguments and invoke the appropriate function on the
/// `CompilerDescriptor` interface. The result will be written out to stdout.
///
/// > **NOTE**: Data compiler must not write to stdout because this could break
/// the specific output that is expected.
pub fn compiler_main(
    args: env::Args,
    descriptor: &'static CompilerDescriptor,
) -> Result<(), CompilerError> {
    let command = Cli::command()
        .name(descriptor.name)
        .version(descriptor.code_version);
    let matches = match command.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|_e| CompilerError::StdoutError);
        }
        Err(err) => {
            eprintln!("{}", err);
            return Err(CompilerError::InvalidArgs);
        }
    };
    let args = Cli::from_arg_matches(&matches).map_err(|err| {
        eprintln!("{}", err);
        CompilerError::InvalidArgs
    })?;

    let result = CompilerSettings::load().and_then(|settings| {
        if let Err(err) = SimpleLogger::new()
            .with_level(settings.log_level())
            .init()
        {
            eprintln!("Failed to initialize logger: {}", err);
        }
        run(args.command, descriptor, settings)
    });
    if let Err(error) = &result {
        eprintln!("Compiler Failed With: '{}'", error);
    }
    result
}
