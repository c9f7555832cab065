use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use lgn_data_compiler::{
    compiler_api::CompilationEnv,
    process::{ProcessOutput, ProcessRunner},
    settings::CompilerSettings,
    Platform,
};

/// Records invocations instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    pub exit_code: i32,
    pub output: String,
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_owned(), args.to_vec()));
        Ok(ProcessOutput {
            exit_code: Some(self.exit_code),
            output: self.output.clone(),
        })
    }
}

pub fn setup_env(work_dir: &tempfile::TempDir, runner: Arc<dyn ProcessRunner>) -> CompilationEnv {
    let settings = CompilerSettings {
        source_dir: Some(work_dir.path().join("source")),
        exe_dir: Some(work_dir.path().join("bin")),
        temp_dir: Some(work_dir.path().join("temp")),
        ..CompilerSettings::default()
    };
    let env = CompilationEnv::new(Platform::Linux, &settings).with_process_runner(runner);
    for dir in [&env.source_dir, &env.exe_dir, &env.temp_dir] {
        std::fs::create_dir_all(dir).unwrap();
    }
    env
}
