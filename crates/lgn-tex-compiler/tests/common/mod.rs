use std::{
    env,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use lgn_data_compiler::{
    compiler_api::CompilationEnv,
    process::{ProcessOutput, ProcessRunner},
    settings::CompilerSettings,
    Platform,
};

/// Stands in for `texturec`: writes `encoded` to the `-o` argument and
/// reports `exit_code`.
pub struct FakeEncoder {
    pub calls: Mutex<Vec<Vec<OsString>>>,
    pub encoded: Vec<u8>,
    pub exit_code: i32,
    pub output: String,
}

impl FakeEncoder {
    pub fn succeeding(encoded: &[u8]) -> Self {
        Self {
            calls: Mutex::default(),
            encoded: encoded.to_vec(),
            exit_code: 0,
            output: "texturec: done\n".to_owned(),
        }
    }

    pub fn failing(exit_code: i32, output: &str) -> Self {
        Self {
            calls: Mutex::default(),
            encoded: vec![],
            exit_code,
            output: output.to_owned(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for FakeEncoder {
    fn run(&self, _program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        if self.exit_code == 0 {
            let output = args
                .iter()
                .position(|arg| arg == "-o")
                .map(|index| PathBuf::from(&args[index + 1]))
                .unwrap();
            fs::write(output, &self.encoded)?;
        }
        Ok(ProcessOutput {
            exit_code: Some(self.exit_code),
            output: self.output.clone(),
        })
    }
}

pub fn setup_env(
    work_dir: &tempfile::TempDir,
    platform: Platform,
    runner: Arc<dyn ProcessRunner>,
) -> CompilationEnv {
    let settings = CompilerSettings {
        source_dir: Some(work_dir.path().join("source")),
        exe_dir: Some(work_dir.path().join("bin")),
        temp_dir: Some(work_dir.path().join("temp")),
        ..CompilerSettings::default()
    };
    let env = CompilationEnv::new(platform, &settings).with_process_runner(runner);
    for dir in [&env.source_dir, &env.exe_dir, &env.temp_dir] {
        fs::create_dir_all(dir).unwrap();
    }
    env
}

pub fn texturec_path(env: &CompilationEnv) -> PathBuf {
    env.exe_dir
        .join(format!("texturec{}", env::consts::EXE_SUFFIX))
}

pub fn install_texturec(env: &CompilationEnv) {
    fs::write(texturec_path(env), b"").unwrap();
}
