//! Invocation of external tools.
//!
//! Tools report diagnostics on both of their output streams. They are
//! captured together, in the order the tool wrote them, so that a failed
//! compilation can surface them verbatim.

use std::{
    ffi::OsString,
    io::{self, Read},
    path::Path,
    process::{Command, Stdio},
};

/// Result of a finished tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code of the process, `None` if it was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Combined standard output and standard error.
    pub output: String,
}

impl ProcessOutput {
    /// True if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Service spawning external tools on behalf of compilers.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args` and blocks until it terminates.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned or its output
    /// could not be read. A non-zero exit code is not an error.
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}

/// Runs tools as child processes, with standard error redirected into
/// standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergedOutputRunner;

impl ProcessRunner for MergedOutputRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        let (mut reader, writer) = io::pipe()?;

        // the command holds the parent's write ends, it must be dropped before
        // reading or the pipe never reaches end of file
        let mut child = {
            let mut command = Command::new(program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            command.spawn()?
        };

        let mut output = vec![];
        let read_result = reader.read_to_end(&mut output);
        let status = child.wait()?;
        read_result?;

        Ok(ProcessOutput {
            exit_code: status.code(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> io::Result<ProcessOutput> {
        MergedOutputRunner.run(
            Path::new("/bin/sh"),
            &[OsString::from("-c"), OsString::from(script)],
        )
    }

    #[test]
    fn merges_streams_in_order() {
        let output = sh("echo first; echo second 1>&2; echo third").unwrap();
        assert!(output.success());
        assert_eq!(output.output, "first\nsecond\nthird\n");
    }

    #[test]
    fn captures_failure() {
        let output = sh("echo 'bad dimensions' 1>&2; exit 2").unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(2));
        assert_eq!(output.output, "bad dimensions\n");
    }

    #[test]
    fn captures_large_output() {
        let output = sh("i=0; while [ $i -lt 20000 ]; do echo line $i; i=$((i+1)); done").unwrap();
        assert!(output.success());
        assert_eq!(output.output.lines().count(), 20000);
        assert_eq!(output.output.lines().last(), Some("line 19999"));
    }

    #[test]
    fn missing_program() {
        let result = MergedOutputRunner.run(Path::new("/nonexistent/texturec"), &[]);
        assert!(result.is_err());
    }
}
