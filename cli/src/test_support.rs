//! Shared helpers for in-crate unit tests.
//!
//! Provides `ExitStatus`/`Output` constructors and a `CommandRunner` that
//! records every invocation and answers from a script.

#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::CommandTimeout;

/// Build an `ExitStatus` from a logical exit code (0 = success).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15.
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// One scripted reply.
pub enum Reply {
    Output(Output),
    Timeout,
}

/// Records `(program, args)` for every call. Replies are consumed in order;
/// once exhausted every call succeeds with empty output.
pub struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    /// Every call as a flat argv (`program` first).
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("lock").clone()
    }

    /// Calls joined with spaces, for readable assertions.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.join(" ")).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::from_secs(30))
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(ToString::to_string));
        self.calls.lock().expect("lock").push(argv);

        match self.replies.lock().expect("lock").pop_front() {
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::Timeout) => Err(anyhow::Error::new(CommandTimeout {
                program: program.to_string(),
                after: timeout,
            })),
            None => Ok(ok_output(b"")),
        }
    }
}
