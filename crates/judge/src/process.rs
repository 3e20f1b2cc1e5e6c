use std::{io, process::Stdio, time};

use async_trait::async_trait;
use tokio::{
  io::{AsyncWriteExt, AsyncReadExt},
  process::Command,
  time::timeout,
};

use crate::error::GradingError;

/// Outcome of running the solution command against one input, before the
/// comparator gets a chance to run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
  /// The process exited normally; here is what it wrote to stdout.
  Completed { stdout: Vec<u8> },
  /// Non-zero exit status or killed by a signal.
  RuntimeError,
  /// Killed for exceeding `time_limit`.
  TimeLimitExceeded,
}

/// Spawns the solution command, feeds it the case input, and classifies the
/// outcome. Implementations are small capability interfaces
/// injected at `TestCaseGrader` construction, for mock-driven tests.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
  async fn run(
    &self,
    command: &str,
    stdin: &[u8],
    time_limit: time::Duration,
    memory_limit: u64,
  ) -> Result<RunOutcome, GradingError>;
}

/// Resolves the leading word of a shell command line against `PATH`, the way
/// a shell would before it even gets to forking. Used to tell a genuinely
/// missing executable apart from one that merely exits non-zero or is a
/// shell builtin (`exit`, `cd`, ...), which `which` cannot see and which we
/// leave to the shell to resolve.
fn resolve_program(command: &str) -> io::Result<()> {
  let program = command
    .split_whitespace()
    .next()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty solution command"))?;

  if SHELL_BUILTINS.contains(&program) {
    return Ok(());
  }

  which::which(program)
    .map(|_| ())
    .map_err(|source| io::Error::new(io::ErrorKind::NotFound, source))
}

/// Builtins a `sh -c` command may legitimately name that `which` cannot
/// resolve, since they are not files on `PATH`.
const SHELL_BUILTINS: &[&str] = &["exit", "cd", "true", "false", ":", "echo", "test"];

/// Default `ProcessRunner`: runs the command through the host shell with
/// `tokio::process`, enforcing only the wall-clock time limit. Memory
/// limiting is best-effort and out of scope; a full sandbox is an
/// external collaborator this crate does not own.
pub struct LocalProcessRunner;

#[async_trait]
impl ProcessRunner for LocalProcessRunner {
  async fn run(
    &self,
    command: &str,
    stdin: &[u8],
    time_limit: time::Duration,
    _memory_limit: u64,
  ) -> Result<RunOutcome, GradingError> {
    resolve_program(command).map_err(|source| GradingError::Spawn {
      command: command.to_string(),
      source,
    })?;

    let mut child = Command::new("sh")
      .arg("-c")
      .arg(command)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::null())
      .spawn()
      .map_err(|source| GradingError::Spawn {
        command: command.to_string(),
        source,
      })?;

    let mut stdin_pipe = child.stdin.take().expect("piped stdin");
    let input = stdin.to_vec();
    let writer = tokio::spawn(async move {
      let _ = stdin_pipe.write_all(&input).await;
      let _ = stdin_pipe.shutdown().await;
    });

    let run = async {
      let mut stdout = Vec::new();
      if let Some(mut pipe) = child.stdout.take() {
        let _ = pipe.read_to_end(&mut stdout).await;
      }
      let status = child.wait().await;
      (status, stdout)
    };

    let outcome = match timeout(time_limit, run).await {
      Err(_) => {
        let _ = child.kill().await;
        RunOutcome::TimeLimitExceeded
      }
      Ok((status, stdout)) => match status {
        Ok(status) if status.success() => RunOutcome::Completed { stdout },
        _ => RunOutcome::RuntimeError,
      },
    };

    let _ = writer.await;
    Ok(outcome)
  }
}
