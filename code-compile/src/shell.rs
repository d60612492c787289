use std::{
    path::Path,
    process::Stdio,
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};
use tokio::{
    io::AsyncReadExt,
    process::{Child, ChildStderr, Command},
    task::JoinHandle,
    time::{self, Duration},
};
use tracing::{debug, warn};

use crate::{error::Error, Result};

/// Wall-clock limit for one toolchain invocation
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Bytes of stderr kept; anything beyond is read and dropped
const STDERR_CAPTURE_LIMIT: usize = 1024 * 1024;

/// How long to wait for stderr to close once the process is gone
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// How the child process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellStatus {
    Exited(i32),
    Signaled(i32),
    TimedOut,
    SpawnFailed(String),
}

#[derive(Debug, Clone)]
pub struct ShellOutput {
    pub status: ShellStatus,
    /// Captured standard error, possibly partial after a timeout
    pub stderr: String,
    pub elapsed: Duration,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.status == ShellStatus::Exited(0)
    }
}

/// Runs one external process with a bounded wall-clock time
#[derive(Debug, Clone)]
pub struct Shell {
    timeout: Duration,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILE_TIMEOUT)
    }
}

impl Shell {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Tokenizes `line` on whitespace and runs it
    pub async fn run_line(&self, line: &str, cwd: Option<&Path>) -> Result<ShellOutput> {
        let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        self.run(&argv, cwd).await
    }

    /// Spawns `argv[0]` with the remaining arguments.
    ///
    /// Stdout is discarded and stderr captured. The child runs in its own
    /// process group; on timeout, or if this future is dropped, the group is
    /// killed and the child reaped. Fewer than two tokens is rejected
    /// without spawning anything.
    pub async fn run(&self, argv: &[String], cwd: Option<&Path>) -> Result<ShellOutput> {
        if argv.len() < 2 {
            return Err(Error::InvalidCommand(format!(
                "not enough arguments for compiler: {:?}",
                argv
            )));
        }

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        debug!("Shell run - Command: {:?}", argv);
        let start = Instant::now();

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", argv[0], e);
                return Ok(ShellOutput {
                    status: ShellStatus::SpawnFailed(e.to_string()),
                    stderr: String::new(),
                    elapsed: start.elapsed(),
                });
            }
        };

        let captured = Arc::new(Mutex::new(Vec::new()));
        let reader = child
            .stderr
            .take()
            .map(|pipe| tokio::spawn(capture_stderr(pipe, captured.clone())));

        let status = match time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => exit_status(status),
            Ok(Err(e)) => {
                terminate(&mut child).await;
                return Err(Error::System(format!(
                    "failed to wait for {}: {}",
                    argv[0], e
                )));
            }
            Err(_) => {
                warn!(
                    "{} did not finish within {:?}, killing it",
                    argv[0], self.timeout
                );
                terminate(&mut child).await;
                ShellStatus::TimedOut
            }
        };
        let elapsed = start.elapsed();

        if let Some(reader) = reader {
            finish_reader(reader).await;
        }
        let stderr = {
            let bytes = captured.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        };

        debug!("Shell run - Status: {:?} after {:?}", status, elapsed);
        Ok(ShellOutput {
            status,
            stderr,
            elapsed,
        })
    }
}

fn exit_status(status: std::process::ExitStatus) -> ShellStatus {
    if let Some(code) = status.code() {
        return ShellStatus::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ShellStatus::Signaled(signal);
        }
    }
    ShellStatus::Exited(-1)
}

/// Kills the child's process group, then the child, and reaps it
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(id) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(id as i32), Signal::SIGKILL) {
                debug!("killpg({}) failed: {}", id, e);
            }
        }
    }
    if let Err(e) = child.kill().await {
        warn!("Failed to kill child process: {}", e);
    }
}

async fn capture_stderr(mut pipe: ChildStderr, sink: Arc<Mutex<Vec<u8>>>) {
    let mut chunk = [0u8; 8192];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let mut buf = sink.lock().unwrap_or_else(PoisonError::into_inner);
                let room = STDERR_CAPTURE_LIMIT.saturating_sub(buf.len());
                buf.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(e) => {
                debug!("stderr read failed: {}", e);
                break;
            }
        }
    }
}

/// Lets the reader drain, abandoning it if a leftover process keeps the pipe open
async fn finish_reader(mut reader: JoinHandle<()>) {
    if time::timeout(STDERR_GRACE, &mut reader).await.is_err() {
        debug!("stderr still open after process exit, abandoning reader");
        reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rejects_single_token() {
        let shell = Shell::default();
        assert!(matches!(
            shell.run(&argv(&["gcc"]), None).await,
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            shell.run_line("   ", None).await,
            Err(Error::InvalidCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_success() -> Result<()> {
        let output = Shell::default().run_line("sh -c true", None).await?;
        assert!(output.success());
        assert!(output.stderr.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_returns_stderr_verbatim() -> Result<()> {
        let output = Shell::default()
            .run(&argv(&["sh", "-c", "echo oops >&2; echo ignored; exit 3"]), None)
            .await?;
        assert!(!output.success());
        assert_eq!(output.status, ShellStatus::Exited(3));
        assert_eq!(output.stderr, "oops\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout_kills_process() -> Result<()> {
        let shell = Shell::new(Duration::from_secs(1));
        let output = shell
            .run(&argv(&["sh", "-c", "echo early >&2; sleep 30"]), None)
            .await?;
        assert_eq!(output.status, ShellStatus::TimedOut);
        assert!(!output.success());
        assert!(output.elapsed >= Duration::from_secs(1));
        assert!(output.elapsed < Duration::from_secs(3));
        assert!(output.stderr.contains("early"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_executable() -> Result<()> {
        let output = Shell::default()
            .run_line("definitely-not-a-compiler-7f3a --version", None)
            .await?;
        assert!(matches!(output.status, ShellStatus::SpawnFailed(_)));
        assert!(!output.success());
        Ok(())
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let output = Shell::default()
            .run(&argv(&["sh", "-c", "pwd >&2"]), Some(dir.path()))
            .await?;
        let reported = std::fs::canonicalize(output.stderr.trim())?;
        assert_eq!(reported, std::fs::canonicalize(dir.path())?);
        Ok(())
    }
}
