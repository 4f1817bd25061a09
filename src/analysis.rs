/*!
 * TypeScript check report
 *
 * Runs `npx tsc --noEmit` in the scan root when a `package.json` is present
 * and turns the outcome into a Markdown block. Every failure of the external
 * process ends up inside that block; nothing here aborts an export.
 */

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Manifest whose presence enables the check
pub const MANIFEST_FILE: &str = "package.json";

/// Heading of the report block
pub const REPORT_HEADING: &str = "# TypeScript Check";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit code and captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, 1 if the process was killed by a signal
    pub code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Runs an external program to completion
pub trait ProcessRunner {
    /// Run `program` with `args` in `cwd` and capture its output
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<ProcessOutput>;
}

/// Runs programs found on `PATH`, killing them after a timeout
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// Create a runner with the given timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn timed_out(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("timed out after {}s", self.timeout.as_secs()),
        )
    }
}

/// Read a pipe to the end on its own thread, delivering the text once
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Kill the child and, on Unix, every process left in its group
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let killed = Command::new("sh")
            .args(["-c", "kill -KILL \"$1\"", "sh", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = killed {
            log::warn!("Failed to kill process group {}: {}", group, e);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<ProcessOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = command.spawn()?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                kill_tree(&mut child);
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Descendants may still hold the pipes after the child exits
        let collect = |rx: &Receiver<String>| {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(text) => Some(text),
                Err(RecvTimeoutError::Disconnected) => Some(String::new()),
                Err(RecvTimeoutError::Timeout) => None,
            }
        };
        let (Some(stdout), Some(stderr)) = (collect(&stdout), collect(&stderr)) else {
            kill_tree(&mut child);
            return Err(self.timed_out());
        };

        Ok(ProcessOutput {
            code: status.code().unwrap_or(1),
            stdout,
            stderr,
        })
    }
}

/// Produces the TypeScript check block for a scan root
pub struct TypeChecker {
    runner: Box<dyn ProcessRunner>,
}

impl TypeChecker {
    /// Create a checker backed by `runner`
    pub fn new(runner: Box<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn command() -> (&'static str, [&'static str; 2]) {
        let npx = if cfg!(windows) { "npx.cmd" } else { "npx" };
        (npx, ["tsc", "--noEmit"])
    }

    /// Run the check, mapping spawn failures to synthetic exit codes
    fn execute(&self, root: &Path) -> ProcessOutput {
        let (program, args) = Self::command();
        let cmd_str = format!("{} {}", program, args.join(" "));
        log::info!("Running command: {}", cmd_str);

        let start = Instant::now();
        let result = self.runner.run(program, &args, root);
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(output) => {
                if output.code == 0 {
                    log::info!("Command '{}' succeeded ({:.2}s)", cmd_str, duration);
                } else {
                    log::warn!(
                        "Command '{}' exited with code {} ({:.2}s)",
                        cmd_str,
                        output.code,
                        duration
                    );
                    let stdout = output.stdout.trim();
                    if !stdout.is_empty() {
                        log::info!("stdout:\n{}", stdout);
                    }
                    let stderr = output.stderr.trim();
                    if !stderr.is_empty() {
                        log::error!("stderr:\n{}", stderr);
                    }
                }
                output
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::error!("Executable not found for command: {}. Check your PATH.", cmd_str);
                ProcessOutput {
                    code: 127,
                    stdout: String::new(),
                    stderr: format!("command not found: {}", program),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                log::error!("Command '{}' {}", cmd_str, e);
                ProcessOutput {
                    code: 124,
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
            }
            Err(e) => {
                log::error!("Unexpected error running '{}': {}", cmd_str, e);
                ProcessOutput {
                    code: 1,
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
            }
        }
    }

    /// Report block for `root`, or `None` when there is no manifest
    pub fn report(&self, root: &Path) -> Option<Vec<String>> {
        if !root.join(MANIFEST_FILE).exists() {
            log::debug!("No {} in {}, skipping type check", MANIFEST_FILE, root.display());
            return None;
        }

        let output = self.execute(root);
        let mut lines = vec![REPORT_HEADING.to_string(), String::new()];

        if output.code == 0 {
            lines.push("No errors found.".to_string());
        } else {
            lines.push("```".to_string());
            for stream in [&output.stdout, &output.stderr] {
                let text = stream.trim_end();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            lines.push("```".to_string());
        }

        Some(lines)
    }
}
