//! Process management - utility commands, detached spawning, process tables

use super::{OsError, OsResult};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// A program plus its literal argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished utility command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Best human-readable failure text: stderr, falling back to stdout.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Runs a utility to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandLine) -> OsResult<CommandOutput>;
}

/// Spawns a shell-interpreted command line without waiting for it.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn spawn_shell(&self, command_line: &str, working_dir: Option<&Path>) -> OsResult<u32>;
}

/// `tokio::process` backed runner with an optional upper bound on runtime.
#[derive(Debug, Clone, Default)]
pub struct NativeCommandRunner {
    timeout: Option<Duration>,
}

impl NativeCommandRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for NativeCommandRunner {
    async fn run(&self, command: &CommandLine) -> OsResult<CommandOutput> {
        tracing::debug!("Running command: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => timeout(limit, cmd.output())
                .await
                .map_err(|_| OsError::Timeout {
                    command: command.program.clone(),
                    after_ms: limit.as_millis() as u64,
                })??,
            None => cmd.output().await?,
        };

        Ok(CommandOutput::from(output))
    }
}

/// Launches through the platform shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher;

#[cfg(target_os = "windows")]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    // Outer quotes keep cmd.exe from stripping the quoted program path.
    cmd.arg("/C").raw_arg(format!("\"{command_line}\""));
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[async_trait]
impl ProcessLauncher for ShellLauncher {
    async fn spawn_shell(&self, command_line: &str, working_dir: Option<&Path>) -> OsResult<u32> {
        if command_line.contains('\0') {
            return Err(OsError::InvalidArgument(
                "command line contains a null byte".to_string(),
            ));
        }

        let mut cmd = shell_command(command_line);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn()?;
        child
            .id()
            .ok_or_else(|| OsError::OperationFailed("Failed to get process ID".to_string()))
    }
}

/// Whether `path` names something that can be launched.
///
/// Absolute paths are checked on disk, bare names against the search path.
pub fn program_exists(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.exists();
    }
    which::which(path).is_ok()
}

/// Quote a program path for a shell command line and append raw arguments.
pub fn shell_command_line(path: &str, args: &str) -> String {
    let mut line = format!("\"{path}\"");
    let args = args.trim();
    if !args.is_empty() {
        line.push(' ');
        line.push_str(args);
    }
    line
}

/// One row of a process table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: u32,
    pub memory_kb: u64,
}

/// Layout of the process enumeration utility's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessTableFormat {
    /// `tasklist /fo csv`: quoted columns, memory like `"12,345 K"`.
    TasklistCsv,
    /// `ps -eo comm,pid,rss`: whitespace columns, name may contain spaces.
    PsColumns,
}

/// Parse utility output, skipping the header row and any malformed rows.
pub fn parse_process_table(format: ProcessTableFormat, output: &str) -> Vec<ProcessRecord> {
    output
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| match format {
            ProcessTableFormat::TasklistCsv => parse_tasklist_row(line),
            ProcessTableFormat::PsColumns => parse_ps_row(line),
        })
        .collect()
}

fn parse_memory_kb(raw: &str) -> u64 {
    let digits = raw.trim().replace(',', "").replace(" K", "");
    if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) {
        digits.parse().unwrap_or(0)
    } else {
        0
    }
}

fn parse_tasklist_row(line: &str) -> Option<ProcessRecord> {
    let parts: Vec<&str> = line.trim_end_matches('\r').split("\",\"").collect();
    if parts.len() < 5 {
        return None;
    }
    let name = parts[0].trim_matches('"').to_string();
    let pid = parts[1].trim_matches('"').parse::<u32>().ok()?;
    let memory_kb = parse_memory_kb(parts[4].trim_matches('"'));
    Some(ProcessRecord {
        name,
        pid,
        memory_kb,
    })
}

fn parse_ps_row(line: &str) -> Option<ProcessRecord> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 3 {
        return None;
    }
    let rss = cols[cols.len() - 1];
    let pid = cols[cols.len() - 2].parse::<u32>().ok()?;
    let name = cols[..cols.len() - 2].join(" ");
    Some(ProcessRecord {
        name,
        pid,
        memory_kb: parse_memory_kb(rss),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKLIST: &str = "\"Image Name\",\"PID\",\"Session Name\",\"Session#\",\"Mem Usage\"\r
\"System Idle Process\",\"0\",\"Services\",\"0\",\"8 K\"\r
\"explorer.exe\",\"4312\",\"Console\",\"1\",\"123,456 K\"\r
\"broken row\"\r
\"odd.exe\",\"not-a-pid\",\"Console\",\"1\",\"1 K\"\r
\"weird.exe\",\"77\",\"Console\",\"1\",\"N/A\"\r
";

    #[test]
    fn test_tasklist_parsing_skips_header_and_bad_rows() {
        let rows = parse_process_table(ProcessTableFormat::TasklistCsv, TASKLIST);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "System Idle Process");
        assert_eq!(rows[1].pid, 4312);
        assert_eq!(rows[1].memory_kb, 123_456);
        assert_eq!(rows[2].name, "weird.exe");
        assert_eq!(rows[2].memory_kb, 0);
    }

    #[test]
    fn test_ps_parsing_keeps_names_with_spaces() {
        let output = "COMMAND           PID   RSS\nsystemd             1 12000\nWeb Content      2211 304512\ngarbage\n";
        let rows = parse_process_table(ProcessTableFormat::PsColumns, output);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Web Content");
        assert_eq!(rows[1].pid, 2211);
        assert_eq!(rows[1].memory_kb, 304_512);
    }

    #[test]
    fn test_shell_command_line_quotes_path() {
        assert_eq!(
            shell_command_line("C:\\Program Files\\App\\app.exe", ""),
            "\"C:\\Program Files\\App\\app.exe\""
        );
        assert_eq!(
            shell_command_line("/usr/bin/gedit", " notes.txt "),
            "\"/usr/bin/gedit\" notes.txt"
        );
    }

    #[test]
    fn test_program_exists() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing-app");
        assert!(!program_exists(missing.to_str().unwrap()));
        assert!(program_exists(dir.path().to_str().unwrap()));
        assert!(!program_exists(""));
        assert!(!program_exists("definitely-not-a-real-program-xyz"));
    }

    #[test]
    fn test_error_text_fallbacks() {
        let output = CommandOutput {
            success: false,
            code: Some(128),
            stdout: String::new(),
            stderr: "  ERROR: process not found \n".to_string(),
        };
        assert_eq!(output.error_text(), "ERROR: process not found");

        let silent = CommandOutput {
            success: false,
            code: Some(1),
            ..Default::default()
        };
        assert_eq!(silent.error_text(), "exit status 1");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_native_runner_reports_timeout() {
        let runner = NativeCommandRunner::new(Some(Duration::from_millis(50)));
        let result = runner.run(&CommandLine::new("sleep").arg("5")).await;
        assert!(matches!(result, Err(OsError::Timeout { .. })));
    }
}
