//! External process execution.
//!
//! Every external collaborator (git, npm, docker) is driven through
//! [`CommandRunner`], so the pipeline can be exercised without spawning
//! anything.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread::{self, ScopedJoinHandle},
};

use log::debug;

use crate::config::OUTPUT_TAIL_LINES;

/// A command line to run, with optional working directory.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    echo: bool,
}

impl ToolCommand {
    /// A command whose output is streamed to the terminal while captured.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None, echo: true }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Capture output without echoing it.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn echoes(&self) -> bool {
        self.echo
    }

    /// True when the argument list contains `needle` as a whole argument.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last lines of stdout and stderr, for failure reports.
    pub fn tail(&self) -> String {
        let lines: Vec<&str> = self.stdout.lines().chain(self.stderr.lines()).collect();
        let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
        lines[start..].join("\n")
    }

    /// First line of stdout, trimmed.
    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or_default().trim()
    }
}

/// Runs external commands to completion.
///
/// `Err` means the command could not be spawned or its output could not be
/// read; a command that ran and failed is an `Ok` with a non-success code.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[derive(Clone, Copy)]
enum Sink {
    Stdout,
    Stderr,
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        debug!("Running {command}");

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.cwd {
            process.current_dir(dir);
        }

        let mut child = process.spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let echo = command.echo;

        let (stdout, stderr) = thread::scope(|scope| {
            let out = scope.spawn(move || drain(stdout, echo.then_some(Sink::Stdout)));
            let err = scope.spawn(move || drain(stderr, echo.then_some(Sink::Stderr)));
            (join(out), join(err))
        });
        let status = child.wait()?;

        Ok(ToolOutput { code: status.code(), stdout: stdout?, stderr: stderr? })
    }
}

fn drain(stream: Option<impl Read>, sink: Option<Sink>) -> io::Result<String> {
    let Some(stream) = stream else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(stream);
    let mut captured = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        match sink {
            Some(Sink::Stdout) => print!("    {text}"),
            Some(Sink::Stderr) => eprint!("    {text}"),
            None => {}
        }
        captured.push_str(&text);
    }
    Ok(captured)
}

fn join(handle: ScopedJoinHandle<'_, io::Result<String>>) -> io::Result<String> {
    handle.join().map_err(|_| io::Error::other("output reader thread panicked"))?
}
