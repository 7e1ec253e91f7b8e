//! External-filter pipeline.
//!
//! Runs a document's text through an external command:
//! - trim the text to its content region (JSON/XML heuristics)
//! - write it to a scoped temporary input file
//! - run the command synchronously, stdin from the input file and stdout to
//!   a second temporary file
//! - classify the exit status and read the output back
//!
//! Both temporary files are removed before [`run_filter`] returns, whatever
//! the outcome. The caller's text is never modified; a successful run
//! returns new text that the caller substitutes itself.

pub mod formatter;
pub mod scratch;
pub mod trim;

use scratch::ScratchFiles;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use trim::{TrimRange, TrimStrategy};

/// Exit status a shell or exec wrapper reports for "command not found"
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCommand {
    /// Program and arguments, executed without a shell
    Program { argv: Vec<String>, package: String },
    /// Freeform fragment run through the user's shell
    Shell(String),
}

impl FilterCommand {
    /// Short text for logs and messages
    pub fn display(&self) -> String {
        match self {
            FilterCommand::Program { argv, .. } => shell_words::join(argv),
            FilterCommand::Shell(fragment) => fragment.trim().to_string(),
        }
    }
}

/// One filter invocation
#[derive(Debug, Clone)]
pub struct FilterRequest<'a> {
    pub text: &'a str,
    pub trim: TrimStrategy,
    pub command: FilterCommand,
    /// Where scratch files are created (system temp dir when `None`)
    pub scratch_dir: Option<PathBuf>,
    /// Scratch file suffix, e.g. ".json"
    pub suffix: String,
}

impl<'a> FilterRequest<'a> {
    pub fn new(text: &'a str, command: FilterCommand) -> Self {
        Self {
            text,
            trim: TrimStrategy::None,
            command,
            scratch_dir: None,
            suffix: ".txt".to_string(),
        }
    }

    /// Request for one of the fixed formatters
    pub fn for_formatter(text: &'a str, formatter: &formatter::Formatter) -> Self {
        Self {
            trim: formatter.trim,
            suffix: formatter.suffix.clone(),
            ..Self::new(text, formatter.command())
        }
    }

    /// Request for a freeform shell pipe
    pub fn pipe(text: &'a str, fragment: &str) -> Self {
        Self::new(text, FilterCommand::Shell(fragment.to_string()))
    }

    pub fn with_trim(mut self, trim: TrimStrategy) -> Self {
        self.trim = trim;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

/// Successful filter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutput {
    /// Everything the command wrote to stdout (may be empty)
    pub text: String,
    /// Region of the input that was passed to the command
    pub range: TrimRange,
}

/// Why a filter run produced no text
#[derive(Debug)]
pub enum FilterError {
    /// The formatter is not installed or not on the execution path
    ToolMissing { tool: String, package: String },
    /// The command ran and failed; `exit_code` is `None` when it was killed
    /// by a signal
    Format {
        exit_code: Option<i32>,
        diagnostic: String,
    },
    /// The command succeeded but its output could not be read as text
    OutputUnreadable(io::Error),
    /// Empty pipe command; nothing was done
    Cancelled,
    /// Scratch file or process plumbing failed
    Io { context: String, source: io::Error },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::ToolMissing { tool, package } => {
                write!(
                    f,
                    "{tool} is not installed (contained in package {package})"
                )
            }
            FilterError::Format {
                exit_code: Some(code),
                diagnostic,
            } if diagnostic.is_empty() => write!(f, "command failed with exit code {code}"),
            FilterError::Format {
                exit_code: Some(code),
                diagnostic,
            } => write!(f, "command failed with exit code {code}: {diagnostic}"),
            FilterError::Format {
                exit_code: None, ..
            } => write!(f, "command was terminated by a signal"),
            FilterError::OutputUnreadable(e) => write!(f, "could not read command output: {e}"),
            FilterError::Cancelled => write!(f, "cancelled"),
            FilterError::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::OutputUnreadable(e) => Some(e),
            FilterError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl FilterError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        FilterError::Io {
            context: context.into(),
            source,
        }
    }

    /// Exit code carried by a [`FilterError::Format`]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            FilterError::Format { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Run `request` to completion. Blocks until the command exits.
pub fn run_filter(request: &FilterRequest<'_>) -> Result<FilterOutput, FilterError> {
    if let FilterCommand::Shell(fragment) = &request.command {
        if fragment.trim().is_empty() {
            return Err(FilterError::Cancelled);
        }
    }

    let range = trim::find_range(request.text, request.trim);
    tracing::debug!(
        "Filter {:?}: offset_begin={}, offset_end={}, strlen={}",
        request.trim,
        range.begin,
        range.end,
        request.text.len()
    );

    let dir = request
        .scratch_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let mut scratch = ScratchFiles::create(&dir, &request.suffix)
        .map_err(|e| FilterError::io(format!("Failed to create scratch files in {dir:?}"), e))?;
    scratch
        .write_input(range.apply(request.text).as_bytes())
        .map_err(|e| FilterError::io("Failed to write filter input", e))?;

    let result = run_command(&request.command, &scratch);
    scratch.close();

    result.map(|text| FilterOutput { text, range })
}

fn run_command(command: &FilterCommand, scratch: &ScratchFiles) -> Result<String, FilterError> {
    let (status, stderr) = execute(command, scratch)?;
    classify(command, status, &stderr, scratch)
}

/// Spawn the command wired to the scratch files and wait for it.
fn execute(
    command: &FilterCommand,
    scratch: &ScratchFiles,
) -> Result<(ExitStatus, Vec<u8>), FilterError> {
    let mut cmd = match command {
        FilterCommand::Program { argv, .. } => {
            let (program, args) = argv.split_first().ok_or_else(|| {
                FilterError::io(
                    "Empty formatter command",
                    io::Error::new(io::ErrorKind::InvalidInput, "no program given"),
                )
            })?;
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
        FilterCommand::Shell(fragment) => {
            tracing::warn!(
                "Running user-supplied shell command with the editor's privileges: {}",
                fragment.trim()
            );
            let shell = detect_shell();
            let mut cmd = Command::new(&shell);
            cmd.args([shell_command_flag(&shell), fragment.as_str()]);
            cmd
        }
    };

    let stdin = scratch
        .stdin()
        .map_err(|e| FilterError::io("Failed to open filter input", e))?;
    let stdout = scratch
        .stdout()
        .map_err(|e| FilterError::io("Failed to open filter output", e))?;

    tracing::debug!("Running filter command: {}", command.display());
    let output = cmd
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(output) => Ok((output.status, output.stderr)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match command {
            FilterCommand::Program { argv, package } => Err(FilterError::ToolMissing {
                tool: argv.first().cloned().unwrap_or_default(),
                package: package.clone(),
            }),
            FilterCommand::Shell(_) => Err(FilterError::io("Failed to spawn shell", e)),
        },
        Err(e) => Err(FilterError::io(
            format!("Failed to run {}", command.display()),
            e,
        )),
    }
}

/// Map the exit status to output text or a typed failure.
fn classify(
    command: &FilterCommand,
    status: ExitStatus,
    stderr: &[u8],
    files: &ScratchFiles,
) -> Result<String, FilterError> {
    if status.success() {
        let bytes = files.read_output().map_err(FilterError::OutputUnreadable)?;
        return String::from_utf8(bytes).map_err(|e| {
            FilterError::OutputUnreadable(io::Error::new(io::ErrorKind::InvalidData, e))
        });
    }

    let exit_code = status.code();
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    tracing::debug!(
        "Filter command failed: exit_code={:?}, stderr={:?}",
        exit_code,
        stderr
    );

    match command {
        FilterCommand::Program { argv, package } if exit_code == Some(EXIT_COMMAND_NOT_FOUND) => {
            Err(FilterError::ToolMissing {
                tool: argv.first().cloned().unwrap_or_default(),
                package: package.clone(),
            })
        }
        FilterCommand::Program { .. } => Err(FilterError::Format {
            exit_code,
            diagnostic: stderr,
        }),
        FilterCommand::Shell(_) => {
            // Commands like grep report through stdout as well
            let stdout = files
                .read_output()
                .map(|b| String::from_utf8_lossy(&b).trim().to_string())
                .unwrap_or_default();
            let diagnostic = [stdout, stderr]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            Err(FilterError::Format {
                exit_code,
                diagnostic,
            })
        }
    }
}

/// Detect the shell to use for executing commands.
fn detect_shell() -> String {
    // Try SHELL environment variable first
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.is_empty() {
            return shell;
        }
    }

    // Fall back to common shells
    #[cfg(unix)]
    {
        if std::path::Path::new("/bin/sh").exists() {
            return "/bin/sh".to_string();
        }
    }

    #[cfg(windows)]
    {
        if let Ok(comspec) = std::env::var("COMSPEC") {
            return comspec;
        }
        return "cmd.exe".to_string();
    }

    // Last resort
    "sh".to_string()
}

/// Flag that makes `shell` run the following argument as a command line
fn shell_command_flag(shell: &str) -> &'static str {
    let name = std::path::Path::new(shell)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase());
    match name.as_deref() {
        Some("cmd") => "/C",
        _ => "-c",
    }
}
