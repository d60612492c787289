use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use which::which;

use crate::{
    commands::{CommandTemplateSet, TemplateArgs},
    error::Error,
    shell::{Shell, ShellOutput, ShellStatus},
    types::{CompileMode, CompileOutcome, SourceLayout},
    workspace::{check_work_directory, WorkArea},
    Result,
};

/// Longest diagnostic handed back to a submitter
const MAX_DIAGNOSTIC_BYTES: usize = 64 * 1024;

/// The language specific fragments of a compile provider
pub trait LanguageBinding: Send + Sync {
    /// Registered identifier, e.g. `python3`
    fn name(&self) -> &str;

    fn layout(&self) -> SourceLayout;

    fn compile_mode(&self) -> CompileMode;

    /// Key of this binding's entry in the command template set
    fn template_key(&self) -> &str {
        self.name()
    }

    /// Executables that must be on `PATH`
    fn required_tools(&self, templates: &CommandTemplateSet) -> Vec<String> {
        templates
            .get(self.template_key())
            .map(|template| vec![template.program_name().to_string()])
            .unwrap_or_default()
    }

    /// File whose presence proves a `Build` compile produced something
    fn build_artifact(&self, files: &WorkArea) -> PathBuf {
        files.program_path().to_path_buf()
    }

    /// Argument vector that starts the program described by `files`
    fn run_args(&self, templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>>;

    /// Best-effort guess whether run-time stderr is really a compile error.
    ///
    /// This only matches known marker strings, which vary across toolchain
    /// versions and locales. Treat a `true` as advisory: the run stage's own
    /// outcome stays authoritative.
    fn is_compile_error(&self, stderr: &str) -> bool;
}

#[derive(Debug)]
enum ProviderState {
    Created,
    Ready(WorkArea),
    Cleaned,
}

/// One compile attempt for one submission.
///
/// Lifecycle: `init` → `compile` → `run_args` (any number of times) →
/// `clean`. Instances are single use; after `clean` every operation fails
/// with [`Error::Misuse`]. Dropping a ready provider removes its files.
pub struct CompileProvider {
    binding: Box<dyn LanguageBinding>,
    templates: Arc<CommandTemplateSet>,
    shell: Shell,
    state: ProviderState,
}

impl CompileProvider {
    pub fn new(
        binding: Box<dyn LanguageBinding>,
        templates: Arc<CommandTemplateSet>,
        shell: Shell,
    ) -> Self {
        Self {
            binding,
            templates,
            shell,
            state: ProviderState::Created,
        }
    }

    pub fn name(&self) -> &str {
        self.binding.name()
    }

    pub fn compile_mode(&self) -> CompileMode {
        self.binding.compile_mode()
    }

    /// True when there is no separate compile artifact
    pub fn is_real_time(&self) -> bool {
        self.binding.compile_mode() != CompileMode::Build
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ProviderState::Ready(_))
    }

    pub fn work_area(&self) -> Option<&WorkArea> {
        match &self.state {
            ProviderState::Ready(files) => Some(files),
            _ => None,
        }
    }

    /// Validates `work_dir`, writes `source` under a unique name and marks
    /// the provider ready.
    pub async fn init(&mut self, source: &str, work_dir: impl AsRef<Path>) -> Result<()> {
        match self.state {
            ProviderState::Created => {}
            ProviderState::Ready(_) => return Err(Error::Misuse("provider already initialized")),
            ProviderState::Cleaned => return Err(Error::Misuse("provider has been cleaned")),
        }

        let work_dir = work_dir.as_ref();
        check_work_directory(work_dir).await?;
        // Toolchains run inside the work dir, so every generated path is absolute
        let work_dir = tokio::fs::canonicalize(work_dir).await?;
        let files = WorkArea::create(&work_dir, self.binding.layout(), source).await?;

        info!(
            "Initialized {} provider, source {}",
            self.name(),
            files.source_name()
        );
        self.state = ProviderState::Ready(files);
        Ok(())
    }

    fn files(&self) -> Result<&WorkArea> {
        match &self.state {
            ProviderState::Ready(files) => Ok(files),
            ProviderState::Created => Err(Error::Misuse("provider is not initialized")),
            ProviderState::Cleaned => Err(Error::Misuse("provider has been cleaned")),
        }
    }

    /// Runs the toolchain. A failing or timed out toolchain is reported in
    /// the returned outcome; `Err` is reserved for misuse and configuration
    /// problems.
    pub async fn compile(&self) -> Result<CompileOutcome> {
        let files = self.files()?;
        if self.binding.compile_mode() == CompileMode::Interpreted {
            return Ok(CompileOutcome::skipped());
        }

        let template = self.templates.template(self.binding.template_key())?;
        let argv = template.render(&TemplateArgs {
            source: files.source_path(),
            program: files.program_path(),
            dir: files.dir(),
        });
        let output = self.shell.run(&argv, Some(files.dir())).await?;

        let outcome = self.outcome(files, &argv[0], output).await;
        if outcome.success {
            info!("{} compile succeeded in {:?}", self.name(), outcome.elapsed);
        } else {
            debug!("{} compile failed: {}", self.name(), outcome.status);
        }
        Ok(outcome)
    }

    async fn outcome(&self, files: &WorkArea, program: &str, output: ShellOutput) -> CompileOutcome {
        let elapsed = output.elapsed;
        match output.status {
            ShellStatus::Exited(0) => {
                let built = self.binding.compile_mode() != CompileMode::Build
                    || tokio::fs::try_exists(self.binding.build_artifact(files))
                        .await
                        .unwrap_or(false);
                if !built {
                    warn!("{} exited successfully without a program", program);
                    let mut diagnostic = self.sanitize(&output.stderr, files.dir());
                    push_line(&mut diagnostic, "compiler produced no program");
                    return CompileOutcome::failed(diagnostic, elapsed);
                }
                CompileOutcome::succeeded(elapsed)
            }
            ShellStatus::TimedOut => {
                let mut diagnostic = self.sanitize(&output.stderr, files.dir());
                push_line(
                    &mut diagnostic,
                    &format!(
                        "compilation timed out after {} seconds",
                        self.shell.timeout().as_secs()
                    ),
                );
                CompileOutcome::timed_out(diagnostic, elapsed)
            }
            ShellStatus::SpawnFailed(_) => CompileOutcome::failed(
                format!("compiler {:?} could not be started", program),
                elapsed,
            ),
            ShellStatus::Exited(_) | ShellStatus::Signaled(_) => {
                CompileOutcome::failed(self.sanitize(&output.stderr, files.dir()), elapsed)
            }
        }
    }

    pub fn run_args(&self) -> Result<Vec<String>> {
        let files = self.files()?;
        self.binding.run_args(&self.templates, files)
    }

    /// See [`LanguageBinding::is_compile_error`]; advisory only
    pub fn is_compile_error(&self, stderr: &str) -> bool {
        self.binding.is_compile_error(stderr)
    }

    /// Submitter-facing text for run-time stderr the classifier flags as a
    /// compile error, with work directory paths stripped.
    pub fn diagnose(&self, stderr: &str) -> Option<String> {
        if !self.is_compile_error(stderr) {
            return None;
        }
        Some(match &self.state {
            ProviderState::Ready(files) => self.sanitize(stderr, files.dir()),
            _ => truncate(stderr.to_string()),
        })
    }

    /// Required executables that are not on `PATH`
    pub fn missing_tools(&self) -> Vec<String> {
        self.binding
            .required_tools(&self.templates)
            .into_iter()
            .filter(|tool| which(tool).is_err())
            .collect()
    }

    /// Removes the generated files. Never fails and may be called repeatedly.
    pub async fn clean(&mut self) {
        if let ProviderState::Ready(files) =
            std::mem::replace(&mut self.state, ProviderState::Cleaned)
        {
            files.clean().await;
            debug!("Cleaned {} provider", self.name());
        }
    }

    /// Gives up ownership of the generated files without removing them
    pub fn detach(mut self) -> Option<WorkArea> {
        match std::mem::replace(&mut self.state, ProviderState::Cleaned) {
            ProviderState::Ready(files) => Some(files),
            _ => None,
        }
    }

    fn sanitize(&self, text: &str, dir: &Path) -> String {
        truncate(strip_dir(text, dir))
    }
}

/// Falls back to blocking removal. Inside a tokio runtime this briefly
/// blocks the worker thread, so async callers should `clean` instead.
impl Drop for CompileProvider {
    fn drop(&mut self) {
        if let ProviderState::Ready(files) = &self.state {
            debug!("Dropping uncleaned {} provider", self.binding.name());
            files.clean_blocking();
        }
    }
}

impl std::fmt::Debug for CompileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileProvider")
            .field("name", &self.binding.name())
            .field("state", &self.state)
            .finish()
    }
}

fn strip_dir(text: &str, dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        return text.to_string();
    }

    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(dir) {
        let (before, found) = rest.split_at(pos);
        let after = &found[dir.len()..];
        let starts_path = !before.chars().next_back().is_some_and(is_path_char);

        if starts_path {
            if let Some(tail) = after.strip_prefix('/') {
                stripped.push_str(before);
                rest = tail;
                continue;
            }
            if after.chars().next().map_or(true, ends_path) {
                stripped.push_str(before);
                stripped.push('.');
                rest = after;
                continue;
            }
        }

        // Not a whole path component, keep the first character and move on
        let step = pos + found.chars().next().map_or(1, char::len_utf8);
        stripped.push_str(&rest[..step]);
        rest = &rest[step..];
    }
    stripped.push_str(rest);
    stripped
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '~' | '+')
}

fn ends_path(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '\'' | '"')
}

fn truncate(mut text: String) -> String {
    if text.len() <= MAX_DIAGNOSTIC_BYTES {
        return text;
    }
    let mut cut = MAX_DIAGNOSTIC_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    push_line(&mut text, "[truncated]");
    text
}

fn push_line(text: &mut String, line: &str) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(line);
}
