//! Toolchain command templates.
//!
//! A template is a whitespace separated command line with `{source}`,
//! `{program}` and `{dir}` placeholders. Templates are tokenized before
//! substitution, so a path containing spaces stays one argument.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

use crate::{error::Error, types::Language, Result};

pub const SOURCE_PLACEHOLDER: &str = "{source}";
pub const PROGRAM_PLACEHOLDER: &str = "{program}";
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateArgs<'a> {
    pub source: &'a Path,
    pub program: &'a Path,
    pub dir: &'a Path,
}

/// One validated command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    /// Validates that the template names an executable and at least one argument
    pub fn parse(raw: &str) -> Result<Self> {
        let tokens = raw.split_whitespace().count();
        if tokens < 2 {
            return Err(Error::Configuration(format!(
                "command template {:?} needs an executable and at least one argument",
                raw
            )));
        }
        Ok(Self(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Executable named by the template
    pub fn program_name(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or_default()
    }

    pub fn render(&self, args: &TemplateArgs<'_>) -> Vec<String> {
        let source = args.source.to_string_lossy();
        let program = args.program.to_string_lossy();
        let dir = args.dir.to_string_lossy();

        self.0
            .split_whitespace()
            .map(|token| {
                token
                    .replace(SOURCE_PLACEHOLDER, &source)
                    .replace(PROGRAM_PLACEHOLDER, &program)
                    .replace(DIR_PLACEHOLDER, &dir)
            })
            .collect()
    }
}

/// Serialization format of a template override document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML, everything else is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Language id to command template mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplateSet {
    templates: HashMap<String, CommandTemplate>,
}

impl Default for CommandTemplateSet {
    fn default() -> Self {
        let templates = Language::ALL
            .iter()
            .map(|language| {
                (
                    language.as_str().to_string(),
                    CommandTemplate(language.default_command().to_string()),
                )
            })
            .collect();
        Self { templates }
    }
}

impl CommandTemplateSet {
    /// Defaults, overridden by the document at `path` when it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut set = Self::default();
        let Some(path) = path else {
            return Ok(set);
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Command template file {} not found, using defaults",
                    path.display()
                );
                return Ok(set);
            }
            Err(e) => {
                return Err(Error::Configuration(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        set.apply_document(&content, DocumentFormat::from_path(path))?;
        debug!("Loaded command templates from {}", path.display());
        Ok(set)
    }

    /// Overlays every key of `content` onto this set. Keys for unknown
    /// languages are kept for custom bindings. Nothing changes on error.
    pub fn apply_document(&mut self, content: &str, format: DocumentFormat) -> Result<()> {
        let document: BTreeMap<String, String> = match format {
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::Configuration(format!("malformed JSON document: {}", e)))?,
            DocumentFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::Configuration(format!("malformed TOML document: {}", e)))?,
        };

        let parsed = document
            .into_iter()
            .map(|(key, raw)| {
                CommandTemplate::parse(&raw)
                    .map(|template| (key.clone(), template))
                    .map_err(|e| Error::Configuration(format!("key {:?}: {}", key, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.templates.extend(parsed);
        Ok(())
    }

    pub fn with_template(mut self, key: impl Into<String>, raw: &str) -> Result<Self> {
        self.templates.insert(key.into(), CommandTemplate::parse(raw)?);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&CommandTemplate> {
        self.templates.get(key)
    }

    /// Template for `key`; a missing key is a configuration error
    pub fn template(&self, key: &str) -> Result<&CommandTemplate> {
        self.get(key).ok_or_else(|| {
            Error::Configuration(format!("no command template registered for {:?}", key))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

/// Process-wide holder of the current template set.
///
/// Providers take an immutable snapshot at construction; `reload` swaps the
/// snapshot for later providers and never touches ones already handed out.
#[derive(Debug)]
pub struct CommandRegistry {
    path: Option<PathBuf>,
    current: RwLock<Arc<CommandTemplateSet>>,
    reload_lock: Mutex<()>,
}

impl CommandRegistry {
    pub fn new(set: CommandTemplateSet) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(set)),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let set = CommandTemplateSet::load(path.as_deref())?;
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(set)),
            reload_lock: Mutex::new(()),
        })
    }

    pub fn snapshot(&self) -> Arc<CommandTemplateSet> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads the configured document. On error the current set stays.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let set = CommandTemplateSet::load(self.path.as_deref())?;
        self.replace(set);
        info!("Command templates reloaded");
        Ok(())
    }

    pub fn replace(&self, set: CommandTemplateSet) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(set);
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(CommandTemplateSet::default())
    }
}
