use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::{
    commands::CommandRegistry,
    error::Error,
    languages,
    provider::{CompileProvider, LanguageBinding},
    shell::Shell,
    types::Language,
    Result,
};

type BindingConstructor = Arc<dyn Fn() -> Box<dyn LanguageBinding> + Send + Sync>;

/// Maps language identifiers to fresh compile providers
#[derive(Clone)]
pub struct ProviderFactory {
    registry: Arc<CommandRegistry>,
    shell: Shell,
    custom: HashMap<String, BindingConstructor>,
}

impl ProviderFactory {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            shell: Shell::default(),
            custom: HashMap::new(),
        }
    }

    /// Toolchain timeout for providers created from now on
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.shell = Shell::new(timeout);
        self
    }

    /// Adds a binding, replacing any built-in of the same name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn LanguageBinding> + Send + Sync + 'static,
    {
        self.custom.insert(name.into(), Arc::new(constructor));
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// New, uninitialized provider for `language`.
    ///
    /// Fails with [`Error::UnsupportedLanguage`] for unknown identifiers.
    pub fn create(&self, language: &str) -> Result<CompileProvider> {
        let binding = self.binding(language)?;
        debug!("Creating {} provider", binding.name());
        Ok(CompileProvider::new(
            binding,
            self.registry.snapshot(),
            self.shell.clone(),
        ))
    }

    fn binding(&self, language: &str) -> Result<Box<dyn LanguageBinding>> {
        if let Some(constructor) = self.custom.get(language) {
            return Ok(constructor());
        }
        let language: Language = language
            .parse()
            .map_err(|_| Error::UnsupportedLanguage(language.to_string()))?;
        Ok(languages::builtin(language))
    }

    /// Identifiers this factory accepts, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut names: Vec<String> = Language::ALL
            .iter()
            .map(|language| language.as_str().to_string())
            .chain(self.custom.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Toolchain executables for `language` that are not on `PATH`
    pub fn missing_tools(&self, language: &str) -> Result<Vec<String>> {
        Ok(self.create(language)?.missing_tools())
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new(Arc::new(CommandRegistry::default()))
    }
}
