use crate::{
    commands::CommandTemplateSet,
    languages::{contains_any, tools_with_runtime},
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

const RUNTIME: &str = "ruby";

const COMPILE_ERROR_MARKERS: &[&str] = &["SyntaxError", "syntax error", "LoadError"];

/// Ruby. `compile` runs `ruby -c`, the source is run directly.
pub struct RubyBinding;

impl RubyBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RubyBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageBinding for RubyBinding {
    fn name(&self) -> &str {
        Language::Ruby.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: ".rb",
            program_ext: "",
        }
    }

    fn compile_mode(&self) -> CompileMode {
        CompileMode::SyntaxCheck
    }

    fn required_tools(&self, templates: &CommandTemplateSet) -> Vec<String> {
        tools_with_runtime(templates, self.template_key(), RUNTIME)
    }

    fn run_args(&self, _templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>> {
        Ok(vec![
            RUNTIME.to_string(),
            files.source_path().to_string_lossy().into_owned(),
        ])
    }

    fn is_compile_error(&self, stderr: &str) -> bool {
        contains_any(stderr, COMPILE_ERROR_MARKERS)
    }
}
