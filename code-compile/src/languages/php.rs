use crate::{
    commands::CommandTemplateSet,
    languages::{contains_any, tools_with_runtime},
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

const RUNTIME: &str = "php";

const COMPILE_ERROR_MARKERS: &[&str] = &["Parse error", "syntax error, unexpected"];

/// PHP. `compile` runs the lint template (`php -l`), the source is run directly.
pub struct PhpBinding;

impl PhpBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhpBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageBinding for PhpBinding {
    fn name(&self) -> &str {
        Language::Php.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: ".php",
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
            "-f".to_string(),
            files.source_path().to_string_lossy().into_owned(),
        ])
    }

    fn is_compile_error(&self, stderr: &str) -> bool {
        contains_any(stderr, COMPILE_ERROR_MARKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_php_markers() {
        let binding = PhpBinding::new();
        assert!(binding.is_compile_error(
            "PHP Parse error:  syntax error, unexpected end of file in main.php on line 3"
        ));
        assert!(!binding.is_compile_error("PHP Warning:  Division by zero"));
    }
}
