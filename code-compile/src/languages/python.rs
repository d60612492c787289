use crate::{
    commands::CommandTemplateSet,
    languages::{contains_any, interpreter_run_args},
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

const COMPILE_ERROR_MARKERS: &[&str] = &["SyntaxError", "IndentationError", "ImportError"];

/// Python 2 and 3. Nothing is compiled ahead of time; the registered
/// template is the interpreter command line.
pub struct PythonBinding {
    language: Language,
}

impl PythonBinding {
    pub fn python2() -> Self {
        Self {
            language: Language::Python2,
        }
    }

    pub fn python3() -> Self {
        Self {
            language: Language::Python3,
        }
    }
}

impl LanguageBinding for PythonBinding {
    fn name(&self) -> &str {
        self.language.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: ".py",
            program_ext: "",
        }
    }

    fn compile_mode(&self) -> CompileMode {
        CompileMode::Interpreted
    }

    fn run_args(&self, templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>> {
        interpreter_run_args(templates, self.template_key(), files)
    }

    fn is_compile_error(&self, stderr: &str) -> bool {
        contains_any(stderr, COMPILE_ERROR_MARKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_markers() {
        let binding = PythonBinding::python3();
        assert!(binding.is_compile_error("IndentationError: unexpected indent"));
        assert!(binding.is_compile_error("ImportError: No module named foo"));
        assert!(!binding.is_compile_error("ZeroDivisionError: division by zero"));
        assert!(!binding.is_compile_error("syntaxerror"));
    }

    #[test]
    fn test_python_names() {
        assert_eq!(PythonBinding::python2().name(), "python2");
        assert_eq!(PythonBinding::python3().name(), "python3");
    }
}
