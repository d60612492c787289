use crate::{
    commands::CommandTemplateSet,
    languages::native_run_args,
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

/// Single-file Rust programs built with `rustc`
pub struct RustBinding;

impl RustBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageBinding for RustBinding {
    fn name(&self) -> &str {
        Language::Rust.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: ".rs",
            program_ext: "",
        }
    }

    fn compile_mode(&self) -> CompileMode {
        CompileMode::Build
    }

    fn run_args(&self, _templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>> {
        Ok(native_run_args(files))
    }

    fn is_compile_error(&self, _stderr: &str) -> bool {
        false
    }
}
