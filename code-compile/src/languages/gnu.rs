use crate::{
    commands::CommandTemplateSet,
    languages::native_run_args,
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

/// C and C++ through the GNU toolchain
pub struct GnuBinding {
    language: Language,
    source_ext: &'static str,
}

impl GnuBinding {
    pub fn c() -> Self {
        Self {
            language: Language::GnuC,
            source_ext: ".c",
        }
    }

    pub fn cpp() -> Self {
        Self {
            language: Language::GnuCpp,
            source_ext: ".cpp",
        }
    }
}

impl LanguageBinding for GnuBinding {
    fn name(&self) -> &str {
        self.language.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: self.source_ext,
            program_ext: "",
        }
    }

    fn compile_mode(&self) -> CompileMode {
        CompileMode::Build
    }

    fn run_args(&self, _templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>> {
        Ok(native_run_args(files))
    }

    // Compile errors are caught by the compiler itself
    fn is_compile_error(&self, _stderr: &str) -> bool {
        false
    }
}
