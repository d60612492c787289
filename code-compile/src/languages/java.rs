use std::path::PathBuf;

use crate::{
    commands::CommandTemplateSet,
    languages::{contains_any, tools_with_runtime},
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

const MAIN_CLASS: &str = "Main";

const RUNTIME: &str = "java";

const COMPILE_ERROR_MARKERS: &[&str] = &[
    "Could not find or load main class",
    "UnsupportedClassVersionError",
];

/// Java programs with a public `Main` class.
///
/// `javac` insists the file is named after its public class, so each
/// provider gets a private subdirectory holding `Main.java`; the same
/// directory receives the class files and serves as the classpath.
pub struct JavaBinding;

impl JavaBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageBinding for JavaBinding {
    fn name(&self) -> &str {
        Language::Java.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Nested {
            source_name: "Main.java",
        }
    }

    fn compile_mode(&self) -> CompileMode {
        CompileMode::Build
    }

    fn required_tools(&self, templates: &CommandTemplateSet) -> Vec<String> {
        tools_with_runtime(templates, self.template_key(), RUNTIME)
    }

    fn build_artifact(&self, files: &WorkArea) -> PathBuf {
        files.program_path().join(format!("{}.class", MAIN_CLASS))
    }

    fn run_args(&self, _templates: &CommandTemplateSet, files: &WorkArea) -> Result<Vec<String>> {
        Ok(vec![
            RUNTIME.to_string(),
            "-Dfile.encoding=UTF-8".to_string(),
            "-cp".to_string(),
            files.program_path().to_string_lossy().into_owned(),
            MAIN_CLASS.to_string(),
        ])
    }

    /// A missing `Main` class only shows up when the JVM starts
    fn is_compile_error(&self, stderr: &str) -> bool {
        contains_any(stderr, COMPILE_ERROR_MARKERS)
    }
}
