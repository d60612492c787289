use crate::{
    commands::CommandTemplateSet,
    languages::native_run_args,
    provider::LanguageBinding,
    types::{CompileMode, Language, SourceLayout},
    workspace::WorkArea,
    Result,
};

/// Single-file Go programs built with `go build`
pub struct GoBinding;

impl GoBinding {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageBinding for GoBinding {
    fn name(&self) -> &str {
        Language::Go.as_str()
    }

    fn layout(&self) -> SourceLayout {
        SourceLayout::Flat {
            source_ext: ".go",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{languages::skip_if_not_available, provider::CompileProvider, shell::Shell};
    use std::{sync::Arc, time::Duration};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_go_compilation() -> Result<()> {
        if skip_if_not_available(&["go"]) {
            return Ok(());
        }

        let dir = tempdir()?;
        // A cold Go build cache can take a while
        let mut provider = CompileProvider::new(
            Box::new(GoBinding::new()),
            Arc::new(CommandTemplateSet::default()),
            Shell::new(Duration::from_secs(120)),
        );
        provider
            .init(
                "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n",
                dir.path(),
            )
            .await?;

        let outcome = provider.compile().await?;
        assert!(outcome.success, "{}", outcome.diagnostic);
        assert_eq!(
            provider.run_args()?,
            vec![provider
                .work_area()
                .unwrap()
                .program_path()
                .to_string_lossy()
                .into_owned()]
        );
        provider.clean().await;
        Ok(())
    }
}
