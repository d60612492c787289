use super::{test_language_build, test_language_rejects};
use crate::{
    tests::{fixtures::code_samples::hello, utils::default_factory},
    Language, Result,
};
use tempfile::tempdir;

#[tokio::test]
async fn test_nodejs_check() -> Result<()> {
    test_language_build(Language::NodeJs).await
}

#[tokio::test]
async fn test_php_check() -> Result<()> {
    test_language_build(Language::Php).await
}

#[tokio::test]
async fn test_ruby_check() -> Result<()> {
    test_language_build(Language::Ruby).await
}

#[tokio::test]
async fn test_nodejs_rejects_broken_source() -> Result<()> {
    test_language_rejects(Language::NodeJs, "function (\n").await
}

#[tokio::test]
async fn test_php_rejects_broken_source() -> Result<()> {
    test_language_rejects(Language::Php, "<?php echo 'x' ?>\n<?php if ( ?>").await
}

#[tokio::test]
async fn test_ruby_rejects_broken_source() -> Result<()> {
    test_language_rejects(Language::Ruby, "def f(\n").await
}

#[tokio::test]
async fn test_syntax_checked_languages_are_real_time() -> Result<()> {
    let factory = default_factory();
    let dir = tempdir()?;
    for (language, interpreter) in [
        (Language::NodeJs, "node"),
        (Language::Php, "php"),
        (Language::Ruby, "ruby"),
    ] {
        let mut provider = factory.create(language.as_str())?;
        assert!(provider.is_real_time());
        provider.init(hello(language), dir.path()).await?;

        let source = provider.work_area().unwrap().source_path().to_path_buf();
        let args = provider.run_args()?;
        assert_eq!(args[0], interpreter);
        assert_eq!(args.last(), Some(&source.to_string_lossy().into_owned()));
        provider.clean().await;
    }
    Ok(())
}
