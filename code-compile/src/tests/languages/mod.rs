use super::{fixtures::code_samples::hello, utils::default_factory};
use crate::{languages::skip_if_not_available, Language, Result};
use tempfile::tempdir;

pub mod native;
pub mod python;
pub mod syntax_check;

// Builds the hello program for `language` and checks the run args point into the work dir
pub(crate) async fn test_language_build(language: Language) -> Result<()> {
    let factory = default_factory();
    let missing = factory.missing_tools(language.as_str())?;
    let missing: Vec<&str> = missing.iter().map(String::as_str).collect();
    if skip_if_not_available(&missing) {
        return Ok(());
    }

    let dir = tempdir()?;
    let mut provider = factory.create(language.as_str())?;
    provider.init(hello(language), dir.path()).await?;

    let outcome = provider.compile().await?;
    assert!(outcome.success, "{}: {}", language, outcome.diagnostic);

    let args = provider.run_args()?;
    assert!(!args.is_empty());
    let dir_str = dir.path().to_string_lossy();
    assert!(
        args.iter().any(|arg| arg.starts_with(dir_str.as_ref())),
        "{:?}",
        args
    );

    provider.clean().await;
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

// Compiles broken source and expects the rejection to hide the work dir
pub(crate) async fn test_language_rejects(language: Language, code: &str) -> Result<()> {
    let factory = default_factory();
    let missing = factory.missing_tools(language.as_str())?;
    let missing: Vec<&str> = missing.iter().map(String::as_str).collect();
    if skip_if_not_available(&missing) {
        return Ok(());
    }

    let dir = tempdir()?;
    let mut provider = factory.create(language.as_str())?;
    provider.init(code, dir.path()).await?;

    let outcome = provider.compile().await?;
    assert!(!outcome.success, "{} accepted broken source", language);
    assert!(!outcome
        .diagnostic
        .contains(dir.path().to_string_lossy().as_ref()));

    provider.clean().await;
    Ok(())
}
