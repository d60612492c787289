use crate::tests::{
    fixtures::{
        code_samples::{PYTHON_BROKEN, PYTHON_HELLO},
        stderr_samples::{PYTHON_MISSING_MODULE, PYTHON_RUNTIME_ERROR, PYTHON_SYNTAX_ERROR},
    },
    utils::default_factory,
};
use crate::{languages::skip_if_not_available, CompileStatus, Result};
use tempfile::tempdir;
use tokio::process::Command;

#[tokio::test]
async fn test_python3_run_args() -> Result<()> {
    let dir = tempdir()?;
    let mut provider = default_factory().create("python3")?;
    provider.init(PYTHON_HELLO, dir.path()).await?;

    let outcome = provider.compile().await?;
    assert!(outcome.success);
    assert_eq!(outcome.status, CompileStatus::Skipped);

    let files = provider.work_area().unwrap().clone();
    assert_eq!(
        files.source_path(),
        dir.path().canonicalize()?.join(files.source_name())
    );
    assert!(files.source_name().ends_with(".py"));
    assert_eq!(std::fs::read_to_string(files.source_path())?, PYTHON_HELLO);
    assert_eq!(
        provider.run_args()?,
        vec![
            "python3".to_string(),
            "-u".to_string(),
            files.source_path().to_string_lossy().into_owned(),
        ]
    );

    provider.clean().await;
    assert!(!files.source_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_python2_run_args() -> Result<()> {
    let dir = tempdir()?;
    let mut provider = default_factory().create("python2")?;
    provider.init("print 'x'", dir.path()).await?;

    let args = provider.run_args()?;
    assert_eq!(args[..2], ["python".to_string(), "-u".to_string()]);
    provider.clean().await;
    Ok(())
}

#[test]
fn test_python_compile_error_classification() -> Result<()> {
    let factory = default_factory();
    for name in ["python2", "python3"] {
        let provider = factory.create(name)?;
        assert!(provider.is_compile_error(PYTHON_SYNTAX_ERROR), "{}", name);
        assert!(provider.is_compile_error(PYTHON_MISSING_MODULE), "{}", name);
        assert!(!provider.is_compile_error(PYTHON_RUNTIME_ERROR), "{}", name);
    }
    Ok(())
}

#[tokio::test]
async fn test_python3_diagnose_real_syntax_error() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }

    let dir = tempdir()?;
    let mut provider = default_factory().create("python3")?;
    provider.init(PYTHON_BROKEN, dir.path()).await?;
    assert!(provider.compile().await?.success);

    let args = provider.run_args()?;
    let output = Command::new(&args[0]).args(&args[1..]).output().await?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostic = provider
        .diagnose(&stderr)
        .expect("syntax error should be classified as a compile error");
    assert!(diagnostic.contains("SyntaxError"));
    assert!(!diagnostic.contains(dir.path().to_string_lossy().as_ref()));
    assert!(diagnostic.contains(provider.work_area().unwrap().source_name()));

    provider.clean().await;
    Ok(())
}
