use super::{test_language_build, test_language_rejects};
use crate::{Language, Result};

#[tokio::test]
async fn test_gcc_build() -> Result<()> {
    test_language_build(Language::GnuC).await
}

#[tokio::test]
async fn test_gpp_build() -> Result<()> {
    test_language_build(Language::GnuCpp).await
}

#[tokio::test]
async fn test_java_build() -> Result<()> {
    test_language_build(Language::Java).await
}

#[tokio::test]
async fn test_go_build() -> Result<()> {
    test_language_build(Language::Go).await
}

#[tokio::test]
async fn test_rust_build() -> Result<()> {
    test_language_build(Language::Rust).await
}

#[tokio::test]
async fn test_gcc_rejects_broken_source() -> Result<()> {
    test_language_rejects(Language::GnuC, "int main(void) { return }\n").await
}

#[tokio::test]
async fn test_java_rejects_broken_source() -> Result<()> {
    test_language_rejects(
        Language::Java,
        "public class Main { public static void main(String[] a) { int x = } }",
    )
    .await
}

#[tokio::test]
async fn test_rust_rejects_broken_source() -> Result<()> {
    test_language_rejects(Language::Rust, "fn main() { let x: u8 = \"no\"; }\n").await
}
