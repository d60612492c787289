use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Built-in language bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "gcc")]
    GnuC,
    #[serde(rename = "g++")]
    GnuCpp,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "golang")]
    Go,
    #[serde(rename = "nodejs")]
    NodeJs,
    #[serde(rename = "php")]
    Php,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "python2")]
    Python2,
    #[serde(rename = "python3")]
    Python3,
    #[serde(rename = "rust")]
    Rust,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::GnuC,
        Language::GnuCpp,
        Language::Java,
        Language::Go,
        Language::NodeJs,
        Language::Php,
        Language::Ruby,
        Language::Python2,
        Language::Python3,
        Language::Rust,
    ];

    /// Registered identifier, also the key in command template documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::GnuC => "gcc",
            Language::GnuCpp => "g++",
            Language::Java => "java",
            Language::Go => "golang",
            Language::NodeJs => "nodejs",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Python2 => "python2",
            Language::Python3 => "python3",
            Language::Rust => "rust",
        }
    }

    /// Built-in toolchain command template
    pub fn default_command(&self) -> &'static str {
        match self {
            Language::GnuC => "gcc {source} -o {program} -ansi -fno-asm -Wall -std=c11 -lm",
            Language::GnuCpp => "g++ {source} -o {program} -ansi -fno-asm -Wall -lm -std=c++11",
            Language::Java => "javac -encoding utf-8 {source} -d {program}",
            Language::Go => "go build -o {program} {source}",
            Language::NodeJs => "node -c {source}",
            Language::Php => "php -l -f {source}",
            Language::Ruby => "ruby -c {source}",
            Language::Python2 => "python -u {source}",
            Language::Python3 => "python3 -u {source}",
            Language::Rust => "rustc {source} -o {program}",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcc" | "c" => Ok(Language::GnuC),
            "g++" | "cpp" | "c++" => Ok(Language::GnuCpp),
            "java" => Ok(Language::Java),
            "golang" | "go" => Ok(Language::Go),
            "nodejs" | "node" | "javascript" | "js" => Ok(Language::NodeJs),
            "php" => Ok(Language::Php),
            "ruby" | "rb" => Ok(Language::Ruby),
            "python2" | "py2" => Ok(Language::Python2),
            "python3" | "py3" => Ok(Language::Python3),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// How a binding turns source into something runnable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Toolchain produces a program artifact
    Build,
    /// Toolchain only checks syntax; the source itself is run later
    SyntaxCheck,
    /// Nothing to do ahead of time
    Interpreted,
}

/// Where a binding wants its files inside the work directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// `<id>.<source_ext>` and `<id2><program_ext>` directly in the work directory
    Flat {
        source_ext: &'static str,
        program_ext: &'static str,
    },
    /// A private `<id>/` subdirectory holding a fixed source file name;
    /// the subdirectory itself is the program path.
    Nested { source_name: &'static str },
}

/// Outcome status of a compile attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileStatus {
    Success,
    Skipped,
    Failed,
    Timeout,
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompileStatus::Success => "success",
            CompileStatus::Skipped => "skipped",
            CompileStatus::Failed => "compilation_error",
            CompileStatus::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// Result of `compile()`. A failed compile is a normal outcome, not an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutcome {
    pub success: bool,
    /// Toolchain diagnostics, empty on success
    pub diagnostic: String,
    pub status: CompileStatus,
    /// Wall-clock time spent in the toolchain
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl CompileOutcome {
    pub fn succeeded(elapsed: Duration) -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
            status: CompileStatus::Success,
            elapsed,
        }
    }

    /// No toolchain was run
    pub fn skipped() -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
            status: CompileStatus::Skipped,
            elapsed: Duration::ZERO,
        }
    }

    pub fn failed(diagnostic: String, elapsed: Duration) -> Self {
        Self {
            success: false,
            diagnostic,
            status: CompileStatus::Failed,
            elapsed,
        }
    }

    pub fn timed_out(diagnostic: String, elapsed: Duration) -> Self {
        Self {
            success: false,
            diagnostic,
            status: CompileStatus::Timeout,
            elapsed,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
