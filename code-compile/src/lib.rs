//! # Code Compile
//!
//! The compile stage of a judging service. Submitted source is written into a
//! scratch directory under a unique name, the language's toolchain is run with
//! a bounded timeout, and the result is either an argument vector that starts
//! the program or a diagnostic for the submitter.
//!
//! Every language sits behind the same [`CompileProvider`] lifecycle; the
//! language specific parts are a [`LanguageBinding`].

mod commands;
mod error;
mod factory;
mod languages;
mod provider;
mod service;
mod shell;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use commands::{
    CommandRegistry, CommandTemplate, CommandTemplateSet, DocumentFormat, TemplateArgs,
};
pub use error::Error;
pub use factory::ProviderFactory;
pub use languages::{
    GnuBinding, GoBinding, JavaBinding, NodeJsBinding, PhpBinding, PythonBinding, RubyBinding,
    RustBinding,
};
pub use provider::{CompileProvider, LanguageBinding};
pub use service::{CompileJob, CompileRequest, CompileService};
pub use shell::{Shell, ShellOutput, ShellStatus, DEFAULT_COMPILE_TIMEOUT};
pub use types::{CompileMode, CompileOutcome, CompileStatus, Language, SourceLayout};
pub use workspace::{check_work_directory, WorkArea};

/// Result type for compile operations
pub type Result<T> = std::result::Result<T, Error>;
