//! Language-specific compile provider bindings

mod gnu;
mod go;
mod java;
mod javascript;
mod php;
mod python;
mod ruby;
mod rust;

pub use gnu::GnuBinding;
pub use go::GoBinding;
pub use java::JavaBinding;
pub use javascript::NodeJsBinding;
pub use php::PhpBinding;
pub use python::PythonBinding;
pub use ruby::RubyBinding;
pub use rust::RustBinding;

use crate::{
    commands::{CommandTemplateSet, TemplateArgs},
    provider::LanguageBinding,
    types::Language,
    workspace::WorkArea,
    Result,
};

/// Fresh binding for a built-in language
pub fn builtin(language: Language) -> Box<dyn LanguageBinding> {
    match language {
        Language::GnuC => Box::new(GnuBinding::c()),
        Language::GnuCpp => Box::new(GnuBinding::cpp()),
        Language::Java => Box::new(JavaBinding::new()),
        Language::Go => Box::new(GoBinding::new()),
        Language::NodeJs => Box::new(NodeJsBinding::new()),
        Language::Php => Box::new(PhpBinding::new()),
        Language::Ruby => Box::new(RubyBinding::new()),
        Language::Python2 => Box::new(PythonBinding::python2()),
        Language::Python3 => Box::new(PythonBinding::python3()),
        Language::Rust => Box::new(RustBinding::new()),
    }
}

/// Run args of a natively compiled program: just the artifact
pub(crate) fn native_run_args(files: &WorkArea) -> Vec<String> {
    vec![files.program_path().to_string_lossy().into_owned()]
}

/// Renders the binding's template over the source file to get an interpreter command line
pub(crate) fn interpreter_run_args(
    templates: &CommandTemplateSet,
    key: &str,
    files: &WorkArea,
) -> Result<Vec<String>> {
    let template = templates.template(key)?;
    Ok(template.render(&TemplateArgs {
        source: files.source_path(),
        program: files.program_path(),
        dir: files.dir(),
    }))
}

/// The template's executable followed by the program runtime, without duplicates
pub(crate) fn tools_with_runtime(
    templates: &CommandTemplateSet,
    key: &str,
    runtime: &str,
) -> Vec<String> {
    let mut tools: Vec<String> = templates
        .get(key)
        .map(|template| vec![template.program_name().to_string()])
        .unwrap_or_default();
    if !tools.iter().any(|tool| tool == runtime) {
        tools.push(runtime.to_string());
    }
    tools
}

pub(crate) fn contains_any(stderr: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| stderr.contains(marker))
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which::which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
