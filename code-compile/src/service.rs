use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::{
    error::Error, factory::ProviderFactory, provider::CompileProvider, types::CompileOutcome,
    Result,
};

/// One submission to compile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Language identifier, e.g. `g++`
    pub language: String,
    /// Submitted source code
    pub code: String,
    /// Existing scratch directory, may be shared between requests
    pub work_dir: PathBuf,
}

/// A compiled (or failed) submission. The caller owns the provider and
/// must `clean` it once the program has been run.
#[derive(Debug)]
pub struct CompileJob {
    pub outcome: CompileOutcome,
    pub provider: CompileProvider,
}

/// Runs whole compile lifecycles with a cap on how many toolchains run at once
#[derive(Clone)]
pub struct CompileService {
    factory: Arc<ProviderFactory>,
    semaphore: Arc<Semaphore>,
}

impl CompileService {
    pub fn new(factory: ProviderFactory, max_concurrent_compiles: usize) -> Self {
        Self {
            factory: Arc::new(factory),
            semaphore: Arc::new(Semaphore::new(max_concurrent_compiles)),
        }
    }

    pub fn factory(&self) -> &ProviderFactory {
        &self.factory
    }

    pub async fn compile(&self, request: CompileRequest) -> Result<CompileJob> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::System(format!("Failed to acquire compile permit: {}", e)))?;

        debug!("Starting compile for language: {}", request.language);

        let mut provider = self.factory.create(&request.language)?;
        provider.init(&request.code, &request.work_dir).await?;

        let outcome = match provider.compile().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Compile of {} failed: {}", request.language, e);
                provider.clean().await;
                return Err(e);
            }
        };

        if outcome.success {
            info!("{} compile finished: {}", provider.name(), outcome.status);
        } else {
            warn!("{} compile rejected: {}", provider.name(), outcome.status);
        }

        Ok(CompileJob { outcome, provider })
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
