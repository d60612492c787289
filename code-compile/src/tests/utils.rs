use std::sync::Arc;
use std::time::Duration;

use crate::{CommandRegistry, CommandTemplateSet, ProviderFactory};

pub fn factory_with(templates: CommandTemplateSet) -> ProviderFactory {
    ProviderFactory::new(Arc::new(CommandRegistry::new(templates)))
}

pub fn default_factory() -> ProviderFactory {
    factory_with(CommandTemplateSet::default())
}

pub fn short_timeout() -> Duration {
    Duration::from_secs(1)
}

/// Upper bound on the time a timed out compile may take
pub fn timeout_slack() -> Duration {
    Duration::from_secs(2)
}
