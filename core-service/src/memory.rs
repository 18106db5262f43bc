use crate::error::Result;
use crate::service::AdminService;
use crate::CoreDependencies;
use bridge_memory::MemoryClient;
use core_runtime::config::CoreConfig;
use std::sync::Arc;

impl From<Arc<MemoryClient>> for CoreDependencies {
    fn from(client: Arc<MemoryClient>) -> Self {
        CoreDependencies::from_client(client)
    }
}

/// Convenience bootstrapper running the core against the in-process client.
///
/// ```
/// # fn example() -> core_service::Result<()> {
/// use bridge_memory::{MemoryBackend, MemoryClient};
/// use core_runtime::config::CoreConfig;
/// use core_service::bootstrap_memory;
/// use std::sync::Arc;
///
/// let client = Arc::new(MemoryClient::new(Arc::new(MemoryBackend::new())));
/// let config = CoreConfig::builder().data_dir("./data").build()?;
/// let core = bootstrap_memory(config, client)?;
/// assert!(!core.orchestrator().is_syncing());
/// # Ok(())
/// # }
/// ```
pub fn bootstrap_memory(config: CoreConfig, client: Arc<MemoryClient>) -> Result<AdminService> {
    AdminService::new(config, CoreDependencies::from(client))
}
