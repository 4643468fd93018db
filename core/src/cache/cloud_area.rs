//! Cloud area id → display name, cached in front of the inventory backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use hostdir_common::config::DirectoryConfig;
use hostdir_common::inventory::client::InventoryClient;

use super::{CacheLoader, LoadingCache};

/// Placeholder name cached for ids the backend cannot resolve.
///
/// Caching the placeholder instead of leaving the key absent keeps
/// repeated lookups of invalid ids from reaching the backend again before
/// the entry expires.
pub const UNKNOWN_CLOUD_AREA_NAME: &str = "Unknown";

pub type CloudAreaNameCache = LoadingCache<i64, String, CloudAreaNameLoader>;

/// Builds the name cache sized per `config`.
pub fn cloud_area_name_cache(
    inventory: Arc<dyn InventoryClient>,
    config: &DirectoryConfig,
) -> CloudAreaNameCache {
    LoadingCache::new(
        config.cache_capacity,
        config.cache_ttl,
        CloudAreaNameLoader::new(inventory),
    )
}

pub struct CloudAreaNameLoader {
    inventory: Arc<dyn InventoryClient>,
}

impl CloudAreaNameLoader {
    pub fn new(inventory: Arc<dyn InventoryClient>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl CacheLoader<i64, String> for CloudAreaNameLoader {
    async fn load(&self, key: &i64) -> anyhow::Result<String> {
        let area = self.inventory.cloud_area_by_id(*key).await?;
        Ok(area
            .map(|area| area.name)
            .unwrap_or_else(|| UNKNOWN_CLOUD_AREA_NAME.to_string()))
    }

    async fn load_all(&self, keys: &[i64]) -> anyhow::Result<HashMap<i64, String>> {
        // One whole-list call instead of one call per missing id.
        let mut names: HashMap<i64, String> = keys
            .iter()
            .map(|id| (*id, UNKNOWN_CLOUD_AREA_NAME.to_string()))
            .collect();

        let areas = self.inventory.cloud_area_list().await?;
        if areas.is_empty() {
            warn!("Cloud area list came back empty");
            return Ok(names);
        }

        for area in areas {
            names.insert(area.id, area.name);
        }
        Ok(names)
    }
}
