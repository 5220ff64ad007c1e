//! Resolution of the remote user id behind an access token.
//!
//! The webhook filter needs the caller's remote user id. It is looked up once
//! per token via the session-info endpoint and cached in memory, keyed by the
//! token's SHA-256 digest.

use std::collections::HashMap;
use std::sync::Arc;

use cadview_core::hashing::sha256_hex;
use cadview_onshape::OnshapeClient;
use tokio::sync::RwLock;

use crate::error::PipelineError;

/// Upper bound on cached entries; the cache is cleared when it is reached.
const MAX_CACHED_USERS: usize = 10_000;

pub struct UserDirectory {
    client: Arc<dyn OnshapeClient>,
    cache: RwLock<HashMap<String, String>>,
}

impl UserDirectory {
    pub fn new(client: Arc<dyn OnshapeClient>) -> Self {
        Self {
            client,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Remote user id for `access_token`.
    pub async fn user_id(&self, access_token: &str) -> Result<String, PipelineError> {
        let key = sha256_hex(access_token.as_bytes());

        if let Some(user_id) = self.cache.read().await.get(&key) {
            return Ok(user_id.clone());
        }

        let info = self.client.session_info(access_token).await?;

        let mut cache = self.cache.write().await;
        if cache.len() >= MAX_CACHED_USERS {
            tracing::debug!(entries = cache.len(), "User id cache full, clearing");
            cache.clear();
        }
        cache.insert(key, info.id.clone());

        Ok(info.id)
    }

    pub async fn cached_count(&self) -> usize {
        self.cache.read().await.len()
    }
}
