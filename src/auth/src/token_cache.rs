// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::token::{BearerToken, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Cached tokens are replaced once they are this close to expiring.
pub(crate) const REFRESH_MARGIN: Duration = Duration::from_secs(10);

/// Wraps a [TokenProvider] and reuses its last token while it is valid.
///
/// A single refresh runs at a time, concurrent callers wait for it. Failed
/// refreshes leave the slot empty.
#[derive(Debug)]
pub(crate) struct TokenCache<T> {
    slot: Arc<Mutex<Option<BearerToken>>>,
    source: Arc<T>,
}

impl<T> Clone for TokenCache<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            source: Arc::clone(&self.source),
        }
    }
}

impl<T: TokenProvider> TokenCache<T> {
    pub fn new(source: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            source: Arc::new(source),
        }
    }
}

#[async_trait::async_trait]
impl<T: TokenProvider + 'static> TokenProvider for TokenCache<T> {
    async fn token(&self) -> Result<BearerToken> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot
            .as_ref()
            .filter(|t| !t.expires_within(Instant::now(), REFRESH_MARGIN))
        {
            return Ok(cached.clone());
        }
        tracing::debug!("refreshing access token");
        // Drop any stale token before calling the source, errors must not
        // leave it behind.
        *slot = None;
        let fresh = self.source.token().await?;
        *slot = Some(fresh.clone());
        Ok(fresh)
    }
}
