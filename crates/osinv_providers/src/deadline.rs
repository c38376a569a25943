use crate::config;
use async_trait::async_trait;
use osinv_engine::{InventoryProvider, ProviderError};
use osinv_model::{FilterSpec, Record, RecordId, RecordKind};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounds every request to the wrapped provider by a fixed deadline.
pub struct DeadlineProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P: InventoryProvider> DeadlineProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_timeout(inner, config::provider_timeout())
    }

    pub fn with_timeout(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn guard<T, F>(&self, kind: RecordKind, request: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    target: "providers::deadline",
                    "{} request exceeded {:?}", kind, self.timeout
                );
                Err(ProviderError::DeadlineExceeded {
                    kind,
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<P: InventoryProvider> InventoryProvider for DeadlineProvider<P> {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError> {
        self.guard(R::KIND, self.inner.get_record(id)).await
    }

    async fn search_records<R: Record>(
        &self,
        filters: &FilterSpec,
    ) -> Result<Vec<R>, ProviderError> {
        self.guard(R::KIND, self.inner.search_records(filters)).await
    }

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError> {
        self.guard(R::KIND, self.inner.search_by_name_or_id(name_or_id))
            .await
    }

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        self.guard(R::KIND, self.inner.list_records()).await
    }
}
