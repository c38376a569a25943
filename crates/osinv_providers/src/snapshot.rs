use anyhow::{Context, Result};
use async_trait::async_trait;
use osinv_engine::{InMemoryProvider, InventoryProvider, ProviderError};
use osinv_model::{FilterSpec, Record, RecordId, RecordKind};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    endpoints: Vec<Value>,
    services: Vec<Value>,
    compute_services: Vec<Value>,
}

/// Inventory exported to a YAML or JSON file, served from memory. Records
/// are validated lazily, on the request that reads them.
pub struct SnapshotProvider {
    source: PathBuf,
    inner: InMemoryProvider,
}

impl SnapshotProvider {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)
            .with_context(|| format!("reading inventory snapshot {}", path.display()))?;
        let provider = Self::parse(&body)
            .with_context(|| format!("parsing inventory snapshot {}", path.display()))?;
        info!(
            target: "providers::snapshot",
            "loaded {} endpoints, {} services, {} compute services from {}",
            provider.inner.count(RecordKind::Endpoint),
            provider.inner.count(RecordKind::Service),
            provider.inner.count(RecordKind::ComputeService),
            path.display()
        );
        Ok(Self {
            source: path.to_path_buf(),
            ..provider
        })
    }

    /// YAML parser, so JSON snapshots load too.
    pub fn parse(body: &str) -> Result<Self> {
        let file: SnapshotFile = serde_yaml::from_str(body)?;
        let inner = InMemoryProvider::new()
            .with_raw(RecordKind::Endpoint, file.endpoints)
            .with_raw(RecordKind::Service, file.services)
            .with_raw(RecordKind::ComputeService, file.compute_services);
        Ok(Self {
            source: PathBuf::new(),
            inner,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[async_trait]
impl InventoryProvider for SnapshotProvider {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError> {
        debug!(target: "providers::snapshot", "get {} {}", R::KIND, id);
        self.inner.get_record(id).await
    }

    async fn search_records<R: Record>(
        &self,
        filters: &FilterSpec,
    ) -> Result<Vec<R>, ProviderError> {
        debug!(target: "providers::snapshot", "search {} records", R::KIND);
        self.inner.search_records(filters).await
    }

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError> {
        debug!(target: "providers::snapshot", "search {} '{}'", R::KIND, name_or_id);
        self.inner.search_by_name_or_id(name_or_id).await
    }

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        debug!(target: "providers::snapshot", "list {} records", R::KIND);
        self.inner.list_records().await
    }
}
