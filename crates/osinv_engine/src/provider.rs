use crate::error::ProviderError;
use async_trait::async_trait;
use osinv_model::{FilterSpec, Record, RecordId, RecordKind};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Source of inventory records. Implementations own transport, auth and
/// pagination; the engine only issues these four requests.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError>;

    /// May apply none, some or all of `filters`; callers re-check every record.
    async fn search_records<R: Record>(&self, filters: &FilterSpec)
        -> Result<Vec<R>, ProviderError>;

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError>;

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError>;
}

/// Holds raw records per kind and decodes them on every request, the way a
/// remote API would hand back JSON documents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    collections: HashMap<RecordKind, Vec<Value>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(mut self, kind: RecordKind, records: Vec<Value>) -> Self {
        self.collections.entry(kind).or_default().extend(records);
        self
    }

    pub fn with_records<R: Record>(self, records: &[R]) -> serde_json::Result<Self> {
        let raw = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_raw(R::KIND, raw))
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.collections.get(&kind).map_or(0, Vec::len)
    }

    fn decode<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        let Some(raw) = self.collections.get(&R::KIND) else {
            return Ok(Vec::new());
        };
        raw.iter()
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|source| ProviderError::Malformed {
                    kind: R::KIND,
                    source,
                })
            })
            .collect()
    }
}

#[async_trait]
impl InventoryProvider for InMemoryProvider {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError> {
        self.decode::<R>()?
            .into_iter()
            .find(|record| record.id().matches_str(&id.to_string()))
            .ok_or_else(|| ProviderError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            })
    }

    async fn search_records<R: Record>(
        &self,
        filters: &FilterSpec,
    ) -> Result<Vec<R>, ProviderError> {
        debug!(
            target: "engine::provider",
            "in-memory search for {} ignores {} filter keys",
            R::KIND,
            filters.len()
        );
        self.decode()
    }

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError> {
        Ok(self
            .decode::<R>()?
            .into_iter()
            .filter(|record| {
                record.id().matches_str(name_or_id) || record.name() == Some(name_or_id)
            })
            .collect())
    }

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        self.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osinv_model::{ComputeService, Service};
    use serde_json::json;

    #[tokio::test]
    async fn looks_up_by_id_and_reports_missing() {
        let provider = InMemoryProvider::new().with_raw(
            RecordKind::ComputeService,
            vec![json!({
                "id": 1,
                "binary": "nova-scheduler",
                "host": "controller",
                "status": "enabled",
                "state": "up"
            })],
        );

        let found: ComputeService = provider
            .get_record(&RecordId::Int(1))
            .await
            .expect("record 1");
        assert_eq!(found.binary, "nova-scheduler");

        let by_text: ComputeService = provider
            .get_record(&RecordId::from("1"))
            .await
            .expect("record 1 by text");
        assert_eq!(by_text.id, RecordId::Int(1));

        let missing = provider
            .get_record::<ComputeService>(&RecordId::Int(2))
            .await
            .unwrap_err();
        assert!(matches!(missing, ProviderError::NotFound { .. }));
    }

    #[tokio::test]
    async fn malformed_records_surface_as_errors() {
        let provider = InMemoryProvider::new()
            .with_raw(RecordKind::Service, vec![json!({"id": "s1", "name": "nova"})]);

        let err = provider.list_records::<Service>().await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Malformed {
                kind: RecordKind::Service,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn name_or_id_search_matches_either_field() {
        let provider = InMemoryProvider::new().with_raw(
            RecordKind::Service,
            vec![
                json!({"id": "s1", "name": "nova", "type": "compute"}),
                json!({"id": "s2", "name": "glance", "type": "image"}),
            ],
        );

        let by_name: Vec<Service> = provider.search_by_name_or_id("glance").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "s2");

        let by_id: Vec<Service> = provider.search_by_name_or_id("s1").await.unwrap();
        assert_eq!(by_id[0].name.as_deref(), Some("nova"));

        let none: Vec<Service> = provider.search_by_name_or_id("compute").await.unwrap();
        assert!(none.is_empty());
    }
}
