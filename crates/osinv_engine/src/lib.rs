mod assembler;
mod error;
pub mod joiner;
pub mod matcher;
mod provider;
pub mod selector;
#[cfg(test)]
mod testing;

pub use assembler::assemble;
pub use error::{ProviderError, QueryError};
pub use provider::{InMemoryProvider, InventoryProvider};
pub use selector::Selection;

use osinv_model::{
    ComputeService, ComputeServiceQuery, Endpoint, EndpointQuery, Envelope, ResultSet, Service,
    ServiceQuery,
};
use tracing::instrument;

/// Read-only query facade over one inventory provider. Holds no state
/// between calls besides the provider itself.
pub struct QueryEngine<P: InventoryProvider> {
    provider: P,
}

impl<P: InventoryProvider> QueryEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[instrument(skip(self))]
    pub async fn endpoints(&self, query: &EndpointQuery) -> Envelope<Endpoint> {
        assemble(joiner::query_endpoints(&self.provider, query).await)
    }

    #[instrument(skip(self))]
    pub async fn services(&self, query: &ServiceQuery) -> Envelope<Service> {
        let result: Result<ResultSet<Service>, QueryError> = async {
            let selection =
                Selection::from_name_or_id(query.service.clone(), query.filters.clone())?;
            selector::select(&self.provider, &selection).await
        }
        .await;
        assemble(result)
    }

    #[instrument(skip(self))]
    pub async fn compute_services(&self, query: &ComputeServiceQuery) -> Envelope<ComputeService> {
        let result: Result<ResultSet<ComputeService>, QueryError> = async {
            let selection = Selection::from_params(query.id.clone(), query.filters.clone())?;
            selector::select(&self.provider, &selection).await
        }
        .await;
        assemble(result)
    }
}
