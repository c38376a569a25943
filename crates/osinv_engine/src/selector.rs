use crate::error::QueryError;
use crate::matcher::filter_records;
use crate::provider::InventoryProvider;
use osinv_model::{FilterSpec, Record, RecordId, ResultSet};
use tracing::{debug, instrument};

/// Retrieval strategy for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    ById(RecordId),
    NameOrId(String),
    Filtered(FilterSpec),
    All,
}

impl Selection {
    /// Empty ids and empty filter maps count as not given.
    pub fn from_params(
        id: Option<RecordId>,
        filters: Option<FilterSpec>,
    ) -> Result<Self, QueryError> {
        let id = id.filter(|id| !id.is_empty());
        match (id, non_empty(filters)) {
            (Some(_), Some(_)) => Err(QueryError::mutually_exclusive("id", "filters")),
            (Some(id), None) => Ok(Selection::ById(id)),
            (None, Some(filters)) => Ok(Selection::Filtered(filters)),
            (None, None) => Ok(Selection::All),
        }
    }

    pub fn from_name_or_id(
        name_or_id: Option<String>,
        filters: Option<FilterSpec>,
    ) -> Result<Self, QueryError> {
        let name_or_id = name_or_id.filter(|value| !value.is_empty());
        match (name_or_id, non_empty(filters)) {
            (Some(_), Some(_)) => Err(QueryError::mutually_exclusive("service", "filters")),
            (Some(value), None) => Ok(Selection::NameOrId(value)),
            (None, Some(filters)) => Ok(Selection::Filtered(filters)),
            (None, None) => Ok(Selection::All),
        }
    }
}

fn non_empty(filters: Option<FilterSpec>) -> Option<FilterSpec> {
    filters.filter(|filters| !filters.is_empty())
}

#[instrument(skip(provider), fields(kind = %R::KIND))]
pub async fn select<R, P>(provider: &P, selection: &Selection) -> Result<ResultSet<R>, QueryError>
where
    R: Record,
    P: InventoryProvider,
{
    match selection {
        Selection::ById(id) => {
            let record = provider.get_record::<R>(id).await?;
            Ok(ResultSet::Single(record))
        }
        Selection::NameOrId(name_or_id) => {
            let records = provider.search_by_name_or_id::<R>(name_or_id).await?;
            debug!(target: "engine::selector", "name-or-id '{}' matched {}", name_or_id, records.len());
            Ok(ResultSet::Many(records))
        }
        Selection::Filtered(filters) => {
            let candidates = provider.search_records::<R>(filters).await?;
            let fetched = candidates.len();
            let records = filter_records(candidates, filters);
            debug!(
                target: "engine::selector",
                "search returned {} {} records, {} matched locally",
                fetched,
                R::KIND,
                records.len()
            );
            Ok(ResultSet::Many(records))
        }
        Selection::All => Ok(ResultSet::Many(provider.list_records::<R>().await?)),
    }
}
