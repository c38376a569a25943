use crate::error::QueryError;
use osinv_model::{Envelope, Record, ResultSet};
use tracing::{debug, error};

/// Packages a query outcome for the caller. Failures carry only the
/// underlying message.
pub fn assemble<R: Record>(result: Result<ResultSet<R>, QueryError>) -> Envelope<R> {
    match result {
        Ok(records) => {
            debug!(target: "engine::query", "{} query returned {} records", R::KIND, records.len());
            Envelope::success(R::KIND, records)
        }
        Err(err) => {
            error!(target: "engine::query", "{} query failed: {err}", R::KIND);
            Envelope::failure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osinv_model::{RecordKind, Service};
    use serde_json::json;

    #[test]
    fn single_records_stay_single() {
        let service: Service =
            serde_json::from_value(json!({"id": "s1", "name": "nova", "type": "compute"}))
                .unwrap();
        let envelope = assemble(Ok(ResultSet::Single(service)));

        assert!(!envelope.changed);
        assert_eq!(envelope.result().map(ResultSet::len), Some(1));
        let encoded = serde_json::to_value(&envelope).unwrap();
        assert_eq!(encoded["openstack_services"]["name"], "nova");
    }

    #[test]
    fn failures_carry_the_message_only() {
        let envelope = assemble::<Service>(Err(QueryError::NotFound {
            kind: RecordKind::Service,
            id: "s9".into(),
        }));

        assert!(envelope.is_failure());
        assert!(!envelope.changed);
        assert_eq!(envelope.error(), Some("service s9 not found"));
        assert!(envelope.result().is_none());
    }
}
