//! Data fetching: transport seam, response validation and record decoding.
//!
//! The fetcher never touches chart state; it hands a typed value back to the
//! caller, which decides whether (and when) to apply it.

#[cfg(feature = "http-client")]
mod http;
pub mod records;

#[cfg(feature = "http-client")]
pub use http::ReqwestTransport;
pub use records::{
    AgeCount, AggregateCount, MerchantFraudRate, RecordKind, SeriesRecord, TransactionRecord,
    coerce_number, coerce_text,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::MetricSeries;
use crate::error::{VizError, VizResult};

/// Route prefix of the aggregation backend.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// One read-only backend route, optionally with a trailing path parameter
/// (e.g. a row-count limit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(default)]
    pub param: Option<String>,
}

impl Endpoint {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl ToString) -> Self {
        self.param = Some(param.to_string());
        self
    }

    /// Age -> fraud case count histogram.
    #[must_use]
    pub fn age_histogram() -> Self {
        Self::new("getAgeHistogram")
    }

    /// Merchants sorted by fraud rate, limited to `limit` rows.
    #[must_use]
    pub fn sorted_fraudulent_merchants(limit: usize) -> Self {
        Self::new("getSortedFraudulentMerchants").with_param(limit)
    }

    #[must_use]
    pub fn aggregate_counts() -> Self {
        Self::new("getAggregateCounts")
    }

    /// Most recent transactions, limited to `limit` rows.
    #[must_use]
    pub fn transactions(limit: usize) -> Self {
        Self::new("getTransactions").with_param(limit)
    }

    #[must_use]
    pub fn path(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        match &self.param {
            Some(param) => format!("{prefix}/{}/{param}", self.name),
            None => format!("{prefix}/{}", self.name),
        }
    }
}

/// Raw answer of a transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the fetcher and the network.
///
/// Implementations only report transport-level failures; status codes and
/// body validation are handled by [`DataFetcher`].
pub trait Transport {
    fn get(&self, path: &str) -> VizResult<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> VizResult<TransportResponse> {
        (**self).get(path)
    }
}

/// Issues endpoint requests and maps responses to typed values.
#[derive(Debug, Clone)]
pub struct DataFetcher<T: Transport> {
    transport: T,
    prefix: String,
}

impl<T: Transport> DataFetcher<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            prefix: DEFAULT_API_PREFIX.to_owned(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches and parses the JSON body of `endpoint`.
    pub fn fetch_json(&self, endpoint: &Endpoint) -> VizResult<Value> {
        let path = endpoint.path(&self.prefix);
        debug!(endpoint = %path, "fetch start");
        let response = self.transport.get(&path)?;
        if !response.is_success() {
            warn!(endpoint = %path, status = response.status, "fetch rejected");
            return Err(VizError::Http {
                endpoint: path,
                status: response.status,
            });
        }
        serde_json::from_str(&response.body).map_err(|err| VizError::Shape {
            endpoint: path,
            reason: format!("body is not valid json: {err}"),
        })
    }

    /// Fetches a top-level array of flat records.
    ///
    /// A non-array body or a non-object element is a shape failure; missing
    /// fields inside records are tolerated by the record decoders.
    pub fn fetch_records<K: RecordKind>(&self, endpoint: &Endpoint) -> VizResult<Vec<K>> {
        let path = endpoint.path(&self.prefix);
        let value = self.fetch_json(endpoint)?;
        let Value::Array(rows) = value else {
            return Err(VizError::Shape {
                endpoint: path,
                reason: format!("expected a json array, got {}", json_kind(&value)),
            });
        };

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let Value::Object(fields) = row else {
                return Err(VizError::Shape {
                    endpoint: path,
                    reason: format!("record {index} is {}, expected an object", json_kind(row)),
                });
            };
            records.push(K::from_fields(fields));
        }
        debug!(endpoint = %path, count = records.len(), "fetch decoded");
        Ok(records)
    }

    /// Fetches records and maps them into a chart series.
    pub fn fetch_series<K: SeriesRecord>(&self, endpoint: &Endpoint) -> VizResult<MetricSeries> {
        let records = self.fetch_records::<K>(endpoint)?;
        Ok(MetricSeries::from_points_lossy(
            records.iter().map(SeriesRecord::to_point),
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
