use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use costbot_core::{DateRange, range::DATE_FORMAT};

use crate::auth::TokenCredential;
use crate::types::{BillingError, Result, ShapeError};

/// Audience the billing query token is scoped to.
pub const MANAGEMENT_AUDIENCE: &str = "https://management.azure.com";

const API_VERSION: &str = "2021-10-01";

/// One raw result row: `[cost, date, resourceGroupName]` per the API's
/// documented column order.
pub type RawRow = Vec<Value>;

/// Client for the Cost Management query endpoint.
pub struct CostClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
    subscription_id: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody {
    #[serde(rename = "type")]
    query_type: &'static str,
    timeframe: &'static str,
    time_period: TimePeriod,
    dataset: Dataset,
}

#[derive(Serialize)]
struct TimePeriod {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct Dataset {
    granularity: &'static str,
    aggregation: Aggregation,
    grouping: Vec<Grouping>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Aggregation {
    total_cost: AggregationExpr,
}

#[derive(Serialize)]
struct AggregationExpr {
    name: &'static str,
    function: &'static str,
}

#[derive(Serialize)]
struct Grouping {
    #[serde(rename = "type")]
    grouping_type: &'static str,
    name: &'static str,
}

#[derive(Deserialize)]
struct QueryResponse {
    properties: Option<QueryProperties>,
}

#[derive(Deserialize)]
struct QueryProperties {
    rows: Option<Vec<RawRow>>,
}

impl CostClient {
    pub fn new(credential: Arc<dyn TokenCredential>, subscription_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build http client"),
            credential,
            subscription_id: subscription_id.into(),
            base_url: MANAGEMENT_AUDIENCE.to_string(),
        }
    }

    /// Point the client at a different management host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run the daily-granularity usage query for one range and return the
    /// raw result rows.
    pub async fn query(&self, range: &DateRange) -> Result<Vec<RawRow>> {
        let token = self.credential.get_token(MANAGEMENT_AUDIENCE).await?;
        let url = format!(
            "{}/subscriptions/{}/providers/Microsoft.CostManagement/query?api-version={}",
            self.base_url.trim_end_matches('/'),
            self.subscription_id,
            API_VERSION
        );
        debug!(%url, start = %range.start, end = %range.end, "querying cost data");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token.token)
            .json(&query_body(range))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: QueryResponse = response.json().await?;
        let rows = payload
            .properties
            .and_then(|properties| properties.rows)
            .ok_or(ShapeError::MissingRows)?;
        debug!(rows = rows.len(), "cost query returned");
        Ok(rows)
    }
}

fn query_body(range: &DateRange) -> QueryBody {
    QueryBody {
        query_type: "Usage",
        timeframe: "Custom",
        time_period: TimePeriod {
            from: range.start.format(DATE_FORMAT).to_string(),
            to: range.end.format(DATE_FORMAT).to_string(),
        },
        dataset: Dataset {
            granularity: "Daily",
            aggregation: Aggregation {
                total_cost: AggregationExpr {
                    name: "Cost",
                    function: "Sum",
                },
            },
            grouping: vec![Grouping {
                grouping_type: "Dimension",
                name: "ResourceGroupName",
            }],
        },
    }
}
