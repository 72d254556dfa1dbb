//! Reporting endpoints (v2 API).

use std::sync::Arc;

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{fetch, invalid_field, number_or_string};
use crate::error::Result;
use crate::transport::{with_query, Method, Requester};

/// What a report is scoped to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportType {
    #[default]
    Account,
    Agent,
    Inbox,
    Label,
    Team,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportMetric {
    ConversationsCount,
    IncomingMessagesCount,
    OutgoingMessagesCount,
    AvgFirstResponseTime,
    AvgResolutionTime,
    ResolutionsCount,
}

/// Time window and scope shared by every report call.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ReportQuery {
    #[builder(default)]
    pub report_type: ReportType,
    /// Id of the agent/inbox/label/team; unused for account reports.
    pub id: Option<u64>,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ReportQuery {
    fn params(&self) -> Result<Vec<(&'static str, String)>> {
        if self.since > self.until {
            return Err(invalid_field(
                "since",
                format!(
                    "invalid range: since {} is after until {}",
                    self.since.to_rfc3339(),
                    self.until.to_rfc3339()
                ),
            ));
        }
        let mut params = vec![("type", self.report_type.to_string())];
        if let Some(id) = self.id {
            params.push(("id", id.to_string()));
        }
        params.push(("since", self.since.timestamp().to_string()));
        params.push(("until", self.until.timestamp().to_string()));
        Ok(params)
    }
}

/// Aggregates over the query window. Times are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    #[serde(deserialize_with = "number_or_string")]
    pub conversations_count: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub incoming_messages_count: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub outgoing_messages_count: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub avg_first_response_time: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub avg_resolution_time: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub resolutions_count: f64,
}

/// One bucket of a metric timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPoint {
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
    pub timestamp: i64,
}

pub struct Reports {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl Reports {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("/api/v2/accounts/{}/reports{suffix}", self.account_id)
    }

    pub async fn summary(&self, query: &ReportQuery) -> Result<ReportSummary> {
        let path = with_query(&self.path("/summary"), &query.params()?);
        fetch(self.requester.as_ref(), Method::GET, &path, None).await
    }

    pub async fn timeseries(
        &self,
        metric: ReportMetric,
        query: &ReportQuery,
    ) -> Result<Vec<ReportPoint>> {
        let mut params = vec![("metric", metric.to_string())];
        params.extend(query.params()?);
        let path = with_query(&self.path(""), &params);
        fetch(self.requester.as_ref(), Method::GET, &path, None).await
    }
}
