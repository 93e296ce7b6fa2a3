//! Stats collector client
//!
//! This service talks to the external view-statistics collector. Every call
//! is best-effort: a collector failure is logged and absorbed, it never
//! surfaces into a registration operation. With no base URL configured the
//! client is disabled and all calls short-circuit.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::StatsConfig;
use crate::utils::datetime;
use crate::utils::errors::{EventHiveError, Result};

/// Hit payload posted to the collector
#[derive(Debug, Clone, Serialize)]
pub struct EndpointHit {
    pub app: String,
    pub uri: String,
    pub ip: String,
    /// Boundary pattern yyyy-MM-dd HH:mm:ss
    pub timestamp: String,
}

/// Aggregated view counts returned by the collector
#[derive(Debug, Clone, Deserialize)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: i64,
}

/// Client for the external stats collector
#[derive(Debug, Clone)]
pub struct StatsService {
    client: Client,
    base_url: Option<String>,
    app_name: String,
}

impl StatsService {
    /// Create a new StatsService instance
    pub fn new(config: &StatsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("EventHive/1.0")
            .build()
            .map_err(EventHiveError::Http)?;

        let base_url = match &config.base_url {
            Some(raw) if !raw.is_empty() => {
                Url::parse(raw)?;
                Some(raw.trim_end_matches('/').to_string())
            }
            _ => None,
        };

        Ok(Self {
            client,
            base_url,
            app_name: config.app_name.clone(),
        })
    }

    /// Whether a collector is configured
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Record one endpoint hit, fire-and-forget
    pub async fn record_hit(&self, uri: &str, client_ip: &str, timestamp: NaiveDateTime) {
        let Some(base) = &self.base_url else {
            return;
        };

        let hit = EndpointHit {
            app: self.app_name.clone(),
            uri: uri.to_string(),
            ip: client_ip.to_string(),
            timestamp: datetime::format(&timestamp),
        };

        match self
            .client
            .post(format!("{}/hit", base))
            .json(&hit)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(uri = uri, "Stats hit recorded");
            }
            Ok(response) => {
                warn!(uri = uri, status = %response.status(), "Stats hit rejected");
            }
            Err(e) => {
                warn!(uri = uri, error = %e, "Stats hit failed");
            }
        }
    }

    /// View counts per uri over a time window.
    ///
    /// Always returns an entry for every requested uri; on any collector
    /// failure every entry is zero.
    pub async fn view_counts(
        &self,
        uris: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
        unique: bool,
    ) -> HashMap<String, i64> {
        let mut counts: HashMap<String, i64> = uris.iter().map(|u| (u.clone(), 0)).collect();
        if uris.is_empty() {
            return counts;
        }
        let Some(base) = &self.base_url else {
            return counts;
        };

        let mut query: Vec<(&str, String)> = vec![
            ("start", datetime::format(&start)),
            ("end", datetime::format(&end)),
            ("unique", unique.to_string()),
        ];
        for uri in uris {
            query.push(("uris", uri.clone()));
        }

        let response = self
            .client
            .get(format!("{}/stats", base))
            .query(&query)
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<Vec<ViewStats>>().await {
                Ok(stats) => {
                    for entry in stats {
                        if let Some(slot) = counts.get_mut(&entry.uri) {
                            *slot = entry.hits;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Stats views response unreadable");
                }
            },
            Err(e) => {
                warn!(error = %e, "Stats views failed");
            }
        }

        counts
    }
}
