//! Client for The Odds API v4.
//!
//! Two endpoints: the MLB events list for a day window, and per-event odds for
//! the `pitcher_strikeouts` market. Requests are serialized one per game; a 422
//! or 404 on the odds endpoint means the market is not offered for that event,
//! which is a valid empty state and not a failure.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::OddsApiConfig;
use crate::error::{FeedError, Result};

// ── Odds API response types ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventOdds {
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// One priced outcome. For player props, `description` carries the player name
/// and `point` the line; `name` is "Over" or "Under".
#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub description: Option<String>,
    pub point: Option<f64>,
    pub price: Option<f64>,
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct OddsApiClient {
    client: Client,
    config: OddsApiConfig,
}

impl OddsApiClient {
    pub fn new(config: OddsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// List MLB events commencing within `[from, to]`.
    ///
    /// Any failure here aborts the run: without a game list there is nothing
    /// to publish, and previously published output must stay untouched.
    pub async fn fetch_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let url = format!("{}/sports/baseball_mlb/events", self.config.base_url);
        let from_param = format_utc(from);
        let to_param = format_utc(to);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("dateFormat", "iso"),
                ("commenceTimeFrom", from_param.as_str()),
                ("commenceTimeTo", to_param.as_str()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == 401 {
            return Err(FeedError::Upstream {
                status: 401,
                message: "invalid API key".to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let events: Vec<Event> = resp.json().await?;
        tracing::info!("Fetched {} MLB events", events.len());
        Ok(events)
    }

    /// Pitcher strikeout odds for one event. `Ok(None)` when the market is
    /// not offered (422/404); other failures surface as upstream errors.
    pub async fn fetch_event_odds(&self, event_id: &str) -> Result<Option<EventOdds>> {
        let url = format!(
            "{}/sports/baseball_mlb/events/{}/odds",
            self.config.base_url, event_id
        );

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("regions", "us"),
                ("markets", "pitcher_strikeouts"),
                ("oddsFormat", "american"),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == 422 || status == 404 {
            tracing::debug!("No pitcher_strikeouts market for event {}", event_id);
            return Ok(None);
        }
        if status == 401 {
            return Err(FeedError::Upstream {
                status: 401,
                message: "invalid API key".to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let odds: EventOdds = resp.json().await?;
        Ok(Some(odds))
    }
}

fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
