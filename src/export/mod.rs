//! Static feed writer.
//!
//! Serializes the built feed to JSON files suitable for static hosting
//! (GitHub Pages, Netlify). Nothing is written until the feed is fully built,
//! so an upstream failure never clobbers previously published output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::models::{
    BestOddsEntry, BestOddsFeed, GameInfo, GameSummary, PitcherFeedEntry, PitchersFeed, PropsFeed,
    SummaryFeed,
};
use crate::utils::format_odds;

/// Files written under `<public_dir>/api/v1/`.
pub const FULL_FEED_FILE: &str = "strikeout-props.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const PITCHERS_FILE: &str = "pitchers.json";
pub const BEST_ODDS_FILE: &str = "best-odds.json";

/// How many entries the best-odds rankings keep per side.
const BEST_ODDS_LIMIT: usize = 20;

/// Pretty-printed JSON for stdout export.
pub fn feed_to_json(feed: &PropsFeed) -> Result<String> {
    serde_json::to_string_pretty(feed).context("Failed to serialise props feed")
}

/// Write the full feed to a single JSON file.
pub fn write_feed_file(feed: &PropsFeed, path: &Path) -> Result<()> {
    write_json(feed, path)
}

/// Default single-file export name, e.g. `mlb_strikeout_props_2025-06-03.json`.
pub fn default_export_name(feed: &PropsFeed) -> String {
    format!("mlb_strikeout_props_{}.json", feed.metadata.date)
}

/// Publish the complete static site: all API endpoint files plus the
/// documentation page, CORS headers, and a README with current stats.
pub fn publish(feed: &PropsFeed, public_dir: &Path) -> Result<Vec<PathBuf>> {
    let api_dir = public_dir.join("api").join("v1");
    fs::create_dir_all(&api_dir)
        .with_context(|| format!("Failed to create {}", api_dir.display()))?;

    let mut written = Vec::new();

    let full_path = api_dir.join(FULL_FEED_FILE);
    write_json(feed, &full_path)?;
    written.push(full_path);

    let summary_path = api_dir.join(SUMMARY_FILE);
    write_json(&build_summary_feed(feed), &summary_path)?;
    written.push(summary_path);

    let pitchers_path = api_dir.join(PITCHERS_FILE);
    write_json(&build_pitchers_feed(feed), &pitchers_path)?;
    written.push(pitchers_path);

    let best_odds_path = api_dir.join(BEST_ODDS_FILE);
    write_json(&build_best_odds_feed(feed), &best_odds_path)?;
    written.push(best_odds_path);

    let index_path = public_dir.join("index.html");
    fs::write(&index_path, INDEX_HTML)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    written.push(index_path);

    let headers_path = public_dir.join("_headers");
    fs::write(&headers_path, HEADERS_FILE)
        .with_context(|| format!("Failed to write {}", headers_path.display()))?;
    written.push(headers_path);

    let readme_path = public_dir.join("README.md");
    fs::write(&readme_path, render_readme(feed))
        .with_context(|| format!("Failed to write {}", readme_path.display()))?;
    written.push(readme_path);

    info!(
        dir = %public_dir.display(),
        files = written.len(),
        "Public feed published"
    );
    Ok(written)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise feed payload")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ── Derived payloads ──────────────────────────────────────────────────────────

/// Lightweight summary: game info and pitcher counts, no odds data.
pub fn build_summary_feed(feed: &PropsFeed) -> SummaryFeed {
    SummaryFeed {
        metadata: feed.metadata.clone(),
        summary: feed.summary.clone(),
        games: feed
            .games
            .iter()
            .map(|game| GameSummary {
                event_id: game.event_id.clone(),
                away_team: game.away_team.clone(),
                home_team: game.home_team.clone(),
                matchup: game.matchup.clone(),
                game_time: game.game_time.clone(),
                game_time_formatted: game.game_time_formatted.clone(),
                pitcher_count: game.pitchers.len(),
            })
            .collect(),
    }
}

/// Flat pitcher list with game context attached to each entry.
pub fn build_pitchers_feed(feed: &PropsFeed) -> PitchersFeed {
    let mut pitchers = Vec::new();
    for game in &feed.games {
        for pitcher in &game.pitchers {
            pitchers.push(PitcherFeedEntry {
                props: pitcher.clone(),
                game_info: GameInfo {
                    matchup: game.matchup.clone(),
                    game_time: game.game_time_formatted.clone(),
                    away_team: game.away_team.clone(),
                    home_team: game.home_team.clone(),
                },
            });
        }
    }
    PitchersFeed {
        metadata: feed.metadata.clone(),
        pitchers,
    }
}

/// Top-20 over and under consensus prices, sorted best (highest) first.
pub fn build_best_odds_feed(feed: &PropsFeed) -> BestOddsFeed {
    let mut best_overs = Vec::new();
    let mut best_unders = Vec::new();

    for game in &feed.games {
        for pitcher in &game.pitchers {
            if let Some(over) = pitcher.consensus_odds.over {
                best_overs.push(BestOddsEntry {
                    pitcher: pitcher.pitcher_name.clone(),
                    game: game.matchup.clone(),
                    line: pitcher.strikeout_line,
                    odds: over,
                    odds_formatted: format_odds(Some(over)),
                    sportsbook_count: pitcher.sportsbook_count,
                });
            }
            if let Some(under) = pitcher.consensus_odds.under {
                best_unders.push(BestOddsEntry {
                    pitcher: pitcher.pitcher_name.clone(),
                    game: game.matchup.clone(),
                    line: pitcher.strikeout_line,
                    odds: under,
                    odds_formatted: format_odds(Some(under)),
                    sportsbook_count: pitcher.sportsbook_count,
                });
            }
        }
    }

    best_overs.sort_by(|a, b| b.odds.cmp(&a.odds));
    best_unders.sort_by(|a, b| b.odds.cmp(&a.odds));
    best_overs.truncate(BEST_ODDS_LIMIT);
    best_unders.truncate(BEST_ODDS_LIMIT);

    BestOddsFeed {
        metadata: feed.metadata.clone(),
        best_overs,
        best_unders,
    }
}

// ── Static site assets ────────────────────────────────────────────────────────

fn render_readme(feed: &PropsFeed) -> String {
    format!(
        r#"# MLB Strikeout Props Public Feed

This directory contains the public JSON API endpoints for MLB strikeout props data.

## Generated: {generated}

## Files:
- `index.html` - API documentation
- `api/v1/strikeout-props.json` - Full dataset
- `api/v1/summary.json` - Summary data
- `api/v1/pitchers.json` - Pitcher-focused data
- `api/v1/best-odds.json` - Best odds rankings

## Stats:
- Total Games: {games}
- Total Pitchers: {pitchers}
- Games with Props: {with_props}

## Usage:
These files are designed to be served statically via GitHub Pages, Netlify, or similar hosting.
"#,
        generated = feed.metadata.generated_at_formatted,
        games = feed.summary.total_games,
        pitchers = feed.summary.total_pitchers,
        with_props = feed.summary.games_with_props,
    )
}

/// Netlify-style CORS and caching headers.
const HEADERS_FILE: &str = r#"/*
  Access-Control-Allow-Origin: *
  Access-Control-Allow-Methods: GET, HEAD, OPTIONS
  Access-Control-Allow-Headers: Content-Type
  Access-Control-Max-Age: 86400

/api/*
  Content-Type: application/json
  Cache-Control: public, max-age=300
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MLB Strikeout Props API</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 1000px; margin: 0 auto; padding: 20px; }
        .endpoint { background: #f5f5f5; padding: 15px; margin: 10px 0; border-radius: 5px; }
        .url { background: #333; color: #fff; padding: 5px 10px; border-radius: 3px; font-family: monospace; }
        code { background: #f0f0f0; padding: 2px 5px; border-radius: 3px; }
        .updated { color: #666; font-style: italic; }
    </style>
</head>
<body>
    <h1>🎯 MLB Strikeout Props JSON API</h1>

    <p class="updated">Last updated: <span id="lastUpdated"></span></p>

    <h2>📡 Available Endpoints</h2>

    <div class="endpoint">
        <h3>Full Strikeout Props Data</h3>
        <div class="url">GET /api/v1/strikeout-props.json</div>
        <p>Complete dataset with all games, pitchers, lines, and odds from multiple sportsbooks.</p>
        <p><strong>Use case:</strong> Full data analysis, comprehensive dashboards</p>
    </div>

    <div class="endpoint">
        <h3>Summary Data</h3>
        <div class="url">GET /api/v1/summary.json</div>
        <p>Lightweight summary with game info and pitcher counts (no odds data).</p>
        <p><strong>Use case:</strong> Quick overview, mobile apps, initial page loads</p>
    </div>

    <div class="endpoint">
        <h3>Pitchers Only</h3>
        <div class="url">GET /api/v1/pitchers.json</div>
        <p>All pitcher props with game context, optimized for pitcher-focused views.</p>
        <p><strong>Use case:</strong> Pitcher comparison tools, search interfaces</p>
    </div>

    <div class="endpoint">
        <h3>Best Odds</h3>
        <div class="url">GET /api/v1/best-odds.json</div>
        <p>Top 20 best odds for overs and unders, sorted by value.</p>
        <p><strong>Use case:</strong> Finding value bets, odds comparison tools</p>
    </div>

    <h2>🔄 Data Freshness</h2>
    <ul>
        <li>Data updates multiple times per day</li>
        <li>Includes only today's MLB games (Eastern timezone)</li>
        <li>Consensus odds calculated from 6+ major sportsbooks</li>
        <li>Props availability depends on sportsbook posting schedules</li>
    </ul>

    <h2>📊 Response Format</h2>
    <p>All endpoints return JSON with consistent structure:</p>
    <ul>
        <li><code>metadata</code>: Generation timestamp, date, timezone</li>
        <li><code>summary</code>: Total counts and statistics</li>
        <li><code>games</code> or <code>pitchers</code>: Main data arrays</li>
    </ul>

    <h2>⚡ Rate Limiting</h2>
    <p>No rate limiting on these endpoints. Data is cached and served statically.</p>

    <h2>🔗 CORS</h2>
    <p>All endpoints support CORS for browser-based applications.</p>

    <script>
        fetch('./api/v1/summary.json')
            .then(response => response.json())
            .then(data => {
                document.getElementById('lastUpdated').textContent = data.metadata.generated_at_formatted;
            })
            .catch(() => {
                document.getElementById('lastUpdated').textContent = 'Unable to fetch';
            });
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::build_feed;
    use crate::services::odds_client::{Event, EventOdds};
    use chrono::TimeZone;
    use chrono::Utc;

    fn sample_feed() -> PropsFeed {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "commence_time": "2025-06-03T23:05:00Z",
            "home_team": "New York Yankees",
            "away_team": "Cleveland Guardians",
        }))
        .unwrap();
        let odds: EventOdds = serde_json::from_value(serde_json::json!({
            "bookmakers": [
                {
                    "title": "DraftKings",
                    "markets": [{
                        "key": "pitcher_strikeouts",
                        "outcomes": [
                            {"name": "Over", "description": "Gerrit Cole", "price": -134, "point": 5.5},
                            {"name": "Under", "description": "Gerrit Cole", "price": 102, "point": 5.5},
                        ]
                    }]
                }
            ]
        }))
        .unwrap();
        let no_props: Event = serde_json::from_value(serde_json::json!({
            "id": "e2",
            "commence_time": "2025-06-04T00:10:00Z",
            "home_team": "Boston Red Sox",
            "away_team": "Tampa Bay Rays",
        }))
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 3, 18, 0, 0).unwrap();
        build_feed(&[(event, Some(odds)), (no_props, None)], now)
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "strikeout_center_test_{}_{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_publish_writes_all_endpoints() {
        let feed = sample_feed();
        let dir = temp_dir();

        let written = publish(&feed, &dir).unwrap();
        assert_eq!(written.len(), 7);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }

        // The full feed round-trips through the file.
        let raw = fs::read_to_string(dir.join("api/v1").join(FULL_FEED_FILE)).unwrap();
        let reloaded: PropsFeed = serde_json::from_str(&raw).unwrap();
        assert_eq!(reloaded.summary.total_games, 2);
        assert_eq!(reloaded.games.len(), reloaded.summary.total_games);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_summary_feed_counts() {
        let summary = build_summary_feed(&sample_feed());
        assert_eq!(summary.games.len(), 2);
        assert_eq!(summary.games[0].pitcher_count, 1);
        assert_eq!(summary.games[1].pitcher_count, 0);
    }

    #[test]
    fn test_pitchers_feed_flattens_with_game_info() {
        let pitchers = build_pitchers_feed(&sample_feed());
        assert_eq!(pitchers.pitchers.len(), 1);
        let entry = &pitchers.pitchers[0];
        assert_eq!(entry.props.pitcher_name, "Gerrit Cole");
        assert_eq!(entry.game_info.matchup, "Cleveland Guardians @ New York Yankees");

        // Flattened serialization keeps the pitcher fields at the top level.
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["pitcher_name"], "Gerrit Cole");
        assert!(json["game_info"].is_object());
    }

    #[test]
    fn test_best_odds_sorted_descending() {
        let best = build_best_odds_feed(&sample_feed());
        assert_eq!(best.best_overs.len(), 1);
        assert_eq!(best.best_overs[0].odds, -134);
        assert_eq!(best.best_unders[0].odds, 102);
        assert_eq!(best.best_unders[0].odds_formatted, "+102");
    }

    #[test]
    fn test_default_export_name_uses_feed_date() {
        let feed = sample_feed();
        assert_eq!(default_export_name(&feed), "mlb_strikeout_props_2025-06-03.json");
    }

    #[test]
    fn test_readme_carries_stats() {
        let readme = render_readme(&sample_feed());
        assert!(readme.contains("Total Games: 2"));
        assert!(readme.contains("Games with Props: 1"));
    }
}
