use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Aggregation types ─────────────────────────────────────────────────────────

/// Which side of an over/under proposition a quote prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Over,
    Under,
}

/// One sportsbook's price for one side of one strikeout line.
/// Created per fetch cycle, discarded after aggregation.
#[derive(Debug, Clone)]
pub struct OddsQuote {
    pub book_name: String,
    pub side: Side,
    pub american_odds: i32,
    pub line: f64,
}

/// Strikeout lines are quoted in half-strikeout steps, so a line maps exactly
/// onto tenths. Keying maps by this instead of f64 gives a total order and
/// deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(i64);

impl LineKey {
    pub fn from_f64(line: f64) -> Self {
        Self((line * 10.0).round() as i64)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

/// All quotes collected for one pitcher, grouped by line.
#[derive(Debug, Clone)]
pub struct PitcherPropSet {
    pub pitcher_name: String,
    pub quotes_by_line: BTreeMap<LineKey, Vec<OddsQuote>>,
}

impl PitcherPropSet {
    pub fn new(pitcher_name: impl Into<String>) -> Self {
        Self {
            pitcher_name: pitcher_name.into(),
            quotes_by_line: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, quote: OddsQuote) {
        self.quotes_by_line
            .entry(LineKey::from_f64(quote.line))
            .or_default()
            .push(quote);
    }
}

/// Blended odds for one line. Immutable once computed.
///
/// `contributing_book_count` counts books that supplied BOTH an over and an
/// under price; a book missing one side still feeds the other side's average.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusResult {
    pub line: f64,
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub contributing_book_count: usize,
}

// ── Feed output types ─────────────────────────────────────────────────────────

/// Full strikeout props feed, the primary export payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropsFeed {
    pub metadata: FeedMetadata,
    pub summary: FeedSummary,
    pub games: Vec<GameProps>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMetadata {
    /// ISO-8601 timestamp with offset, Eastern time.
    pub generated_at: String,
    pub generated_at_formatted: String,
    /// YYYY-MM-DD in Eastern time.
    pub date: String,
    /// IANA zone name.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSummary {
    pub total_games: usize,
    pub total_pitchers: usize,
    pub games_with_props: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProps {
    pub event_id: String,
    pub away_team: String,
    pub home_team: String,
    pub matchup: String,
    /// Game start in Eastern time, ISO-8601 with offset.
    pub game_time: String,
    pub game_time_formatted: String,
    /// Empty when no props are posted; the game is still emitted.
    pub pitchers: Vec<PitcherProps>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherProps {
    pub pitcher_name: String,
    /// Primary line, or null when no line has any quotes.
    pub strikeout_line: Option<f64>,
    pub consensus_odds: ConsensusOdds,
    pub sportsbooks: Vec<String>,
    /// Distinct books quoting either side of the primary line.
    pub sportsbook_count: usize,
    pub individual_odds: BTreeMap<String, BookOdds>,
    pub raw_odds: RawOdds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusOdds {
    pub over: Option<i32>,
    pub under: Option<i32>,
    pub over_formatted: String,
    pub under_formatted: String,
}

/// One book's quoted prices for the primary line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookOdds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOdds {
    pub over_odds: Vec<i32>,
    pub under_odds: Vec<i32>,
}

// ── Derived endpoint payloads ─────────────────────────────────────────────────

/// Lightweight summary endpoint with game and pitcher counts, no odds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFeed {
    pub metadata: FeedMetadata,
    pub summary: FeedSummary,
    pub games: Vec<GameSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub event_id: String,
    pub away_team: String,
    pub home_team: String,
    pub matchup: String,
    pub game_time: String,
    pub game_time_formatted: String,
    pub pitcher_count: usize,
}

/// Flat pitcher list with game context, for pitcher-focused lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchersFeed {
    pub metadata: FeedMetadata,
    pub pitchers: Vec<PitcherFeedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherFeedEntry {
    #[serde(flatten)]
    pub props: PitcherProps,
    pub game_info: GameInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInfo {
    pub matchup: String,
    pub game_time: String,
    pub away_team: String,
    pub home_team: String,
}

/// Top consensus prices across the slate, sorted by odds value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestOddsFeed {
    pub metadata: FeedMetadata,
    pub best_overs: Vec<BestOddsEntry>,
    pub best_unders: Vec<BestOddsEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestOddsEntry {
    pub pitcher: String,
    pub game: String,
    pub line: Option<f64>,
    pub odds: i32,
    pub odds_formatted: String,
    pub sportsbook_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_key_round_trip() {
        for line in [0.5, 4.5, 5.5, 6.0, 7.5, 12.5] {
            assert_eq!(LineKey::from_f64(line).as_f64(), line);
        }
    }

    #[test]
    fn test_line_key_orders_numerically() {
        assert!(LineKey::from_f64(4.5) < LineKey::from_f64(5.5));
        assert!(LineKey::from_f64(5.5) < LineKey::from_f64(10.5));
    }

    #[test]
    fn test_prop_set_groups_by_line() {
        let mut set = PitcherPropSet::new("Gerrit Cole");
        for (line, odds) in [(5.5, -134), (5.5, -130), (4.5, -180)] {
            set.push(OddsQuote {
                book_name: "DraftKings".to_string(),
                side: Side::Over,
                american_odds: odds,
                line,
            });
        }
        assert_eq!(set.quotes_by_line.len(), 2);
        assert_eq!(set.quotes_by_line[&LineKey::from_f64(5.5)].len(), 2);
    }

    #[test]
    fn test_book_odds_skips_missing_side() {
        let odds = BookOdds {
            over: Some(-120),
            under: None,
        };
        let json = serde_json::to_string(&odds).unwrap();
        assert_eq!(json, r#"{"over":-120}"#);
    }
}
