//! Assembles the typed props feed from fetched events and odds.
//!
//! Pure with respect to its inputs: given the same events, odds, and clock,
//! the output is byte-for-byte identical. Games without props stay in the
//! feed with an empty pitcher list so consumers can tell "no props yet" from
//! "no such game".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{
    BookOdds, ConsensusOdds, FeedMetadata, FeedSummary, GameProps, OddsQuote, PitcherProps,
    PitcherPropSet, PropsFeed, RawOdds, Side,
};
use crate::services::consensus;
use crate::services::odds_client::{Event, EventOdds};
use crate::utils;

/// The market key carrying pitcher strikeout props.
const STRIKEOUT_MARKET: &str = "pitcher_strikeouts";

/// Build the full feed from one fetch cycle.
pub fn build_feed(games: &[(Event, Option<EventOdds>)], now: DateTime<Utc>) -> PropsFeed {
    let mut ordered: Vec<&(Event, Option<EventOdds>)> = games.iter().collect();
    ordered.sort_by_key(|pair| pair.0.commence_time);

    let game_props: Vec<GameProps> = ordered
        .iter()
        .map(|pair| build_game(&pair.0, pair.1.as_ref()))
        .collect();

    let total_pitchers = game_props.iter().map(|g| g.pitchers.len()).sum();
    let games_with_props = game_props.iter().filter(|g| !g.pitchers.is_empty()).count();

    PropsFeed {
        metadata: build_metadata(now),
        summary: FeedSummary {
            total_games: game_props.len(),
            total_pitchers,
            games_with_props,
        },
        games: game_props,
    }
}

pub fn build_metadata(now: DateTime<Utc>) -> FeedMetadata {
    let eastern_now = utils::to_eastern(now);
    FeedMetadata {
        generated_at: eastern_now.to_rfc3339(),
        generated_at_formatted: utils::format_generated_at(eastern_now),
        date: eastern_now.format("%Y-%m-%d").to_string(),
        timezone: utils::FEED_TIMEZONE.to_string(),
    }
}

/// One game's entry. `odds: None` (market not offered) yields an empty
/// pitcher list, never a dropped game.
pub fn build_game(event: &Event, odds: Option<&EventOdds>) -> GameProps {
    let game_time = utils::to_eastern(event.commence_time);

    let mut pitchers: Vec<PitcherProps> = odds
        .map(collect_prop_sets)
        .unwrap_or_default()
        .into_values()
        .map(|set| build_pitcher_props(&set))
        .collect();
    pitchers.sort_by(|a, b| a.pitcher_name.cmp(&b.pitcher_name));

    GameProps {
        event_id: event.id.clone(),
        away_team: event.away_team.clone(),
        home_team: event.home_team.clone(),
        matchup: format!("{} @ {}", event.away_team, event.home_team),
        game_time: game_time.to_rfc3339(),
        game_time_formatted: utils::format_game_time(game_time),
        pitchers,
    }
}

/// Group every bookmaker outcome into per-pitcher quote sets.
///
/// Outcomes missing a pitcher name, line, or price are skipped; zero-odds
/// quotes are dropped with a warning (a single book's bad quote never aborts
/// the run).
fn collect_prop_sets(odds: &EventOdds) -> BTreeMap<String, PitcherPropSet> {
    let mut sets: BTreeMap<String, PitcherPropSet> = BTreeMap::new();

    for bookmaker in &odds.bookmakers {
        for market in &bookmaker.markets {
            if market.key != STRIKEOUT_MARKET {
                continue;
            }
            for outcome in &market.outcomes {
                let (Some(pitcher), Some(line), Some(price)) =
                    (&outcome.description, outcome.point, outcome.price)
                else {
                    tracing::debug!(
                        book = %bookmaker.title,
                        "Skipping incomplete outcome"
                    );
                    continue;
                };

                let side = match outcome.name.as_str() {
                    "Over" => Side::Over,
                    "Under" => Side::Under,
                    other => {
                        tracing::debug!("Skipping unknown outcome side '{}'", other);
                        continue;
                    }
                };

                let american_odds = price.round() as i32;
                if american_odds == 0 {
                    tracing::warn!(
                        book = %bookmaker.title,
                        pitcher = %pitcher,
                        "Dropping zero-odds quote"
                    );
                    continue;
                }

                sets.entry(pitcher.clone())
                    .or_insert_with(|| PitcherPropSet::new(pitcher.clone()))
                    .push(OddsQuote {
                        book_name: bookmaker.title.clone(),
                        side,
                        american_odds,
                        line,
                    });
            }
        }
    }

    sets
}

/// Consensus record for one pitcher at their primary line.
fn build_pitcher_props(set: &PitcherPropSet) -> PitcherProps {
    let Some(line_key) = consensus::primary_line(set) else {
        // No quoted line at all: emit the pitcher with empty props rather
        // than dropping them.
        return PitcherProps {
            pitcher_name: set.pitcher_name.clone(),
            strikeout_line: None,
            consensus_odds: ConsensusOdds {
                over: None,
                under: None,
                over_formatted: utils::format_odds(None),
                under_formatted: utils::format_odds(None),
            },
            sportsbooks: Vec::new(),
            sportsbook_count: 0,
            individual_odds: BTreeMap::new(),
            raw_odds: RawOdds::default(),
        };
    };

    let quotes = set
        .quotes_by_line
        .get(&line_key)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let result = consensus::consensus_for_line(line_key.as_f64(), quotes);

    let mut sportsbooks: Vec<String> = Vec::new();
    let mut individual_odds: BTreeMap<String, BookOdds> = BTreeMap::new();
    let mut raw_odds = RawOdds::default();

    for quote in quotes {
        if !sportsbooks.contains(&quote.book_name) {
            sportsbooks.push(quote.book_name.clone());
        }
        let entry = individual_odds.entry(quote.book_name.clone()).or_default();
        match quote.side {
            Side::Over => {
                entry.over = Some(quote.american_odds);
                raw_odds.over_odds.push(quote.american_odds);
            }
            Side::Under => {
                entry.under = Some(quote.american_odds);
                raw_odds.under_odds.push(quote.american_odds);
            }
        }
    }
    sportsbooks.sort();

    PitcherProps {
        pitcher_name: set.pitcher_name.clone(),
        strikeout_line: Some(result.line),
        consensus_odds: ConsensusOdds {
            over: result.over_odds,
            under: result.under_odds,
            over_formatted: utils::format_odds(result.over_odds),
            under_formatted: utils::format_odds(result.under_odds),
        },
        sportsbook_count: sportsbooks.len(),
        sportsbooks,
        individual_odds,
        raw_odds,
    }
}
