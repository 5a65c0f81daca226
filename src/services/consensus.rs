//! Consensus odds computation.
//!
//! American odds are not linear in probability, so averaging the raw odds
//! across books is wrong. Each quote is converted to its implied probability,
//! the probabilities are averaged, and the mean is re-encoded as American odds.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::error::OddsError;
use crate::models::{ConsensusResult, LineKey, OddsQuote, PitcherPropSet, Side};

/// Implied probability of one American odds quote.
///
/// Zero odds encode no price and are rejected.
pub fn american_to_probability(odds: i32) -> Result<f64, OddsError> {
    if odds == 0 {
        return Err(OddsError::InvalidOdds(odds));
    }
    let prob = if odds > 0 {
        100.0 / (odds as f64 + 100.0)
    } else {
        let stake = -odds as f64;
        stake / (stake + 100.0)
    };
    Ok(prob)
}

/// Re-encode a probability as American odds, rounded to the nearest integer.
///
/// Favorites (p > 0.5) come out negative; p <= 0.5 comes out positive, so an
/// even-money price is expressed as +100.
pub fn probability_to_american(prob: f64) -> Result<i32, OddsError> {
    if !(prob > 0.0 && prob < 1.0) {
        return Err(OddsError::InvalidProbability(prob));
    }
    let odds = if prob > 0.5 {
        -(prob / (1.0 - prob) * 100.0).round()
    } else {
        ((1.0 - prob) / prob * 100.0).round()
    };
    Ok(odds as i32)
}

/// Consensus American odds for one side of one line.
///
/// The mean of implied probabilities is commutative, so quote order never
/// affects the result. An empty list yields `None`; an absent side is
/// reported as absent, never as a fabricated price. Individual bad quotes
/// are dropped with a warning rather than failing the aggregation.
pub fn consensus_side(odds_list: &[i32]) -> Option<i32> {
    let probs: Vec<f64> = odds_list
        .iter()
        .filter_map(|&odds| match american_to_probability(odds) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("Dropping bad quote: {}", e);
                None
            }
        })
        .collect();

    if probs.is_empty() {
        return None;
    }

    let mean = probs.iter().sum::<f64>() / probs.len() as f64;

    // The mean of probabilities in (0, 1) stays in (0, 1), so re-encoding
    // cannot fail for any input that survived the filter above.
    match probability_to_american(mean) {
        Ok(odds) => Some(odds),
        Err(e) => {
            tracing::error!("Consensus re-encoding failed: {}", e);
            None
        }
    }
}

/// Blend all quotes for one line into a [`ConsensusResult`].
pub fn consensus_for_line(line: f64, quotes: &[OddsQuote]) -> ConsensusResult {
    let over: Vec<i32> = quotes
        .iter()
        .filter(|q| q.side == Side::Over)
        .map(|q| q.american_odds)
        .collect();
    let under: Vec<i32> = quotes
        .iter()
        .filter(|q| q.side == Side::Under)
        .map(|q| q.american_odds)
        .collect();

    ConsensusResult {
        line,
        over_odds: consensus_side(&over),
        under_odds: consensus_side(&under),
        contributing_book_count: both_sided_book_count(quotes),
    }
}

/// Number of distinct books that quoted both the over and the under.
fn both_sided_book_count(quotes: &[OddsQuote]) -> usize {
    let books_on = |side: Side| -> BTreeSet<&str> {
        quotes
            .iter()
            .filter(|q| q.side == side)
            .map(|q| q.book_name.as_str())
            .collect()
    };
    books_on(Side::Over)
        .intersection(&books_on(Side::Under))
        .count()
}

/// Number of distinct books quoting either side of a line.
pub fn distinct_book_count(quotes: &[OddsQuote]) -> usize {
    quotes
        .iter()
        .map(|q| q.book_name.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Pick the primary line for a pitcher: the line quoted by the most distinct
/// books, ties broken by the lower numeric line. `None` when no line has any
/// quotes.
pub fn primary_line(set: &PitcherPropSet) -> Option<LineKey> {
    set.quotes_by_line
        .iter()
        .filter(|(_, quotes)| !quotes.is_empty())
        .max_by_key(|(key, quotes)| (distinct_book_count(quotes), Reverse(**key)))
        .map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(book: &str, side: Side, odds: i32, line: f64) -> OddsQuote {
        OddsQuote {
            book_name: book.to_string(),
            side,
            american_odds: odds,
            line,
        }
    }

    #[test]
    fn test_implied_probability_favorite() {
        let p = american_to_probability(-134).unwrap();
        assert!((p - 0.5726).abs() < 0.001);
    }

    #[test]
    fn test_implied_probability_underdog() {
        let p = american_to_probability(102).unwrap();
        assert!((p - 0.4950).abs() < 0.001);
    }

    #[test]
    fn test_zero_odds_rejected() {
        assert_eq!(american_to_probability(0), Err(OddsError::InvalidOdds(0)));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        for p in [0.0, 1.0, -0.2, 1.5] {
            assert!(matches!(
                probability_to_american(p),
                Err(OddsError::InvalidProbability(_))
            ));
        }
    }

    #[test]
    fn test_even_money_encodes_positive() {
        assert_eq!(probability_to_american(0.5).unwrap(), 100);
    }

    #[test]
    fn test_round_trip_within_one() {
        // -100 is skipped: it encodes the same even-money price as +100 and
        // re-encodes to the positive form.
        let mut odds: Vec<i32> = (100..=400).collect();
        odds.extend(-400..=-101);
        for o in odds {
            let p = american_to_probability(o).unwrap();
            let back = probability_to_american(p).unwrap();
            assert!((back - o).abs() <= 1, "round trip {} -> {}", o, back);
        }
    }

    #[test]
    fn test_consensus_worked_example() {
        // Three books quote the over at -134, -130, -135:
        // implied ≈ (0.5726, 0.5652, 0.5745), mean ≈ 0.5708 → -133.
        assert_eq!(consensus_side(&[-134, -130, -135]), Some(-133));
    }

    #[test]
    fn test_consensus_order_invariant() {
        let a = consensus_side(&[-134, -130, -135, 102, -110]);
        let b = consensus_side(&[102, -135, -110, -134, -130]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_side_is_absent() {
        assert_eq!(consensus_side(&[]), None);
    }

    #[test]
    fn test_single_quote_is_valid_consensus() {
        // No minimum book threshold: one quote is its own consensus.
        assert_eq!(consensus_side(&[-120]), Some(-120));
    }

    #[test]
    fn test_bad_quote_dropped_not_fatal() {
        assert_eq!(consensus_side(&[0, -120]), Some(-120));
        assert_eq!(consensus_side(&[0]), None);
    }

    #[test]
    fn test_consensus_for_line_counts_both_sided_books() {
        let quotes = vec![
            quote("DraftKings", Side::Over, -134, 5.5),
            quote("DraftKings", Side::Under, 102, 5.5),
            quote("FanDuel", Side::Over, -130, 5.5),
            quote("FanDuel", Side::Under, 101, 5.5),
            // BetMGM posts only an over: feeds that side's mean but is not a
            // both-sided contributor.
            quote("BetMGM", Side::Over, -135, 5.5),
        ];
        let result = consensus_for_line(5.5, &quotes);
        assert_eq!(result.line, 5.5);
        assert_eq!(result.over_odds, Some(-133));
        assert_eq!(result.contributing_book_count, 2);
        assert_eq!(distinct_book_count(&quotes), 3);
    }

    #[test]
    fn test_primary_line_most_books_wins() {
        let mut set = PitcherPropSet::new("Tarik Skubal");
        set.push(quote("DraftKings", Side::Over, -180, 4.5));
        for book in ["DraftKings", "FanDuel", "BetMGM", "Caesars"] {
            set.push(quote(book, Side::Over, -120, 5.5));
        }
        assert_eq!(primary_line(&set), Some(LineKey::from_f64(5.5)));
    }

    #[test]
    fn test_primary_line_tie_takes_lower() {
        let mut set = PitcherPropSet::new("Logan Webb");
        for book in ["DraftKings", "FanDuel"] {
            set.push(quote(book, Side::Over, -110, 6.5));
            set.push(quote(book, Side::Over, -115, 5.5));
        }
        assert_eq!(primary_line(&set), Some(LineKey::from_f64(5.5)));
    }

    #[test]
    fn test_primary_line_empty_set() {
        let set = PitcherPropSet::new("Nobody");
        assert_eq!(primary_line(&set), None);
    }

    #[test]
    fn test_primary_line_deterministic() {
        let mut set = PitcherPropSet::new("Zack Wheeler");
        set.push(quote("FanDuel", Side::Over, -105, 6.5));
        set.push(quote("DraftKings", Side::Under, -105, 7.5));
        let first = primary_line(&set);
        for _ in 0..10 {
            assert_eq!(primary_line(&set), first);
        }
    }
}
