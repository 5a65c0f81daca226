use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::config::OddsApiConfig;
use crate::export;
use crate::models::PropsFeed;
use crate::services::odds_client::{Event, EventOdds};
use crate::services::{build_feed, OddsApiClient};
use crate::utils;

fn load_config() -> Result<OddsApiConfig> {
    match OddsApiConfig::from_env() {
        Ok(config) => Ok(config),
        Err(e) => {
            println!("❌ Error: {}", e);
            println!("Please set your API key: export THE_ODDS_API_KEY='your-api-key-here'");
            Err(e.into())
        }
    }
}

/// One full fetch cycle: today's games, then strikeout odds per game,
/// serialized one request at a time.
async fn collect_feed() -> Result<PropsFeed> {
    let client = OddsApiClient::new(load_config()?);
    let (from, to) = utils::eastern_day_window(Utc::now());

    println!("📡 Fetching today's MLB games from The Odds API...");
    let events = client.fetch_events(from, to).await?;

    if events.is_empty() {
        println!("⚠️  No MLB games found for today (normal during the off-season)");
        return Ok(build_feed(&[], Utc::now()));
    }

    println!("📅 Found {} MLB games for today", events.len());
    println!("🔍 Checking for pitcher strikeout props...");

    let mut games: Vec<(Event, Option<EventOdds>)> = Vec::with_capacity(events.len());
    for event in events {
        let odds = client.fetch_event_odds(&event.id).await?;
        let matchup = format!("{} @ {}", event.away_team, event.home_team);
        match &odds {
            Some(_) => println!("  ✅ {}: strikeout props found", matchup),
            None => println!("  ⚠️  {}: no pitcher strikeouts available", matchup),
        }
        games.push((event, odds));
    }

    Ok(build_feed(&games, Utc::now()))
}

/// `export` subcommand: single JSON file or stdout.
pub async fn export_feed(output: Option<String>, to_stdout: bool, pretty: bool) -> Result<()> {
    let feed = collect_feed().await?;

    if to_stdout {
        println!("{}", export::feed_to_json(&feed)?);
        return Ok(());
    }

    let filename = output.unwrap_or_else(|| export::default_export_name(&feed));
    export::write_feed_file(&feed, Path::new(&filename))?;
    println!("✅ JSON feed exported to: {}", filename);

    if pretty {
        println!();
        println!("📊 Summary:");
        println!("   • Total Games: {}", feed.summary.total_games);
        println!("   • Games with Props: {}", feed.summary.games_with_props);
        println!("   • Total Pitchers: {}", feed.summary.total_pitchers);
        println!("   • Generated: {}", feed.metadata.generated_at_formatted);
    }

    Ok(())
}

/// `publish` subcommand: regenerate the static public directory.
pub async fn publish_feed(dir: &str) -> Result<()> {
    println!("🔄 Updating MLB Strikeout Props Public Feed...");

    let feed = collect_feed().await?;

    if feed.summary.total_games == 0 {
        // Still publish: an empty day gets well-formed zero-count files.
        println!("⚠️  Publishing empty feed for a day with no games");
    }

    println!("📁 Generating API endpoints...");
    export::publish(&feed, Path::new(dir))?;

    println!("✅ Public feed updated successfully!");
    println!(
        "📊 Generated {} pitchers across {} games",
        feed.summary.total_pitchers, feed.summary.total_games
    );
    println!("📁 Files created in: {}/", dir);

    Ok(())
}

/// `summary` subcommand: console view of each game's primary-line consensus.
pub async fn print_summary() -> Result<()> {
    let today = utils::to_eastern(Utc::now());
    println!("🎯 MLB Strikeout Props - Today's Starting Pitchers");
    println!("{}", "=".repeat(60));
    println!("Date: {}", today.format("%A, %B %d, %Y"));
    println!();

    let feed = collect_feed().await?;
    let with_props: Vec<_> = feed.games.iter().filter(|g| !g.pitchers.is_empty()).collect();

    if with_props.is_empty() {
        println!("❌ No pitcher strikeout props found for any of today's games");
        return Ok(());
    }

    println!();
    println!("📊 STARTING PITCHER STRIKEOUT PROPS");
    println!("{}", "=".repeat(60));
    println!();

    for game in &with_props {
        println!("🏟️  {}", game.matchup);
        println!("    {}", game.game_time_formatted);
        println!("    {}", "-".repeat(50));

        for pitcher in &game.pitchers {
            println!("    👨‍⚾ {}", pitcher.pitcher_name);
            match pitcher.strikeout_line {
                Some(line) => {
                    println!("        Line: {} strikeouts", line);
                    println!(
                        "        Over {}: {}  |  Under {}: {}",
                        line,
                        pitcher.consensus_odds.over_formatted,
                        line,
                        pitcher.consensus_odds.under_formatted
                    );
                    println!("        ({} sportsbooks)", pitcher.sportsbook_count);
                }
                None => println!("        No quoted lines"),
            }
            println!();
        }
        println!();
    }

    println!("{}", "=".repeat(60));
    println!("✅ Total Games: {}", with_props.len());
    println!("✅ Total Starting Pitchers: {}", feed.summary.total_pitchers);
    println!();
    println!("💡 Notes:");
    println!("   • Odds shown are consensus averages from available sportsbooks");
    println!("   • Primary line displayed (most commonly offered across books)");
    println!("   • Data updates throughout the day as games approach");

    Ok(())
}

/// `games` subcommand: timezone debugging view of the slate.
pub async fn debug_games() -> Result<()> {
    let client = OddsApiClient::new(load_config()?);
    let now = Utc::now();
    let (from, to) = utils::eastern_day_window(now);

    println!("🕐 Current time (EST): {}", utils::to_eastern(now).format("%Y-%m-%d %I:%M %p %Z"));
    println!("🌍 Searching from: {}", from.format("%Y-%m-%dT%H:%M:%SZ"));
    println!("🌍 Searching to:   {}", to.format("%Y-%m-%dT%H:%M:%SZ"));
    println!();

    let games = client.fetch_events(from, to).await?;
    println!("📊 Total games found: {}", games.len());
    println!();

    for (i, game) in games.iter().enumerate() {
        let eastern_time = utils::to_eastern(game.commence_time);
        println!("{:2}. {} @ {}", i + 1, game.away_team, game.home_team);
        println!("    UTC: {}", game.commence_time.format("%Y-%m-%d %I:%M %p UTC"));
        println!("    EST: {}", eastern_time.format("%Y-%m-%d %I:%M %p %Z"));
        println!("    Game ID: {}", game.id);
        println!();
    }

    // Broader window to catch games the day filter might be missing.
    println!("🔍 Checking broader timeframe (yesterday to tomorrow)...");
    let broad = client
        .fetch_events(from - Duration::days(1), to + Duration::days(1))
        .await?;
    println!("📊 Total games in 3-day window: {}", broad.len());
    println!();

    let mut by_date: BTreeMap<String, Vec<&Event>> = BTreeMap::new();
    for game in &broad {
        let date_key = utils::to_eastern(game.commence_time).format("%Y-%m-%d").to_string();
        by_date.entry(date_key).or_default().push(game);
    }

    for (date, games_list) in &by_date {
        println!("📅 {}:", date);
        for game in games_list {
            println!(
                "  {} - {} @ {}",
                utils::to_eastern(game.commence_time).format("%I:%M %p"),
                game.away_team,
                game.home_team
            );
        }
        println!();
    }

    Ok(())
}
