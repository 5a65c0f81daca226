pub mod consensus;
pub mod feed_builder;
pub mod odds_client;

pub use feed_builder::build_feed;
pub use odds_client::OddsApiClient;
