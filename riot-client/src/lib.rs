//! Riot match-history API client library
//!
//! Provides the [`MatchHistoryApi`] trait consumed by the sync core, the
//! production [`HttpRiotClient`], and the wire data model: player and match
//! summary records, plus the relational table bundles produced by flattening
//! the remote API's nested match detail and timeline documents.
//!
//! # Example
//!
//! ```no_run
//! use riot_client::{HttpRiotClient, MatchHistoryApi, PlayerLookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpRiotClient::new("euw1", "RGAPI-...".to_string())?;
//!     let lookup = PlayerLookup::Name("RonjaRaumpilot".to_string());
//!     if let Some(player) = client.get_player(&lookup).await? {
//!         println!("Found {} (level {})", player.summoner_name, player.summoner_level);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod flatten;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod traits;
mod types;

pub use error::{ClientError, ClientResult};
pub use http::HttpRiotClient;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockRiotApi};
pub use traits::MatchHistoryApi;
pub use types::{
    CellValue, MatchFilters, MatchSummary, Player, PlayerLookup, QueueType, Row, TableBundle,
    TableData,
};
