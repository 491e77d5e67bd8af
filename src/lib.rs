// arrcal
// Pulls Sonarr/Radarr ICS release feeds through a same-origin proxy,
// merges their events into one in-memory calendar, and exposes the
// normalized event set plus title heuristics for display.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http_config;
pub mod ingest;
pub mod models;
pub mod refresh;
pub mod titles;
pub mod utils;

// Re-export commonly used types
pub use error::{CalendarError, CalendarResult};
pub use gateway::{FeedGateway, ProxyGateway};
pub use ingest::CalendarIngest;
pub use models::{FeedDescriptor, NormalizedEvent, RefreshSummary};
pub use refresh::run_refresh_cycle;
pub use titles::{parse_display_title, parse_episode_details, DisplayEvent, EpisodeDetails};
