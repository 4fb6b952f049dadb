pub mod eta;
pub mod feed;

pub use eta::{EtaSession, QueryToken};
pub use feed::FeedState;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared store for the vehicle feed state
pub type FeedStore = Arc<RwLock<FeedState>>;

/// Shared store for the ETA session state
pub type EtaStore = Arc<RwLock<EtaSession>>;
