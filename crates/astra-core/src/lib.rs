pub mod config;
pub mod error;
pub mod lookup;

pub use config::AstraConfig;
pub use error::{AstraError, Result};
pub use lookup::{EncyclopediaLookup, LookupError, WebTopicLookup};
