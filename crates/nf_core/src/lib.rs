pub mod error;
pub mod network;
pub mod preferences;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use network::ConnectivityProbe;
pub use preferences::PreferenceKey;
pub use storage::{CacheStore, KeyValueStore, WriteBatch};
pub use types::{Article, Contributor, Section};

pub mod prelude {
    pub use super::{
        Article, CacheStore, ConnectivityProbe, Contributor, Error, KeyValueStore, PreferenceKey,
        Result, Section, WriteBatch,
    };
}
