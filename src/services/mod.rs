//! Collaborators the schema builder calls out to, expressed as traits so a
//! compiler can supply its own (thread-safe or per-compile) implementations.

pub mod config;
pub mod storage;

pub use config::{
    operator_schema_key, ConfigError, ConfigurationManager, EngineConfig, NamingConventions,
};
pub use storage::{GridStorage, StorageManager};
