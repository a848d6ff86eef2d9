pub mod config;
pub mod data;
pub mod log;
pub mod stack;
pub mod stash;
pub mod task;

pub use config::*;
pub use data::*;
pub use log::*;
pub use stack::*;
pub use stash::*;
pub use task::*;

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
