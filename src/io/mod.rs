pub mod config_io;
pub mod lock;
pub mod logging;
pub mod store;
pub mod watcher;
