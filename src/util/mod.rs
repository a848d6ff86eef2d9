pub mod progress;
pub mod time;
pub mod unicode;
