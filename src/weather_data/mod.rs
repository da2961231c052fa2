pub mod chunks;
pub mod daily_table;
pub mod error;
pub mod fetcher;
