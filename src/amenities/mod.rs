pub mod collector;
pub mod error;
pub mod frame;
pub mod query;
