pub mod dispatch;
pub mod types;
