pub mod check;
pub mod common;
pub mod list;
pub mod resolve;
pub mod show;
