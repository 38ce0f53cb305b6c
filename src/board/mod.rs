//! Board-level commands

mod burndown;
mod init;
mod status;

pub use burndown::{BurndownData, BurndownPoint, BurndownReport};
pub use init::InitBoard;
pub use status::{BoardStatus, ColumnStatus, StatusReport};
