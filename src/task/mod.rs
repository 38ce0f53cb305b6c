//! Task commands

mod add;
mod delete;
mod get;
mod mv;
mod rename;
mod search;
mod track;
mod update;

pub use add::CreateTask;
pub use delete::DeleteTask;
pub use get::GetTask;
pub use mv::MoveTask;
pub use rename::RenameTask;
pub use search::{FoundTask, SearchResults, SearchTasks};
pub use track::TrackTask;
pub use update::UpdateTask;
