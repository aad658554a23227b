pub mod config;
pub mod project;
pub mod section;
pub mod selection;
pub mod task;

pub use config::*;
pub use project::*;
pub use section::*;
pub use selection::*;
pub use task::*;
