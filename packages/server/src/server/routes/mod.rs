// HTTP routes
pub mod health;
pub mod jobs;
pub mod tasks;

pub use health::*;
pub use jobs::*;
pub use tasks::*;
