pub mod project;
pub mod stage;
pub mod task;

pub use project::*;
pub use stage::*;
pub use task::*;
