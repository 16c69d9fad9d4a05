// Read-side views of the remote Odoo records acted on during a run

pub mod project;
pub mod stage;
pub mod task;

pub use project::*;
pub use stage::*;
pub use task::*;
