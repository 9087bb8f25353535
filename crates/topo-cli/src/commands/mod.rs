pub mod check;
pub mod comment;
pub mod diff;
pub mod dispatch;
pub mod publish;
pub mod render;
pub mod schema;
pub mod snapshot;
