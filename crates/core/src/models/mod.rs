//! Data models for hangouts

mod hangout;
mod ids;
mod section;
mod slot;
mod suggestion;

pub use hangout::*;
pub use ids::*;
pub use section::*;
pub use slot::*;
pub use suggestion::*;
