//! Hangout client application layer
//!
//! Connects a [`hangout_core::HangoutSession`] to the hangouts service:
//! the [`HangoutController`] runs member actions against the API and
//! applies feed signals, and [`Notice`]s carry what the member should see.

pub mod controller;
pub mod convert;
pub mod error;
pub mod notice;

pub use controller::{HangoutController, Outcome};
pub use error::{AppError, Result};
pub use notice::{Notice, NoticeLevel};
