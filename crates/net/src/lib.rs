//! Hangout Network Library
//!
//! Wire contract of the hangouts service.
//!
//! # Architecture
//!
//! - **API**: `HangoutApi` REST calls, implemented over HTTP by `HttpApi`
//! - **Failures**: error responses classified into `FailureKind`
//! - **Signal feed**: length-prefixed JSON frames over TCP carrying
//!   stage and membership changes
//!
//! # Usage
//!
//! ```ignore
//! let api = HttpApi::new("http://localhost:5000/api", Duration::from_secs(10))?;
//! let details = api.hangout_details("h1").await?;
//!
//! let mut feed = SignalFeed::subscribe("127.0.0.1:5001", "h1", member_id).await?;
//! while let Some(FeedEvent::Signal(signal)) = feed.next_event().await {
//!     // apply to the session
//! }
//! ```

pub mod api;
pub mod dto;
pub mod error;
pub mod failure;
pub mod feed;
mod frame;
pub mod http;
pub mod protocol;

pub use api::{HangoutApi, MarkAction};
pub use error::{Error, Result};
pub use failure::{ApiFailure, ConflictStage, FailureKind, FieldRef};
pub use feed::{FeedEvent, SignalFeed};
pub use http::HttpApi;
pub use protocol::{FeedMessage, Signal};
