//! Hangout Core Library
//!
//! Stage progression, suggestion and vote bookkeeping, validation and the
//! conclusion tally for the hangouts client.

pub mod availability;
pub mod conclusion;
pub mod config;
pub mod edits;
pub mod error;
pub mod in_flight;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod registry;
pub mod session;
pub mod stage;
pub mod storage;
pub mod temporal;
pub mod validation;

pub use availability::AvailabilityBook;
pub use conclusion::{resolve, ConclusionResult};
pub use config::{ClientConfig, Limits, ServerSettings};
pub use edits::{classify, EditClass};
pub use error::{Error, Result};
pub use in_flight::{InFlightGuard, InFlightTracker, RequestKind};
pub use models::*;
pub use permissions::*;
pub use registry::{
    RemovalPath, SortMode, SuggestionFilter, SuggestionRegistry, SuggestionsSnapshot, Toggle,
};
pub use session::{EventEffect, HangoutEvent, HangoutSession, SectionTicket};
pub use stage::{StageController, StageTransition};
pub use storage::{Database, SavedSection, SectionStore};
pub use temporal::{ForwardWindow, MonthLayout};
pub use validation::{ValidationError, ValidationField};
