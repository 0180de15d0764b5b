//! Plugin core for the design-canvas barcode generator.
//!
//! The surrounding host shell (window, settings UI, selection events)
//! talks to this crate through two channels: inbound [`session::HostEvent`]s
//! and outbound [`messages::UiEvent`]s. Everything between those two —
//! credential handling, the remote render call, node construction and
//! container layout — lives here.

pub mod bootstrap;
pub mod config;
pub mod generate;
pub mod messages;
pub mod notify;
pub mod selection;
pub mod session;

pub use generate::{GenerateError, GenerateRequest, Placement};
pub use messages::{NoticeEvent, StateEvent, UiBridge, UiEvent, UiRequest};
pub use session::{HostEvent, Session};
