//! Terminal UI for Parley
//!
//! A thin shell over the pure [`parley_app::App`] state machine: crossterm
//! feeds keystrokes in, [`parley_client`] feeds transport events in, and
//! ratatui paints whatever the transcript says. All behavior decisions
//! live in `parley-app`; this crate only does I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod runtime;
pub mod ui;

pub use runtime::{Runtime, RuntimeError};
