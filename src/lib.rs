//! Scorekeeping ledger for per-round wagers across a fixed row of numbered
//! cards.
//!
//! Operators record entries with short commands (`<order>:<amount>[:<side>[:<label>]]`)
//! and settle a round by declaring the winning side. The [`engine::Engine`]
//! is stateless: each operation takes a [`ledger::Ledger`] and returns a new
//! one together with the [`events::Event`]s it produced. [`session::Session`]
//! owns the current value and keeps a [`store::SnapshotStore`] in step.

pub mod accounts;
pub mod commands;
pub mod console;
pub mod engine;
pub mod entries;
pub mod events;
pub mod ledger;
pub mod session;
pub mod settlement;
pub mod snapshot;
pub mod statement;
pub mod store;
