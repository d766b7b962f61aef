//! # daygrid
//!
//! A journal of one short note per day, drawn as a grid of 365 dots per year.
//! This crate is the UI-agnostic core: where entries live, how they move
//! between stores, and how they are backed up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI client (the `daygrid` CLI, or anything else)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves day references to day keys                      │
//! │  - Dispatches to command modules                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*)                                 │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/*)                                    │
//! │  - Selector: one active store, access-loss fallback         │
//! │  - Ephemeral store (local key/value area)                   │
//! │  - Durable store (journal.json in a user-picked directory)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and single-threaded. Interior mutability
//! uses `RefCell`, so the stores are not `Sync`.
//!
//! ## Logging
//!
//! The library only emits [`tracing`] events; installing a subscriber is up to
//! the binary. Routine decisions log at `debug`, migrations at `info`,
//! fallbacks and access loss at `warn`, swallowed failures at `error`.

pub mod api;
pub mod backup;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod settings;
pub mod store;
