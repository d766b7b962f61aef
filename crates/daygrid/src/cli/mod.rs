//! # CLI Behavior
//!
//! This is **one possible UI client** for daygrid, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Naked Execution (`daygrid`)
//!
//! Running `daygrid` with no arguments draws the current year's grid, the
//! same as `daygrid list --year <this year>`.
//!
//! ## Picking Days
//!
//! `write`, `show` and `delete` act on today unless given `--day 2024-41`
//! (a day key) or `--date 2024-02-11` (a calendar date).
//!
//! ## Choosing a Directory
//!
//! `storage migrate` and `storage change` take `--dir <path>`. Without it the
//! user is prompted; an empty answer cancels and nothing changes.
//!
//! ## When the Directory Goes Away
//!
//! If the journal directory was deleted or access was revoked, entries keep
//! going to local storage and every command prints a hint pointing at
//! `storage change` and `storage local`.

mod commands;
mod picker;
mod render;
mod setup;

pub use commands::run;
