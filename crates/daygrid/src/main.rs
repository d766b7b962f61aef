//! # Daygrid CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/daygridapp/`: core library: entries, storage selection, backups
//! - `crates/daygrid/`: this CLI tool, depends on the library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/daygrid/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - logging, context wiring, dispatch (commands.rs)          │
//! │  - terminal rendering with console (render.rs)              │
//! │  - interactive directory prompt (picker.rs)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/daygridapp/src/api.rs)                   │
//! │  - Resolves `--day` / `--date` into day keys                │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (crates/daygridapp/src/store/*)                    │
//! │  - local storage or a user-picked directory                 │
//! │  - falls back to local storage when the directory vanishes  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. This crate owns argument
//! parsing, prompting, rendering, logging setup and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to the code with in-memory backends.
//! - **CLI**: end-to-end tests in `tests/` run the real binary against a
//!   temporary data directory (`DAYGRID_DATA`).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
