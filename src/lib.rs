//! # Doc Checker
//!
//! Detect contradictions across a small batch of policy documents, bill the
//! analysis, and keep generated reports.
//!
//! The lifecycle controller and its data model live in
//! [`doc_checker_core`]. This crate is the native host around it: it reads
//! configuration, talks to an external analysis service over HTTP, persists
//! reports to disk, and prints lifecycle events to the terminal.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────────────┐   ┌──────────────┐
//! │  intake    │──▶│ AnalysisController  │──▶│ FileReport   │
//! │ files/demo │   │ (doc-checker-core)  │   │ Store (JSON) │
//! └────────────┘   └──────────┬──────────┘   └──────────────┘
//!                             │
//!               ┌─────────────┼──────────────┐
//!               ▼             ▼              ▼
//!         ┌──────────┐  ┌───────────┐  ┌──────────┐
//!         │ Mock /   │  │ observers │  │  render  │
//!         │ HTTP src │  │ (stderr)  │  │ (stdout) │
//!         └──────────┘  └───────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`delegate`] | HTTP analysis source and source selection |
//! | [`store_file`] | File-backed report store |
//! | [`observer`] | Terminal lifecycle observers |
//! | [`intake`] | Reading upload candidates from disk |
//! | [`render`] | Text, Markdown, and JSON output |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod delegate;
pub mod intake;
pub mod observer;
pub mod render;
pub mod store_file;

pub use doc_checker_core;
