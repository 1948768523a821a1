//! # Doc Checker Core
//!
//! Shared, WASM-safe logic for Doc Checker: the document batch, the
//! analysis lifecycle state machine, usage billing, the report store
//! abstraction, and the analysis source abstraction.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. It compiles to both native targets and
//! `wasm32-unknown-unknown`, so the same controller can back a browser
//! front end or the native `doc-checker` CLI.
//!
//! ## Lifecycle
//!
//! ```text
//!   add/remove/clear            start_analysis()
//! ┌──────┐ ───────▶ ┌────────────┐ ───────────▶ ┌───────────┐
//! │ Idle │          │ Collecting │              │ Analyzing │
//! └──────┘ ◀─────── └────────────┘ ◀─ failure ─ └─────┬─────┘
//!     ▲                                               │ parse → detect → report-prep
//!     │        reset_for_new_analysis()         ┌─────▼─────┐
//!     └──────────────────────────────────────── │  Results  │ ── generate_report()
//!                                               └───────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Documents, contradictions, results, reports, credits |
//! | [`error`] | Typed lifecycle errors |
//! | [`batch`] | Upload batch with type, size, duplicate, and capacity rules |
//! | [`phase`] | The three analysis sub-phases and their progress |
//! | [`lifecycle`] | [`AnalysisController`](lifecycle::AnalysisController) state machine |
//! | [`source`] | Analysis source trait and the mock source |
//! | [`store`] | Report store trait and the in-memory store |
//! | [`observer`] | Lifecycle events and observer trait |
//! | [`clock`] | Injectable time source |
//! | [`alerts`] | Pathway alert feed |
//! | [`display`] | File size and icon helpers for presentation layers |

pub mod alerts;
pub mod batch;
pub mod clock;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod observer;
pub mod phase;
pub mod source;
pub mod store;

pub use error::LifecycleError;
pub use lifecycle::{AnalysisController, ControllerConfig, LifecycleState};
