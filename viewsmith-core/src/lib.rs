// viewsmith-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// Ports: what the core needs from an engine and its catalog.
pub mod ports;

// Domain: deployment configs, view definitions, results. No I/O.
pub mod domain;

// Infrastructure: config files, Athena, Glue, filesystem.
pub mod infrastructure;

// Application: deploy, batch, plan.
pub mod application;

pub mod error;

pub use error::ViewsmithError;
