//! Persistence for Windcast run artifacts.
//!
//! An [`ArtifactStore`] keeps the evolved coefficient table and final
//! cell classification of each run, keyed by study area, resolution
//! and predictor configuration, plus the constraint and neighborhood
//! settings used for each (study area, resolution) pair.
//!
//! Two backends are provided: [`MemoryStore`] for tests and
//! single-process use, and [`JsonDirStore`] for durable storage as a
//! directory of JSON files.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod json;
pub mod key;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use json::JsonDirStore;
pub use key::RunKey;
pub use memory::MemoryStore;
pub use store::ArtifactStore;
