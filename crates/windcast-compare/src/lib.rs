//! Disagreement between two configurations' projected allocations.
//!
//! Every cell without a pre-existing facility falls in one bucket per
//! configuration: not converted, or converted at step `k`. Cross
//! tabulating the null configuration against a target configuration
//! gives a [`DisagreementTable`], from which [`compare_configurations`]
//! derives quantity disagreement (Q), its cross-check (Q*), allocation
//! disagreement (A) and the combined QADI index.
//!
//! # Example
//!
//! ```
//! use windcast_compare::compare_configurations;
//! use windcast_core::{CellClassification, CellId, ConversionState, StepIndex};
//!
//! let cell = |id, state| CellClassification { id: CellId(id), state, cluster: None };
//! let null = vec![
//!     cell(0, ConversionState::Converted(StepIndex(1))),
//!     cell(1, ConversionState::NeverConverted),
//! ];
//! let report = compare_configurations(&null, &null, 6).unwrap();
//! assert_eq!(report.quantity, 0);
//! assert_eq!(report.allocation, 0);
//! assert_eq!(report.qadi, 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod qadi;
pub mod table;

pub use error::CompareError;
pub use qadi::{compare_configurations, DisagreementReport};
pub use table::{Bucket, DisagreementTable};
