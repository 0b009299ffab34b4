//! Spatial support for Windcast simulations.
//!
//! This crate defines the [`NeighborSource`] trait, the spatial query a
//! simulation consumes ("which cells lie within distance D of cell C"),
//! along with hexagon geometry helpers and two backends:
//!
//! - [`HexGrid`]: a rectangular patch of pointy-top hexagons in axial
//!   coordinates, for synthetic grids and tests
//! - [`CentroidIndex`]: arbitrary cell centroids bucketed on a uniform
//!   grid, for cells delivered by an external data store
//!
//! # Neighbor tables
//!
//! The simulation never queries a source while stepping. A
//! [`NeighborTable`] is built once per run with a full scan and stores
//! every cell's neighbor positions as flat index lists.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod hexgrid;
pub mod index;
pub mod source;
pub mod table;

pub use error::SpaceError;
pub use geometry::{HexGeometry, RingCount};
pub use hexgrid::HexGrid;
pub use index::CentroidIndex;
pub use source::NeighborSource;
pub use table::{NeighborTable, ScanProgress};
