#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Growable disjoint-set (union-find) structure.
pub mod disjoint_set;

/// Error types for disjoint sets and sparse labelling.
pub mod error;

/// Neighbour offsets and foreground extraction for flattened grids.
pub mod neighborhood;

/// Connected-region labelling over sorted foreground indices.
pub mod sparse;

pub use disjoint_set::{DisjointSet, SetId};
pub use error::{DisjointSetError, LabelError};
pub use sparse::{label_regions_sparse, SparseLabelConfig, SparseLabeler};
