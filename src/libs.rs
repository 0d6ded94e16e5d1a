
//! # TE insertion and deletion merging libraries
//!
//! Author: Emanuel Schmid-Siegert
//!
//! This libraries are a collection of functions and structures which
//! help consolidating structural variant calls of transposable elements.
//! They are used in the temerge suite which combines TE insertion and
//! deletion calls that were made independently in multiple biological
//! samples into a single master call set, keeping track of the samples
//! (accessions) which support each distinct event.
//!
//! Insertions and deletions behave quite differently here: deletion calls
//! from different samples carry already identical caller coordinates and can
//! be collapsed by an exact comparison, whereas insertion calls wobble by a
//! few basepairs between samples and need a distance-tolerant clustering
//! followed by a per-cluster identity check. Subsequently the libraries
//! are split into:
//!  - common: the overlap predicate + small helpers shared by all tools
//!  - deletions: exact-identity merging and the accession-list inversion
//!  - insertions: coarse proximity clustering and cluster splitting
//!

/// the overlap predicate + small helpers shared by all tools
pub mod lib {
    pub mod common;
    /// exact-identity merging and the accession-list inversion
    pub mod deletions;
    /// coarse proximity clustering and cluster splitting
    pub mod insertions;
}
