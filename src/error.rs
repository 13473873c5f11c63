// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error types for the clipping engine.

use thiserror::Error;

/// Hard failures of `Clipper::add_path` and `Clipper::execute*`.
///
/// A degenerate path is not an error: `add_path` reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    /// A coordinate lies beyond `geom::HI_RANGE`.
    #[error("coordinate ({x}, {y}) is outside the allowed range")]
    CoordinateOutOfRange {
        /// X of the offending point.
        x: i64,
        /// Y of the offending point.
        y: i64,
    },

    /// Open paths may only be added as subject paths.
    #[error("open paths must be subject paths")]
    OpenClipPath,

    /// Flat path output cannot carry open paths; use `execute_tree`.
    #[error("open paths were added; use execute_tree to clip them")]
    OpenPathsNeedTree,

    /// The engine was already executing.
    #[error("clipper is already executing")]
    Reentrant,

    /// The intersections within one scanbeam could not be ordered so that
    /// every swap is between adjacent edges.
    #[error("unable to order intersections within scanbeam")]
    IntersectionOrder,

    /// An edge reached its top as a maximum but no partner edge closing the
    /// same maximum was active.
    #[error("unmatched edge at local maximum")]
    MaximaPair,
}
