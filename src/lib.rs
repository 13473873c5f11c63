// vatti-clip: Vatti scanline polygon clipping on integer coordinates
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod builder;
pub mod clipper;
pub mod contour;
pub mod edge;
pub mod edge_list;
pub mod error;
pub mod geom;
pub mod polytree;
pub mod scanbeam;
pub mod simplify;

pub use clipper::{ClipOption, ClipOptions, ClipType, Clipper, FillRule};
pub use edge::PolyKind;
pub use error::ClipError;
pub use geom::{area, orientation, point_in_polygon, IntPoint, IntRect, Path, Paths, PointInPolygon};
pub use polytree::{NodeIdx, PolyNode, PolyTree};
