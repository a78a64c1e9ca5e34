//! `ps-geometry` — walkable area, wall index, and start-position sampling.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                         |
//! |----------------|------------------------------------------------------------------|
//! | [`polygon`]    | `Polygon`, `Segment` — planar primitives and predicates          |
//! | [`geometry`]   | `Geometry` (area union + R-tree of its walls), `GeometryBuilder` |
//! | [`distribute`] | `distribute_by_number` — seeded agent placement                  |
//! | [`error`]      | `GeometryError`, `GeometryResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod distribute;
pub mod error;
pub mod geometry;
pub mod polygon;


pub use distribute::distribute_by_number;
pub use error::{GeometryError, GeometryResult};
pub use geometry::{validate_polygon, Geometry, GeometryBuilder};
pub use polygon::{Polygon, Segment};
