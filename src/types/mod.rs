//! Data types shared between the layout engine and its collaborators.

mod field;
mod geometry;
mod schema;
mod subgrid;

pub use field::*;
pub use geometry::*;
pub use schema::*;
pub use subgrid::*;
