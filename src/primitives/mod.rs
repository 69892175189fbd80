//! Dense compute primitives (Vector, Matrix).
//!
//! These types provide the linear-algebra surface the classifier needs:
//! element access, matrix products, element-wise arithmetic, broadcasting,
//! and column reductions.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
