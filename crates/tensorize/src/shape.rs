//! Lightweight wrapper for shape descriptors produced by nested-container
//! introspection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stores per-level extents, outermost first.
///
/// Rank zero describes a scalar tensor. The descriptor is computed once per
/// build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Constructs a new shape from the provided dimensions.
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        Shape { dims: dims.into() }
    }

    /// Borrow the raw dimension slice for downstream calculations.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the rank (number of nesting levels) of the shape.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Computes the total number of elements implied by the shape.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_and_elements() {
        let shape = Shape::new(vec![2, 1, 2]);
        assert_eq!(shape.rank(), 3);
        assert_eq!(shape.num_elements(), 4);
        assert_eq!(shape.dims(), &[2, 1, 2]);
    }

    #[test]
    fn scalar_shape_has_rank_zero() {
        let shape = Shape::new(Vec::new());
        assert_eq!(shape.rank(), 0);
        assert_eq!(shape.num_elements(), 1);
    }

    #[test]
    fn display_renders_extents() {
        assert_eq!(Shape::new(vec![2, 3]).to_string(), "[2, 3]");
        assert_eq!(Shape::new(Vec::new()).to_string(), "[]");
    }
}
