//! Arena handles for half-edge mesh elements.
//!
//! Vertices, half-edges and faces live in `Vec` arenas owned by the mesh and
//! are referred to by these `u32` handles. A handle with the sentinel value
//! `u32::MAX` is *invalid* and stands in for a null link, e.g. the opposite of
//! a boundary half-edge.

use std::fmt::{self, Debug};

/// Handle of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// Handle of a half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// Handle of a face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

const INVALID: u32 = u32::MAX;

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl $name {
            /// Create a handle from an arena position.
            #[inline]
            pub fn new(index: usize) -> Self {
                assert!(index < INVALID as usize, "arena index {} out of range", index);
                Self(index as u32)
            }

            /// The null handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Arena position.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Whether this handle refers to an element.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $tag, self.0)
                } else {
                    write!(f, "{}(null)", $tag)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(HalfEdgeId, "HE");
impl_handle!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles() {
        let v = VertexId::new(7);
        assert_eq!(v.index(), 7);
        assert!(v.is_valid());
        assert!(!HalfEdgeId::invalid().is_valid());
        assert_eq!(FaceId::default(), FaceId::invalid());
        assert_eq!(VertexId::from(3usize), VertexId::new(3));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_sentinel_index_rejected() {
        let _ = FaceId::new(u32::MAX as usize);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(42)), "V(42)");
        assert_eq!(format!("{:?}", HalfEdgeId::invalid()), "HE(null)");
        assert_eq!(format!("{:?}", FaceId::new(0)), "F(0)");
    }
}
