//! Dense numeric identifiers.
//!
//! Every entity of the engine (atoms, agents, worlds, events, interned
//! labels, signatures, states) is referred to by a dense 0-based id usable
//! as an array index: low footprint, cheap comparison.

/// Generates a `u32` newtype with the conversions and indexing sugar shared
/// by all id types of the crate.
macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(index: usize) -> Self {
                $name(index as u32)
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                $name(index as u32)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<V> std::ops::Index<$name> for Vec<V> {
            type Output = V;

            fn index(&self, index: $name) -> &Self::Output {
                &self[index.index()]
            }
        }

        impl<V> std::ops::IndexMut<$name> for Vec<V> {
            fn index_mut(&mut self, index: $name) -> &mut Self::Output {
                &mut self[index.index()]
            }
        }
    };
}

pub(crate) use dense_id;
