// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stable identifiers for nodes, ports and connections.
//!
//! Every identifier is a random UUID v4. No uniqueness check is made
//! against identifiers already in use: with 122 random bits a collision is
//! negligible for graphs of a few thousand nodes.

use uuid::Uuid;

/// Generate a new UUID-v4 shaped identifier string
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Declares a `Copy` newtype over [`Uuid`] used as a stable identifier.
macro_rules! stable_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// The wire form of this identifier
            pub fn to_wire(&self) -> String {
                self.0.to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

pub(crate) use stable_id;
