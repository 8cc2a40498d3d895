// SPDX-License-Identifier: MIT OR Apache-2.0
//! Script graph core for `OrdoPlay` visual scripting.
//!
//! Scripts are assembled as a directed graph of typed nodes joined at
//! polarity-aware ports, then exported as a JSON document for the runtime.
//!
//! ## Pipeline
//!
//! 1. Build nodes (directly or through a [`NodeCatalog`]) and add them
//!    with [`Graph::add_node`]
//! 2. Join ports with [`Graph::connect`], which validates polarity, data
//!    type and connection limits
//! 3. Optionally drop unused nodes with [`Graph::prune_unused_nodes`]
//! 4. Export with [`Graph::serialize`], which lays the graph out first

mod id;

pub mod builder;
pub mod catalog;
pub mod connection;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod node;
pub mod port;
pub mod prune;
pub mod wire;

pub use builder::{BuildError, ScriptBuilder};
pub use catalog::{standard_catalog, NodeCatalog, NodeTemplate, PortTemplate};
pub use connection::{Connection, ConnectionId, CurveStyle};
pub use graph::{AddNodeError, ConnectError, Graph};
pub use id::new_id;
pub use layout::{LayoutMode, LayoutSettings};
pub use node::{DuplicatePortError, Node, NodeId};
pub use port::{DataType, Polarity, Port, PortId};
pub use prune::PruneSummary;
pub use wire::{GraphDocument, SerializeError};
