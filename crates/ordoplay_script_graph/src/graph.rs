// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! Nodes and connections live in flat vectors. Two registries map stable
//! ids to vector slots so that a node or a port can be resolved in O(1).
//! The registries are rebuilt from scratch after any bulk structural
//! change (see [`Graph::prune_unused_nodes`]) rather than patched.

use crate::connection::{Connection, ConnectionId};
use crate::layout::LayoutSettings;
use crate::node::{DuplicatePortError, Node, NodeId};
use crate::port::{DataType, Port, PortId};
use std::collections::{HashMap, HashSet};

/// Location of a port inside the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PortSlot {
    pub(crate) node: usize,
    pub(crate) port: usize,
}

/// A script graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Spacing used when the graph lays itself out for export
    pub layout: LayoutSettings,
    pub(crate) nodes: Vec<Node>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) node_index: HashMap<NodeId, usize>,
    pub(crate) port_index: HashMap<PortId, PortSlot>,
    next_instance_id: i32,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: LayoutSettings::default(),
            nodes: Vec::new(),
            connections: Vec::new(),
            node_index: HashMap::new(),
            port_index: HashMap::new(),
            next_instance_id: 1,
        }
    }

    /// Set the layout spacing used by [`Graph::serialize`](crate::Graph::serialize)
    pub fn with_layout(mut self, layout: LayoutSettings) -> Self {
        self.layout = layout;
        self
    }

    /// Add a node to the graph.
    ///
    /// The node and its ports are assigned instance numbers and registered.
    /// Port ids must be unique across the graph and (name, polarity) pairs
    /// unique within the node, even for nodes that were not assembled
    /// through [`Node::add_port`].
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, AddNodeError> {
        if self.node_index.contains_key(&node.id) {
            return Err(AddNodeError::AlreadyRegistered(node.id));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for port in node.ports() {
            if self.port_index.contains_key(&port.id) || !ids.insert(port.id) {
                return Err(AddNodeError::PortAlreadyRegistered(port.id));
            }
            if !names.insert((port.name.as_str(), port.polarity)) {
                return Err(AddNodeError::DuplicatePort(DuplicatePortError {
                    kind: node.kind.clone(),
                    name: port.name.clone(),
                    polarity: port.polarity,
                }));
            }
        }

        node.instance_id = self.allocate_instance_id();
        let id = node.id;
        for i in 0..node.ports().len() {
            let instance_id = self.allocate_instance_id();
            let port = &mut node.ports_mut()[i];
            port.instance_id = instance_id;
            port.owner = Some(id);
        }

        let slot = self.nodes.len();
        for (port, p) in node.ports().iter().enumerate() {
            self.port_index.insert(p.id, PortSlot { node: slot, port });
        }
        self.node_index.insert(id, slot);

        tracing::trace!(node = %id, kind = %node.kind, ports = node.ports().len(), "Registered node");
        self.nodes.push(node);
        Ok(id)
    }

    fn allocate_instance_id(&mut self) -> i32 {
        let id = self.next_instance_id;
        self.next_instance_id += 1;
        id
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.node_index.get(&node_id).map(|&slot| &self.nodes[slot])
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get nodes of a given kind
    pub fn nodes_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.port_index
            .get(&port_id)
            .map(|slot| &self.nodes[slot.node].ports()[slot.port])
    }

    /// Get the node owning a port
    pub fn port_owner(&self, port_id: PortId) -> Option<&Node> {
        self.port_index.get(&port_id).map(|slot| &self.nodes[slot.node])
    }

    /// Connect an output port to an input port.
    ///
    /// Checks run in order: both ports are registered, the source is an
    /// output, the target is an input, the data types are compatible, and
    /// the target has room for another connection. Nothing is recorded when
    /// a check fails.
    pub fn connect(&mut self, output: PortId, input: PortId) -> Result<ConnectionId, ConnectError> {
        let source_slot = *self.port_index.get(&output).ok_or(ConnectError::UnknownPort(output))?;
        let target_slot = *self.port_index.get(&input).ok_or(ConnectError::UnknownPort(input))?;

        let source_node = &self.nodes[source_slot.node];
        let target_node = &self.nodes[target_slot.node];
        let source = &source_node.ports()[source_slot.port];
        let target = &target_node.ports()[target_slot.port];

        if !source.is_output() {
            return Err(ConnectError::SourceNotOutput(output));
        }
        if !target.is_input() {
            return Err(ConnectError::TargetNotInput(input));
        }

        if !source.data_type.is_compatible(&target.data_type) {
            return Err(ConnectError::TypeMismatch {
                output: source.data_type,
                input: target.data_type,
            });
        }

        if target.max_connections > 0 {
            let existing = self.connections_to(input).count();
            if existing >= target.max_connections as usize {
                return Err(ConnectError::CardinalityExceeded {
                    port: input,
                    max: target.max_connections,
                });
            }
        }

        let connection = Connection::new(source_node.id, output, target_node.id, input);
        let id = connection.id();
        tracing::trace!(
            connection = %id,
            source_kind = %source_node.kind,
            source_port = %source.name,
            target_kind = %target_node.kind,
            target_port = %target.name,
            "Connected ports"
        );
        self.connections.push(connection);
        Ok(id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id() == connection_id)
    }

    /// Get all connections in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Get connections to a specific port
    pub fn connections_to(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.target_port() == port_id)
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Rebuild both registries from the node vector
    pub(crate) fn rebuild_registries(&mut self) {
        self.node_index.clear();
        self.port_index.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            self.node_index.insert(node.id, slot);
            for (port, p) in node.ports().iter().enumerate() {
                self.port_index.insert(p.id, PortSlot { node: slot, port });
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when adding a node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddNodeError {
    /// The node is already part of this graph
    #[error("Node already registered: {0}")]
    AlreadyRegistered(NodeId),

    /// One of the node's ports is already registered, or appears twice
    #[error("Port already registered: {0}")]
    PortAlreadyRegistered(PortId),

    /// Two of the node's ports share a name and polarity
    #[error(transparent)]
    DuplicatePort(DuplicatePortError),
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// Port is not registered in this graph
    #[error("Port not found: {0}")]
    UnknownPort(PortId),

    /// Source port is not an output
    #[error("Source port {0} is not an output")]
    SourceNotOutput(PortId),

    /// Target port is not an input
    #[error("Target port {0} is not an input")]
    TargetNotInput(PortId),

    /// Data types differ and neither is the wildcard
    #[error("Type mismatch: cannot connect {output} to {input}")]
    TypeMismatch {
        /// Output port type
        output: DataType,
        /// Input port type
        input: DataType,
    },

    /// Target port already has its maximum number of connections
    #[error("Port {port} already has {max} connection(s)")]
    CardinalityExceeded {
        /// Target port
        port: PortId,
        /// Its connection limit
        max: u32,
    },
}

impl ConnectError {
    /// Whether this is one of the two polarity failures
    pub fn is_polarity(&self) -> bool {
        matches!(self, Self::SourceNotOutput(_) | Self::TargetNotInput(_))
    }
}
