// SPDX-License-Identifier: MIT OR Apache-2.0
//! Convenience layer for writing scripts against a node catalog.

use crate::catalog::{standard_catalog, NodeCatalog, FLOAT_CONSTANT};
use crate::connection::ConnectionId;
use crate::graph::{AddNodeError, ConnectError, Graph};
use crate::node::{DuplicatePortError, NodeId};
use crate::port::{Polarity, PortId};
use std::collections::HashMap;

/// Error while building a script
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The catalog has no template for this kind
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),

    /// Node is not in the graph
    #[error("Node not found: {0}")]
    UnknownNode(NodeId),

    /// Node has no port with this name and polarity
    #[error("Node '{kind}' has no {polarity} port named '{name}'")]
    MissingPort {
        /// Node kind
        kind: String,
        /// Requested port name
        name: String,
        /// Requested polarity
        polarity: Polarity,
    },

    /// Template declares the same port twice
    #[error(transparent)]
    DuplicatePort(#[from] DuplicatePortError),

    /// Graph refused the node
    #[error(transparent)]
    AddNode(#[from] AddNodeError),

    /// Graph refused the connection
    #[error(transparent)]
    Connect(#[from] ConnectError),
}

/// Builds a [`Graph`] from catalog kinds.
///
/// Float constants are shared: asking for the same value twice returns the
/// output of the same constant node. The cache belongs to this builder.
#[derive(Debug)]
pub struct ScriptBuilder {
    graph: Graph,
    catalog: NodeCatalog,
    float_constants: HashMap<String, NodeId>,
}

impl ScriptBuilder {
    /// Create a builder for a new graph
    pub fn new(name: impl Into<String>, catalog: NodeCatalog) -> Self {
        Self {
            graph: Graph::new(name),
            catalog,
            float_constants: HashMap::new(),
        }
    }

    /// Create a builder using [`standard_catalog`]
    pub fn with_standard_catalog(name: impl Into<String>) -> Self {
        Self::new(name, standard_catalog())
    }

    /// Add a node of the given kind with its default modifier
    pub fn node(&mut self, kind: &str) -> Result<NodeId, BuildError> {
        let node = self
            .catalog
            .instantiate(kind)
            .ok_or_else(|| BuildError::UnknownKind(kind.to_string()))??;
        Ok(self.graph.add_node(node)?)
    }

    /// Add a node of the given kind with an explicit modifier
    pub fn node_with_modifier(&mut self, kind: &str, modifier: impl Into<String>) -> Result<NodeId, BuildError> {
        let node = self
            .catalog
            .instantiate(kind)
            .ok_or_else(|| BuildError::UnknownKind(kind.to_string()))??
            .with_modifier(modifier);
        Ok(self.graph.add_node(node)?)
    }

    /// Output port of a float constant, reusing an existing constant node
    pub fn float(&mut self, value: f32) -> Result<PortId, BuildError> {
        let key = value.to_string();
        let cached = self
            .float_constants
            .get(&key)
            .copied()
            .filter(|id| self.graph.node(*id).is_some());

        let node = match cached {
            Some(node) => node,
            None => {
                let node = self.node_with_modifier(FLOAT_CONSTANT, key.clone())?;
                self.float_constants.insert(key, node);
                node
            }
        };
        self.output(node, "Value")
    }

    /// Number of distinct float constants created so far
    pub fn float_constant_count(&self) -> usize {
        self.float_constants.len()
    }

    /// Resolve an output port by name
    pub fn output(&self, node: NodeId, name: &str) -> Result<PortId, BuildError> {
        self.port(node, name, Polarity::Output)
    }

    /// Resolve an input port by name
    pub fn input(&self, node: NodeId, name: &str) -> Result<PortId, BuildError> {
        self.port(node, name, Polarity::Input)
    }

    fn port(&self, node_id: NodeId, name: &str, polarity: Polarity) -> Result<PortId, BuildError> {
        let node = self.graph.node(node_id).ok_or(BuildError::UnknownNode(node_id))?;
        node.find_port(name, polarity)
            .map(|p| p.id)
            .ok_or_else(|| BuildError::MissingPort {
                kind: node.kind.clone(),
                name: name.to_string(),
                polarity,
            })
    }

    /// Connect two ports
    pub fn connect(&mut self, output: PortId, input: PortId) -> Result<ConnectionId, BuildError> {
        Ok(self.graph.connect(output, input)?)
    }

    /// Connect `source.output` to `target.input` by port names
    pub fn wire(
        &mut self,
        source: NodeId,
        output: &str,
        target: NodeId,
        input: &str,
    ) -> Result<ConnectionId, BuildError> {
        let output = self.output(source, output)?;
        let input = self.input(target, input)?;
        self.connect(output, input)
    }

    /// The graph built so far
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph, e.g. for pruning
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Finish building
    pub fn finish(self) -> Graph {
        self.graph
    }
}
