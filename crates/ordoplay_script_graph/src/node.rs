// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the script graph.

use crate::geometry::{Color, Vec2};
use crate::id::stable_id;
use crate::port::{Polarity, Port, PortId};
use serde::{Deserialize, Serialize};

stable_id!(
    /// Unique identifier for a node
    NodeId
);

/// Fixed node width
pub const NODE_WIDTH: f32 = 180.0;
/// Height of a node without any port rows (header and padding)
pub const NODE_BASE_HEIGHT: f32 = 32.0;
/// Height added per port row
pub const PORT_ROW_HEIGHT: f32 = 22.0;
/// Height of the node header; port rows start below it
const NODE_HEADER_HEIGHT: f32 = 24.0;

/// Error when attaching a port whose name and polarity are already taken
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Node '{kind}' already has an {polarity} port named '{name}'")]
pub struct DuplicatePortError {
    /// Kind of the node the port was attached to
    pub kind: String,
    /// Logical port name
    pub name: String,
    /// Port polarity
    pub polarity: Polarity,
}

/// A node instance in the script graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind (type name understood by the runtime)
    pub kind: String,
    /// Variant selector, passed through to the runtime as text
    pub modifier: String,
    /// Header color override
    pub color: Option<Color>,
    /// Ports in attachment order
    pub(crate) ports: Vec<Port>,
    /// Top-left corner, computed by layout
    pub(crate) position: Vec2,
    /// Width and height, computed by layout
    pub(crate) size: Vec2,
    /// Engine-style instance number, assigned when added to a graph
    pub(crate) instance_id: i32,
}

impl Node {
    /// Create a node of the given kind with no ports
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            kind: kind.into(),
            modifier: String::new(),
            color: None,
            ports: Vec::new(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            instance_id: 0,
        }
    }

    /// Set the modifier
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = modifier.into();
        self
    }

    /// Set the header color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Attach a port, builder style
    pub fn with_port(mut self, port: Port) -> Result<Self, DuplicatePortError> {
        self.add_port(port)?;
        Ok(self)
    }

    /// Attach a port.
    ///
    /// Fails if the node already has a port with the same name and polarity.
    /// Ports without an explicit offset are stacked below the header, inputs
    /// on the left edge and outputs on the right.
    pub fn add_port(&mut self, mut port: Port) -> Result<PortId, DuplicatePortError> {
        if self.find_port(&port.name, port.polarity).is_some() {
            return Err(DuplicatePortError {
                kind: self.kind.clone(),
                name: port.name,
                polarity: port.polarity,
            });
        }

        if port.local_offset.is_none() {
            let slot = self.ports.iter().filter(|p| p.polarity == port.polarity).count();
            let x = match port.polarity {
                Polarity::Input => 0.0,
                Polarity::Output => NODE_WIDTH,
            };
            let y = -(NODE_HEADER_HEIGHT + (slot as f32 + 0.5) * PORT_ROW_HEIGHT);
            port.local_offset = Some(Vec2::new(x, y));
        }
        port.owner = Some(self.id);

        let id = port.id;
        self.ports.push(port);
        Ok(id)
    }

    /// Find a port by name and polarity
    pub fn find_port(&self, name: &str, polarity: Polarity) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| p.polarity == polarity && p.name == name)
    }

    /// Find an input port by name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.find_port(name, Polarity::Input)
    }

    /// Find an output port by name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.find_port(name, Polarity::Output)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }

    /// All ports in attachment order
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub(crate) fn ports_mut(&mut self) -> &mut [Port] {
        &mut self.ports
    }

    /// Input ports
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    /// Output ports
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }

    /// Size derived from the port counts
    pub fn measured_size(&self) -> Vec2 {
        let rows = self.inputs().count().max(self.outputs().count());
        Vec2::new(NODE_WIDTH, NODE_BASE_HEIGHT + PORT_ROW_HEIGHT * rows as f32)
    }

    /// Top-left corner as of the last layout
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Size as of the last layout
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Instance number used by the exported document
    pub fn instance_id(&self) -> i32 {
        self.instance_id
    }
}
