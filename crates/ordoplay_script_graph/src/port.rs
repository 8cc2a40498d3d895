// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::geometry::{Color, Vec2};
use crate::id::stable_id;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

stable_id!(
    /// Unique identifier for a port
    PortId
);

/// Port polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Connection sink
    Input,
    /// Connection source
    Output,
}

impl Polarity {
    /// Numeric wire encoding (0 = input, 1 = output)
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Input => 0,
            Self::Output => 1,
        }
    }

    /// Decode the numeric wire encoding
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Input),
            1 => Some(Self::Output),
            _ => None,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Data type tag carried by a port.
///
/// Only used to validate connections; it is not part of the exported
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Wildcard, compatible with every tag
    Any,
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Entity reference
    Entity,
}

impl DataType {
    /// Get the color for this type (used for port and connection display)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Any => [150, 150, 150],
            Self::Bool => [200, 80, 80],
            Self::Int => [80, 200, 200],
            Self::Float => [80, 200, 80],
            Self::Vector2 => [200, 200, 80],
            Self::Vector3 => [200, 150, 80],
            Self::Color => [255, 200, 100],
            Self::String => [200, 180, 150],
            Self::Entity => [150, 200, 150],
        }
    }

    /// Check if a value of this type can flow into a port of `other`.
    ///
    /// Tags must match exactly unless either side is [`DataType::Any`].
    pub fn is_compatible(&self, other: &DataType) -> bool {
        *self == *other || matches!(self, Self::Any) || matches!(other, Self::Any)
    }

    /// Tag name as used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Color => "color",
            Self::String => "string",
            Self::Entity => "entity",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Globally unique port ID
    pub id: PortId,
    /// Logical port name (unique per node and polarity only)
    pub name: String,
    /// Port polarity
    pub polarity: Polarity,
    /// Data type
    pub data_type: DataType,
    /// Maximum incoming connections, 0 = unlimited
    pub max_connections: u32,
    /// Owning node, set when the port is attached
    pub(crate) owner: Option<NodeId>,
    /// Offset from the owning node's position, fixed when attached
    pub(crate) local_offset: Option<Vec2>,
    /// Absolute position, computed by layout
    pub(crate) position: Vec2,
    /// Engine-style instance number, assigned when the node joins a graph
    pub(crate) instance_id: i32,
}

impl Port {
    /// Create a new port
    pub fn new(name: impl Into<String>, data_type: DataType, polarity: Polarity) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            polarity,
            data_type,
            max_connections: 0,
            owner: None,
            local_offset: None,
            position: Vec2::ZERO,
            instance_id: 0,
        }
    }

    /// Create a new input port (single connection by default)
    pub fn input(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, Polarity::Input).with_max_connections(1)
    }

    /// Create a new output port (unlimited connections)
    pub fn output(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, Polarity::Output)
    }

    /// Set the connection limit (0 = unlimited)
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Pin the port at a fixed offset from its node instead of the default slot
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.local_offset = Some(offset);
        self
    }

    /// Whether this is an input port
    pub fn is_input(&self) -> bool {
        self.polarity == Polarity::Input
    }

    /// Whether this is an output port
    pub fn is_output(&self) -> bool {
        self.polarity == Polarity::Output
    }

    /// Whether the port accepts any number of connections
    pub fn is_unlimited(&self) -> bool {
        self.max_connections == 0
    }

    /// Owning node, if attached
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Offset from the owning node's position
    pub fn local_offset(&self) -> Vec2 {
        self.local_offset.unwrap_or_default()
    }

    /// Absolute position as of the last layout
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Instance number used by the exported document
    pub fn instance_id(&self) -> i32 {
        self.instance_id
    }

    /// Display color derived from the data type
    pub fn color(&self) -> Color {
        Color::from_rgb8(self.data_type.color())
    }
}
