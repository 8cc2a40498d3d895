// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::geometry::{Color, Vec2};
use crate::id::stable_id;
use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};

stable_id!(
    /// Unique identifier for a connection
    ConnectionId
);

/// Curve shape used when the runtime draws a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveStyle {
    /// Smooth cubic spline
    #[default]
    Spline,
    /// Hard right-angle Z
    ZShape,
    /// Z with rounded corners
    SoftZShape,
    /// Straight line
    Line,
}

impl CurveStyle {
    /// Numeric wire encoding
    pub fn wire_value(self) -> i32 {
        match self {
            Self::Spline => 0,
            Self::ZShape => 1,
            Self::SoftZShape => 2,
            Self::Line => 3,
        }
    }
}

/// Display geometry for a connection, recomputed before every export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionLine {
    /// Sampled curve points from source to target
    pub points: Vec<Vec2>,
    /// Line color
    pub color: Color,
    /// Line width
    pub width: f32,
}

/// A directed connection from an output port to an input port.
///
/// Only [`crate::Graph::connect`] creates connections, so every connection
/// has passed validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    id: ConnectionId,
    source_node: NodeId,
    source_port: PortId,
    target_node: NodeId,
    target_port: PortId,
    /// Curve style (display only)
    pub curve_style: CurveStyle,
    /// Label (display only)
    pub label: String,
    pub(crate) line: ConnectionLine,
}

impl Connection {
    pub(crate) fn new(
        source_node: NodeId,
        source_port: PortId,
        target_node: NodeId,
        target_port: PortId,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            source_node,
            source_port,
            target_node,
            target_port,
            curve_style: CurveStyle::default(),
            label: String::new(),
            line: ConnectionLine::default(),
        }
    }

    /// Unique connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Node owning the output port
    pub fn source_node(&self) -> NodeId {
        self.source_node
    }

    /// The output port
    pub fn source_port(&self) -> PortId {
        self.source_port
    }

    /// Node owning the input port
    pub fn target_node(&self) -> NodeId {
        self.target_node
    }

    /// The input port
    pub fn target_port(&self) -> PortId {
        self.target_port
    }

    /// Display geometry as of the last export
    pub fn line(&self) -> &ConnectionLine {
        &self.line
    }

    /// Whether both ends sit on the same node
    pub fn is_self_loop(&self) -> bool {
        self.source_node == self.target_node
    }
}
