// SPDX-License-Identifier: MIT OR Apache-2.0
//! Exported document format.
//!
//! The runtime reads a single JSON object holding every node (with its
//! ports) and every connection. Field names are part of the contract and
//! are spelled out with `serde(rename)` where they do not follow a plain
//! camelCase rule. Port data types are deliberately absent: they only
//! matter when connections are made.

use crate::connection::{Connection, ConnectionLine, CurveStyle};
use crate::geometry::{bezier_points, Color, Vec2, Vec3};
use crate::graph::Graph;
use crate::node::Node;
use crate::port::{Polarity, Port, PortId};
use serde::{Deserialize, Serialize};

/// Horizontal reach of a port's curve handle
const CONTROL_POINT_DISTANCE: f32 = 50.0;
/// Side length of a port's handle square
const PORT_HANDLE_SIZE: f32 = 12.0;
/// Side length of a control point's handle square
const CONTROL_POINT_SIZE: f32 = 4.0;
/// Number of segments sampled along a connection curve
const LINE_SEGMENTS: usize = 24;
/// Connection line width
const LINE_WIDTH: f32 = 2.5;
/// Default node header color
const HEADER_COLOR: Color = Color::rgba(0.2471, 0.3176, 0.7098, 1.0);
/// Node body color
const BODY_COLOR: Color = Color::rgba(0.1569, 0.1569, 0.1569, 0.9);

/// Placement of an element on the runtime's canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectTransform {
    /// Absolute position
    pub position: Vec3,
    /// Position relative to the parent element
    pub local_position: Vec3,
    /// Width and height
    pub size_delta: Vec2,
    /// Scale
    pub scale: Vec3,
    /// Lower anchor
    pub anchor_min: Vec2,
    /// Upper anchor
    pub anchor_max: Vec2,
}

impl RectTransform {
    /// Rect anchored at the top-left corner of its parent
    pub fn top_left(position: Vec2, local_position: Vec2, size: Vec2) -> Self {
        let anchor = Vec2::new(0.0, 1.0);
        Self {
            position: position.extend(),
            local_position: local_position.extend(),
            size_delta: size,
            scale: Vec3::ONE,
            anchor_min: anchor,
            anchor_max: anchor,
        }
    }
}

/// The whole exported document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Node records in graph order
    #[serde(rename = "serializableNodes")]
    pub nodes: Vec<NodeRecord>,
    /// Connection records in creation order
    #[serde(rename = "serializableConnections")]
    pub connections: Vec<ConnectionRecord>,
}

/// Exported node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Node kind
    pub id: String,
    /// Stable node id
    #[serde(rename = "sID")]
    pub sid: String,
    /// Placement
    pub serializable_rect_transform: Option<RectTransform>,
    /// Variant selector
    pub modifier: String,
    /// Ports in attachment order
    pub serializable_ports: Vec<PortRecord>,
    /// Instance number
    #[serde(rename = "nodeInstanceID")]
    pub node_instance_id: i32,
    /// Header color
    pub header_color: Color,
    /// Body color
    pub body_color: Color,
    /// Whether the runtime lets the user drag the node
    pub enable_drag: bool,
    /// Whether the runtime allows connecting the node to itself
    pub enable_self_connection: bool,
}

/// Exported port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    /// Logical port name
    pub id: String,
    /// Stable port id
    #[serde(rename = "sID")]
    pub sid: String,
    /// Placement
    pub serializable_rect_transform: Option<RectTransform>,
    /// 0 = input, 1 = output
    pub polarity: u8,
    /// Connection limit, 0 = unlimited
    pub max_connections: u32,
    /// Placement of the curve handle
    pub control_point_serializable_rect_transform: Option<RectTransform>,
    /// Owning node's instance number
    #[serde(rename = "nodeInstanceID")]
    pub node_instance_id: i32,
    /// Owning node's stable id
    #[serde(rename = "nodeSID")]
    pub node_sid: String,
    /// Port color
    pub color: Color,
    /// Color of connections leaving this port
    pub connection_color: Color,
}

/// Exported connection; port 0 is the output side, port 1 the input side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    /// Record kind, always `"Connection"`
    pub id: String,
    /// Stable connection id
    #[serde(rename = "sID")]
    pub sid: String,
    /// Output port stable id
    #[serde(rename = "port0SID")]
    pub port0_sid: String,
    /// Input port stable id
    #[serde(rename = "port1SID")]
    pub port1_sid: String,
    /// Output port instance number
    #[serde(rename = "port0InstanceID")]
    pub port0_instance_id: i32,
    /// Input port instance number
    #[serde(rename = "port1InstanceID")]
    pub port1_instance_id: i32,
    /// Curve style (0 spline, 1 Z, 2 soft Z, 3 line)
    pub curve_style: i32,
    /// Label
    pub label: String,
    /// Line geometry
    pub line: LineRecord,
}

impl PortRecord {
    /// Decoded polarity, `None` for an unknown wire value
    pub fn port_polarity(&self) -> Option<Polarity> {
        Polarity::from_wire(self.polarity)
    }
}

/// Exported line geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Sampled points from output to input
    pub points: Vec<Vec2>,
    /// Line color
    pub color: Color,
    /// Line width
    pub width: f32,
}

impl GraphDocument {
    /// Parse an exported document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SerializeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Find a port record by stable id
    pub fn find_port(&self, sid: &str) -> Option<&PortRecord> {
        self.nodes
            .iter()
            .flat_map(|n| n.serializable_ports.iter())
            .find(|p| p.sid == sid)
    }
}

/// Error when encoding or decoding a document
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Graph {
    /// Lay out the graph, refresh connection geometry and encode the document.
    ///
    /// Layout runs every time with [`Graph::layout`]; it only depends on the
    /// graph structure, so repeated calls give the same positions.
    pub fn serialize(&mut self) -> Result<Vec<u8>, SerializeError> {
        let document = self.prepare_document();
        Ok(serde_json::to_vec(&document)?)
    }

    /// Same as [`Graph::serialize`] but indented
    pub fn serialize_pretty(&mut self) -> Result<Vec<u8>, SerializeError> {
        let document = self.prepare_document();
        Ok(serde_json::to_vec_pretty(&document)?)
    }

    fn prepare_document(&mut self) -> GraphDocument {
        self.auto_layout_default();
        self.refresh_connection_lines();
        let document = self.to_document();
        tracing::debug!(
            graph = %self.name,
            nodes = document.nodes.len(),
            connections = document.connections.len(),
            "Serialized graph"
        );
        document
    }

    /// Recompute every connection's line from the current port positions
    pub fn refresh_connection_lines(&mut self) {
        let mut lines = Vec::with_capacity(self.connections.len());
        for connection in &self.connections {
            let source = self.resolve_port(connection.source_port());
            let target = self.resolve_port(connection.target_port());
            lines.push(connection_line(connection.curve_style, source, target));
        }
        for (connection, line) in self.connections.iter_mut().zip(lines) {
            connection.line = line;
        }
    }

    /// Build the document from the current node and port positions.
    ///
    /// # Panics
    ///
    /// Panics if a connection refers to a port missing from the registry,
    /// which means the graph's internal bookkeeping is broken.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.iter().map(node_record).collect(),
            connections: self
                .connections
                .iter()
                .map(|c| self.connection_record(c))
                .collect(),
        }
    }

    fn resolve_port(&self, port_id: PortId) -> &Port {
        self.port(port_id).unwrap_or_else(|| {
            panic!(
                "graph '{}' is inconsistent: port {port_id} is referenced but not registered",
                self.name
            )
        })
    }

    fn connection_record(&self, connection: &Connection) -> ConnectionRecord {
        let source = self.resolve_port(connection.source_port());
        let target = self.resolve_port(connection.target_port());
        let line = connection.line();
        ConnectionRecord {
            id: "Connection".to_string(),
            sid: connection.id().to_wire(),
            port0_sid: source.id.to_wire(),
            port1_sid: target.id.to_wire(),
            port0_instance_id: source.instance_id(),
            port1_instance_id: target.instance_id(),
            curve_style: connection.curve_style.wire_value(),
            label: connection.label.clone(),
            line: LineRecord {
                points: line.points.clone(),
                color: line.color.rounded(),
                width: line.width,
            },
        }
    }
}

fn node_record(node: &Node) -> NodeRecord {
    NodeRecord {
        id: node.kind.clone(),
        sid: node.id.to_wire(),
        serializable_rect_transform: Some(RectTransform::top_left(
            node.position(),
            node.position(),
            node.size(),
        )),
        modifier: node.modifier.clone(),
        serializable_ports: node.ports().iter().map(|p| port_record(node, p)).collect(),
        node_instance_id: node.instance_id(),
        header_color: node.color.unwrap_or(HEADER_COLOR).rounded(),
        body_color: BODY_COLOR.rounded(),
        enable_drag: true,
        enable_self_connection: false,
    }
}

fn port_record(node: &Node, port: &Port) -> PortRecord {
    let handle = Vec2::new(PORT_HANDLE_SIZE, PORT_HANDLE_SIZE);
    let control = control_point(port);
    PortRecord {
        id: port.name.clone(),
        sid: port.id.to_wire(),
        serializable_rect_transform: Some(RectTransform::top_left(
            port.position(),
            port.local_offset(),
            handle,
        )),
        polarity: port.polarity.wire_value(),
        max_connections: port.max_connections,
        control_point_serializable_rect_transform: Some(RectTransform::top_left(
            control,
            Vec2::new(control.x - port.position().x, control.y - port.position().y),
            Vec2::new(CONTROL_POINT_SIZE, CONTROL_POINT_SIZE),
        )),
        node_instance_id: node.instance_id(),
        node_sid: node.id.to_wire(),
        color: port.color().rounded(),
        connection_color: port.color().rounded(),
    }
}

/// Curve handle: the port position pushed away from the node
fn control_point(port: &Port) -> Vec2 {
    let dx = match port.polarity {
        Polarity::Output => CONTROL_POINT_DISTANCE,
        Polarity::Input => -CONTROL_POINT_DISTANCE,
    };
    port.position() + Vec2::new(dx, 0.0)
}

fn connection_line(style: CurveStyle, source: &Port, target: &Port) -> ConnectionLine {
    let from = source.position();
    let to = target.position();
    let mid_x = (from.x + to.x) / 2.0;
    let points = match style {
        CurveStyle::Spline => {
            bezier_points(from, control_point(source), control_point(target), to, LINE_SEGMENTS)
        }
        CurveStyle::ZShape => vec![from, Vec2::new(mid_x, from.y), Vec2::new(mid_x, to.y), to],
        CurveStyle::SoftZShape => bezier_points(
            from,
            Vec2::new(mid_x, from.y),
            Vec2::new(mid_x, to.y),
            to,
            LINE_SEGMENTS,
        ),
        CurveStyle::Line => vec![from, to],
    };
    ConnectionLine {
        points,
        color: source.color(),
        width: LINE_WIDTH,
    }
}
