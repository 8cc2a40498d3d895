// SPDX-License-Identifier: MIT OR Apache-2.0
//! Catalog of node kinds known to the runtime.
//!
//! A template lists the ports a node of that kind is created with. The
//! graph itself never looks at the catalog; it only sees the nodes built
//! from it.

use crate::geometry::Color;
use crate::node::{DuplicatePortError, Node};
use crate::port::{DataType, Polarity, Port};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Port declared by a node template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortTemplate {
    /// Logical port name
    pub name: String,
    /// Port polarity
    pub polarity: Polarity,
    /// Data type
    pub data_type: DataType,
    /// Connection limit, 0 = unlimited
    pub max_connections: u32,
}

impl PortTemplate {
    /// Single-connection input
    pub fn input(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::Input,
            data_type,
            max_connections: 1,
        }
    }

    /// Unlimited output
    pub fn output(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::Output,
            data_type,
            max_connections: 0,
        }
    }

    /// Override the connection limit
    pub fn max(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Create a fresh port (new stable id) from this template
    pub fn instantiate(&self) -> Port {
        Port::new(self.name.clone(), self.data_type, self.polarity)
            .with_max_connections(self.max_connections)
    }
}

/// Node kind definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Kind name
    pub kind: String,
    /// Modifier used when none is given
    pub default_modifier: String,
    /// Header color
    pub color: Option<[u8; 3]>,
    /// Ports in declaration order
    pub ports: Vec<PortTemplate>,
}

impl NodeTemplate {
    /// Create a template with no ports
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            default_modifier: String::new(),
            color: None,
            ports: Vec::new(),
        }
    }

    /// Add a port
    pub fn port(mut self, port: PortTemplate) -> Self {
        self.ports.push(port);
        self
    }

    /// Set the default modifier
    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.default_modifier = modifier.into();
        self
    }

    /// Set the header color
    pub fn color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Build a node of this kind
    pub fn instantiate(&self) -> Result<Node, DuplicatePortError> {
        let mut node = Node::new(self.kind.clone()).with_modifier(self.default_modifier.clone());
        if let Some(color) = self.color {
            node = node.with_color(Color::from_rgb8(color));
        }
        for port in &self.ports {
            node.add_port(port.instantiate())?;
        }
        Ok(node)
    }
}

/// Registry of available node kinds
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    templates: IndexMap<String, NodeTemplate>,
}

impl NodeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any template of the same kind
    pub fn register(&mut self, template: NodeTemplate) {
        self.templates.insert(template.kind.clone(), template);
    }

    /// Get a template by kind
    pub fn get(&self, kind: &str) -> Option<&NodeTemplate> {
        self.templates.get(kind)
    }

    /// Registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Create a node from a kind; `None` if the kind is unknown
    pub fn instantiate(&self, kind: &str) -> Option<Result<Node, DuplicatePortError>> {
        self.get(kind).map(NodeTemplate::instantiate)
    }
}

/// Kind of the kart controller node, the usual prune root
pub const KART: &str = "Kart";
/// Kind of the float constant node
pub const FLOAT_CONSTANT: &str = "FloatConstant";

/// Catalog of the kart-scripting kinds
pub fn standard_catalog() -> NodeCatalog {
    let mut catalog = NodeCatalog::new();

    // Root
    catalog.register(
        NodeTemplate::new(KART)
            .color([200, 80, 80])
            .port(PortTemplate::input("Accelerate", DataType::Bool))
            .port(PortTemplate::input("Brake", DataType::Bool))
            .port(PortTemplate::input("Steer", DataType::Float))
            .port(PortTemplate::input("Boost", DataType::Bool))
            .port(PortTemplate::output("Position", DataType::Vector3))
            .port(PortTemplate::output("Forward", DataType::Vector3))
            .port(PortTemplate::output("Speed", DataType::Float)),
    );

    // Constants
    catalog.register(
        NodeTemplate::new(FLOAT_CONSTANT)
            .modifier("0")
            .port(PortTemplate::output("Value", DataType::Float)),
    );
    catalog.register(
        NodeTemplate::new("BoolConstant")
            .modifier("False")
            .port(PortTemplate::output("Value", DataType::Bool)),
    );

    // Math
    for kind in ["AddFloats", "MultiplyFloats"] {
        catalog.register(
            NodeTemplate::new(kind)
                .port(PortTemplate::input("A", DataType::Float))
                .port(PortTemplate::input("B", DataType::Float))
                .port(PortTemplate::output("Result", DataType::Float)),
        );
    }
    catalog.register(
        NodeTemplate::new("CompareFloats")
            .modifier("GreaterThan")
            .port(PortTemplate::input("A", DataType::Float))
            .port(PortTemplate::input("B", DataType::Float))
            .port(PortTemplate::output("Result", DataType::Bool)),
    );
    catalog.register(
        NodeTemplate::new("SplitVector3")
            .port(PortTemplate::input("Vector", DataType::Vector3))
            .port(PortTemplate::output("X", DataType::Float))
            .port(PortTemplate::output("Y", DataType::Float))
            .port(PortTemplate::output("Z", DataType::Float)),
    );

    // Logic
    catalog.register(
        NodeTemplate::new("Not")
            .port(PortTemplate::input("In", DataType::Bool))
            .port(PortTemplate::output("Out", DataType::Bool)),
    );
    catalog.register(
        NodeTemplate::new("And")
            .port(PortTemplate::input("A", DataType::Bool))
            .port(PortTemplate::input("B", DataType::Bool))
            .port(PortTemplate::output("Out", DataType::Bool)),
    );

    // Sensors
    catalog.register(
        NodeTemplate::new("Spherecast")
            .port(PortTemplate::input("Origin", DataType::Vector3))
            .port(PortTemplate::input("Direction", DataType::Vector3))
            .port(PortTemplate::input("Radius", DataType::Float))
            .port(PortTemplate::input("Distance", DataType::Float))
            .port(PortTemplate::output("Hit", DataType::Bool))
            .port(PortTemplate::output("HitDistance", DataType::Float))
            .port(PortTemplate::output("HitEntity", DataType::Entity)),
    );

    // State; wiring its output back into its own input chain forms a cycle
    catalog.register(
        NodeTemplate::new("Memory")
            .port(PortTemplate::input("Value", DataType::Any))
            .port(PortTemplate::input("Write", DataType::Bool))
            .port(PortTemplate::output("Stored", DataType::Any)),
    );

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_instantiates() {
        let catalog = standard_catalog();
        assert!(!catalog.is_empty());
        for kind in catalog.kinds() {
            let node = catalog.instantiate(kind).unwrap().unwrap();
            assert_eq!(node.kind, kind);
        }
    }

    #[test]
    fn test_instances_get_fresh_ids() {
        let catalog = standard_catalog();
        let a = catalog.instantiate(KART).unwrap().unwrap();
        let b = catalog.instantiate(KART).unwrap().unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.input("Steer").unwrap().id, b.input("Steer").unwrap().id);
        assert_eq!(a.input("Steer").unwrap().max_connections, 1);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(standard_catalog().instantiate("Teleporter").is_none());
    }

    #[test]
    fn test_duplicate_template_port() {
        let mut catalog = NodeCatalog::new();
        catalog.register(
            NodeTemplate::new("Broken")
                .port(PortTemplate::input("X", DataType::Float))
                .port(PortTemplate::input("X", DataType::Bool)),
        );
        let err = catalog.instantiate("Broken").unwrap().unwrap_err();
        assert_eq!(err.name, "X");
    }

    #[test]
    fn test_modifier_default() {
        let node = standard_catalog().instantiate("CompareFloats").unwrap().unwrap();
        assert_eq!(node.modifier, "GreaterThan");
    }
}
