// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic layered layout.
//!
//! Nodes are ranked with Kahn's algorithm and placed in columns, one column
//! per rank. A graph with a directed cycle is placed on a plain grid
//! instead; feedback constructs are legitimate, so cycles are never an
//! error here.

use crate::geometry::Vec2;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Spacing between layout columns and rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal distance between columns
    pub column_spacing: f32,
    /// Vertical distance between nodes in a column
    pub row_spacing: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_spacing: 300.0,
            row_spacing: 150.0,
        }
    }
}

/// How the last layout placed the nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Topological columns
    Layered {
        /// Number of columns used
        columns: usize,
    },
    /// Row-major grid, used when the graph has a cycle
    Grid {
        /// Number of grid columns
        columns: usize,
    },
}

impl Graph {
    /// Compute the layer of every node, indexed like [`Graph::nodes`].
    ///
    /// Connections whose ends sit on the same node are ignored. Returns
    /// `None` when the remaining connections contain a cycle.
    pub fn node_levels(&self) -> Option<Vec<usize>> {
        let n = self.nodes.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for connection in &self.connections {
            if connection.is_self_loop() {
                continue;
            }
            let (Some(&from), Some(&to)) = (
                self.node_index.get(&connection.source_node()),
                self.node_index.get(&connection.target_node()),
            ) else {
                continue;
            };
            adjacency[from].push(to);
            in_degree[to] += 1;
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
        let mut levels = vec![0usize; n];
        let mut visited = 0;

        while let Some(u) = queue.pop_front() {
            visited += 1;
            for &v in &adjacency[u] {
                levels[v] = levels[v].max(levels[u] + 1);
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        (visited == n).then_some(levels)
    }

    /// Lay out every node and port.
    ///
    /// Acyclic graphs get one column per level, `column_spacing` apart, with
    /// each column centered vertically on zero. Cyclic graphs fall back to a
    /// grid of `ceil(sqrt(n))` columns.
    pub fn auto_layout(&mut self, column_spacing: f32, row_spacing: f32) -> LayoutMode {
        let mode = match self.node_levels() {
            Some(levels) => {
                let columns = levels.iter().copied().max().map_or(0, |max| max + 1);
                let mut column_members: Vec<Vec<usize>> = vec![Vec::new(); columns];
                for (slot, &level) in levels.iter().enumerate() {
                    column_members[level].push(slot);
                }

                for (level, members) in column_members.iter().enumerate() {
                    let center = (members.len() as f32 - 1.0) / 2.0;
                    for (row, &slot) in members.iter().enumerate() {
                        self.nodes[slot].position = Vec2::new(
                            level as f32 * column_spacing,
                            (center - row as f32) * row_spacing,
                        );
                    }
                }
                LayoutMode::Layered { columns }
            }
            None => {
                let columns = grid_columns(self.nodes.len());
                for (i, node) in self.nodes.iter_mut().enumerate() {
                    node.position = grid_position(i, columns, column_spacing, row_spacing);
                }
                tracing::debug!(graph = %self.name, nodes = self.nodes.len(), "Cycle detected, using grid layout");
                LayoutMode::Grid { columns }
            }
        };

        for node in &mut self.nodes {
            node.size = node.measured_size();
            let origin = node.position;
            for port in node.ports_mut() {
                port.position = origin + port.local_offset();
            }
        }

        tracing::debug!(graph = %self.name, ?mode, "Laid out graph");
        mode
    }

    /// Lay out using the graph's own [`LayoutSettings`]
    pub fn auto_layout_default(&mut self) -> LayoutMode {
        let LayoutSettings { column_spacing, row_spacing } = self.layout;
        self.auto_layout(column_spacing, row_spacing)
    }
}

/// Number of grid columns for `n` nodes
fn grid_columns(n: usize) -> usize {
    (n as f64).sqrt().ceil() as usize
}

/// Row-major grid slot; rows go downward
fn grid_position(index: usize, columns: usize, column_spacing: f32, row_spacing: f32) -> Vec2 {
    let columns = columns.max(1);
    Vec2::new(
        (index % columns) as f32 * column_spacing,
        -((index / columns) as f32) * row_spacing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeId, NODE_BASE_HEIGHT, NODE_WIDTH, PORT_ROW_HEIGHT};
    use crate::port::{DataType, Port, PortId};

    fn relay(kind: &str) -> Node {
        Node::new(kind)
            .with_port(Port::input("In", DataType::Float).with_max_connections(0))
            .unwrap()
            .with_port(Port::output("Out", DataType::Float))
            .unwrap()
    }

    fn ports(graph: &Graph, node: NodeId) -> (PortId, PortId) {
        let node = graph.node(node).unwrap();
        (node.input("In").unwrap().id, node.output("Out").unwrap().id)
    }

    fn link(graph: &mut Graph, from: NodeId, to: NodeId) {
        let (_, out) = ports(graph, from);
        let (inp, _) = ports(graph, to);
        graph.connect(out, inp).unwrap();
    }

    fn x_of(graph: &Graph, node: NodeId) -> f32 {
        graph.node(node).unwrap().position().x
    }

    #[test]
    fn test_sources_precede_targets() {
        let mut graph = Graph::default();
        let a = graph.add_node(relay("A")).unwrap();
        let b = graph.add_node(relay("B")).unwrap();
        let c = graph.add_node(relay("C")).unwrap();
        let d = graph.add_node(relay("D")).unwrap();
        // Added out of order on purpose: d <- c <- a, d <- b <- a, d <- a
        link(&mut graph, c, d);
        link(&mut graph, a, b);
        link(&mut graph, b, c);
        link(&mut graph, a, d);

        let mode = graph.auto_layout(300.0, 150.0);
        assert_eq!(mode, LayoutMode::Layered { columns: 4 });

        for connection in graph.connections() {
            assert!(x_of(&graph, connection.source_node()) < x_of(&graph, connection.target_node()));
        }
        assert_eq!(x_of(&graph, a), 0.0);
        assert_eq!(x_of(&graph, d), 900.0);
    }

    #[test]
    fn test_columns_centered_on_zero() {
        let mut graph = Graph::default();
        let root = graph.add_node(relay("Root")).unwrap();
        let leaves: Vec<NodeId> = (0..3).map(|_| graph.add_node(relay("Leaf")).unwrap()).collect();
        for &leaf in &leaves {
            link(&mut graph, root, leaf);
        }

        graph.auto_layout(200.0, 100.0);
        let ys: Vec<f32> = leaves.iter().map(|&n| graph.node(n).unwrap().position().y).collect();
        assert_eq!(ys, vec![100.0, 0.0, -100.0]);
        assert_eq!(graph.node(root).unwrap().position().y, 0.0);
        assert_eq!(x_of(&graph, leaves[0]), 200.0);
    }

    #[test]
    fn test_self_loop_does_not_count() {
        let mut graph = Graph::default();
        let a = graph.add_node(relay("A")).unwrap();
        let b = graph.add_node(relay("B")).unwrap();
        link(&mut graph, a, a);
        link(&mut graph, a, b);

        assert_eq!(graph.node_levels(), Some(vec![0, 1]));
        assert!(matches!(graph.auto_layout(300.0, 150.0), LayoutMode::Layered { .. }));
    }

    #[test]
    fn test_cycle_falls_back_to_grid() {
        let mut graph = Graph::default();
        let ids: Vec<NodeId> = (0..5).map(|i| graph.add_node(relay(&format!("N{i}"))).unwrap()).collect();
        link(&mut graph, ids[0], ids[1]);
        link(&mut graph, ids[1], ids[2]);
        link(&mut graph, ids[2], ids[0]);
        link(&mut graph, ids[3], ids[4]);

        assert!(graph.node_levels().is_none());
        let mode = graph.auto_layout(10.0, 20.0);
        assert_eq!(mode, LayoutMode::Grid { columns: 3 });

        let positions: Vec<Vec2> = graph.nodes().map(Node::position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(0.0, -20.0),
                Vec2::new(10.0, -20.0),
            ]
        );
    }

    #[test]
    fn test_grid_depends_only_on_count() {
        let build = |edges: &[(usize, usize)]| {
            let mut graph = Graph::default();
            let ids: Vec<NodeId> = (0..4).map(|_| graph.add_node(relay("N")).unwrap()).collect();
            for &(from, to) in edges {
                link(&mut graph, ids[from], ids[to]);
            }
            graph.auto_layout(50.0, 50.0);
            graph.nodes().map(Node::position).collect::<Vec<_>>()
        };

        assert_eq!(build(&[(0, 1), (1, 0)]), build(&[(2, 3), (3, 1), (1, 2)]));
    }

    #[test]
    fn test_sizes_and_port_positions() {
        let mut graph = Graph::default();
        let node = Node::new("Wide")
            .with_port(Port::input("A", DataType::Float))
            .unwrap()
            .with_port(Port::input("B", DataType::Float))
            .unwrap()
            .with_port(Port::input("C", DataType::Float))
            .unwrap()
            .with_port(Port::output("Out", DataType::Float))
            .unwrap();
        let id = graph.add_node(node).unwrap();
        graph.auto_layout(300.0, 150.0);

        let node = graph.node(id).unwrap();
        assert_eq!(node.size(), Vec2::new(NODE_WIDTH, NODE_BASE_HEIGHT + 3.0 * PORT_ROW_HEIGHT));
        for port in node.ports() {
            assert_eq!(port.position(), node.position() + port.local_offset());
        }
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut graph = Graph::default();
        let a = graph.add_node(relay("A")).unwrap();
        let b = graph.add_node(relay("B")).unwrap();
        link(&mut graph, a, b);

        graph.auto_layout_default();
        let first: Vec<Vec2> = graph.nodes().map(Node::position).collect();
        graph.auto_layout_default();
        let second: Vec<Vec2> = graph.nodes().map(Node::position).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_graph() {
        let mut graph = Graph::default();
        assert_eq!(graph.auto_layout(1.0, 1.0), LayoutMode::Layered { columns: 0 });
    }
}
