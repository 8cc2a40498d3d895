// SPDX-License-Identifier: MIT OR Apache-2.0
//! Removal of nodes that cannot influence any root node.

use crate::graph::Graph;
use crate::node::NodeId;
use crate::port::PortId;
use std::collections::{HashMap, HashSet, VecDeque};

/// Counts reported by [`Graph::prune_unused_nodes`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Nodes removed
    pub removed_nodes: usize,
    /// Connections removed
    pub removed_connections: usize,
}

impl Graph {
    /// Nodes backward-reachable from any node whose kind is in `roots`.
    ///
    /// Reachability follows input ports to the nodes driving them, never
    /// outputs to their consumers.
    pub fn reachable_from_roots<S: AsRef<str>>(&self, roots: &[S]) -> HashSet<NodeId> {
        let roots: HashSet<&str> = roots.iter().map(AsRef::as_ref).collect();

        let mut drivers: HashMap<PortId, Vec<NodeId>> = HashMap::new();
        for connection in &self.connections {
            drivers
                .entry(connection.target_port())
                .or_default()
                .push(connection.source_node());
        }

        let mut keep: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for node in self.nodes.iter().filter(|n| roots.contains(n.kind.as_str())) {
            if keep.insert(node.id) {
                queue.push_back(node.id);
            }
        }

        while let Some(node_id) = queue.pop_front() {
            let Some(node) = self.node(node_id) else {
                continue;
            };
            for input in node.inputs() {
                for &driver in drivers.get(&input.id).into_iter().flatten() {
                    if keep.insert(driver) {
                        queue.push_back(driver);
                    }
                }
            }
        }

        keep
    }

    /// Drop every node (and its connections) that no root node depends on.
    ///
    /// An empty root set keeps everything. Registries are rebuilt from
    /// scratch afterwards.
    pub fn prune_unused_nodes<S: AsRef<str>>(&mut self, roots: &[S]) -> PruneSummary {
        if roots.is_empty() {
            return PruneSummary::default();
        }

        let keep = self.reachable_from_roots(roots);
        let nodes_before = self.nodes.len();
        let connections_before = self.connections.len();

        self.nodes.retain(|n| keep.contains(&n.id));
        self.connections
            .retain(|c| keep.contains(&c.source_node()) && keep.contains(&c.target_node()));
        self.rebuild_registries();

        let summary = PruneSummary {
            removed_nodes: nodes_before - self.nodes.len(),
            removed_connections: connections_before - self.connections.len(),
        };
        tracing::debug!(
            graph = %self.name,
            kept_nodes = self.nodes.len(),
            removed_nodes = summary.removed_nodes,
            removed_connections = summary.removed_connections,
            "Pruned unused nodes"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConnectError;
    use crate::node::Node;
    use crate::port::{DataType, Port};

    fn source(kind: &str) -> Node {
        Node::new(kind)
            .with_port(Port::output("Out", DataType::Float))
            .unwrap()
    }

    fn sink(kind: &str) -> Node {
        Node::new(kind)
            .with_port(Port::input("In", DataType::Float))
            .unwrap()
            .with_port(Port::input("Extra", DataType::Float))
            .unwrap()
            .with_port(Port::output("Out", DataType::Float))
            .unwrap()
    }

    fn connect(graph: &mut Graph, from: NodeId, to: NodeId, input: &str) {
        let out = graph.node(from).unwrap().output("Out").unwrap().id;
        let inp = graph.node(to).unwrap().input(input).unwrap().id;
        graph.connect(out, inp).unwrap();
    }

    #[test]
    fn test_example_scenario() {
        let mut graph = Graph::default();
        let a = graph.add_node(source("A")).unwrap();
        let b = graph.add_node(sink("B")).unwrap();
        connect(&mut graph, a, b, "In");

        let mut keep_b = graph.clone();
        assert_eq!(keep_b.prune_unused_nodes(&["B"]), PruneSummary::default());
        assert_eq!(keep_b.node_count(), 2);
        assert_eq!(keep_b.connection_count(), 1);

        let summary = graph.prune_unused_nodes(&["A"]);
        assert_eq!(summary, PruneSummary { removed_nodes: 1, removed_connections: 1 });
        assert!(graph.node(a).is_some());
        assert!(graph.node(b).is_none());
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_empty_roots_is_noop() {
        let mut graph = Graph::default();
        graph.add_node(source("A")).unwrap();
        graph.add_node(sink("B")).unwrap();
        let roots: [&str; 0] = [];
        assert_eq!(graph.prune_unused_nodes(&roots), PruneSummary::default());
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_unmatched_roots_remove_everything() {
        let mut graph = Graph::default();
        let a = graph.add_node(source("A")).unwrap();
        let b = graph.add_node(sink("B")).unwrap();
        connect(&mut graph, a, b, "In");

        let summary = graph.prune_unused_nodes(&["Kart"]);
        assert_eq!(summary, PruneSummary { removed_nodes: 2, removed_connections: 1 });
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.node(a).is_none());
    }

    #[test]
    fn test_transitive_and_unrelated() {
        let mut graph = Graph::default();
        let a = graph.add_node(source("A")).unwrap();
        let b = graph.add_node(sink("B")).unwrap();
        let root = graph.add_node(sink("Kart")).unwrap();
        let orphan = graph.add_node(source("Orphan")).unwrap();
        let consumer = graph.add_node(sink("Consumer")).unwrap();
        connect(&mut graph, a, b, "In");
        connect(&mut graph, b, root, "In");
        connect(&mut graph, root, consumer, "In");
        connect(&mut graph, orphan, consumer, "Extra");

        let expected: HashSet<NodeId> = [a, b, root].into_iter().collect();
        assert_eq!(graph.reachable_from_roots(&["Kart"]), expected);

        graph.prune_unused_nodes(&["Kart"]);
        let kept: HashSet<NodeId> = graph.node_ids().collect();
        assert_eq!(kept, expected);
        assert_eq!(graph.connection_count(), 2);
        for connection in graph.connections() {
            assert!(kept.contains(&connection.source_node()));
            assert!(kept.contains(&connection.target_node()));
        }
    }

    #[test]
    fn test_cycles_terminate() {
        let mut graph = Graph::default();
        let a = graph.add_node(sink("Memory")).unwrap();
        let b = graph.add_node(sink("Kart")).unwrap();
        connect(&mut graph, a, b, "In");
        connect(&mut graph, b, a, "In");
        connect(&mut graph, b, b, "Extra");

        graph.prune_unused_nodes(&["Kart"]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_registries_rebuilt_after_prune() {
        let mut graph = Graph::default();
        let dropped = graph.add_node(source("Dropped")).unwrap();
        let dropped_port = graph.node(dropped).unwrap().output("Out").unwrap().id;
        let a = graph.add_node(source("A")).unwrap();
        let root = graph.add_node(sink("Kart")).unwrap();
        connect(&mut graph, a, root, "In");

        graph.prune_unused_nodes(&["Kart"]);

        assert!(graph.port(dropped_port).is_none());
        assert!(graph.node(dropped).is_none());
        // Slots shifted; lookups must still land on the right nodes
        assert_eq!(graph.node(a).unwrap().kind, "A");
        assert_eq!(graph.node(root).unwrap().kind, "Kart");
        let extra = graph.node(root).unwrap().input("Extra").unwrap().id;
        assert_eq!(graph.port_owner(extra).unwrap().id, root);

        let err = graph.connect(dropped_port, extra).unwrap_err();
        assert_eq!(err, ConnectError::UnknownPort(dropped_port));
        assert!(graph.connect(graph.node(a).unwrap().output("Out").unwrap().id, extra).is_ok());
    }

    #[test]
    fn test_every_driver_of_shared_input_kept() {
        let mut graph = Graph::default();
        let root = graph.add_node(
            Node::new("Kart")
                .with_port(Port::input("Forces", DataType::Vector3).with_max_connections(0))
                .unwrap(),
        );
        let root = root.unwrap();
        let forces = graph.node(root).unwrap().input("Forces").unwrap().id;

        let drivers: Vec<NodeId> = (0..3)
            .map(|_| {
                graph
                    .add_node(
                        Node::new("Thruster")
                            .with_port(Port::output("Force", DataType::Vector3))
                            .unwrap(),
                    )
                    .unwrap()
            })
            .collect();
        for &driver in &drivers {
            let force = graph.node(driver).unwrap().output("Force").unwrap().id;
            graph.connect(force, forces).unwrap();
        }

        let summary = graph.prune_unused_nodes(&["Kart"]);
        assert_eq!(summary.removed_nodes, 0);
        assert_eq!(graph.node_count(), 4);
    }
}
