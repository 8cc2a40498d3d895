// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sample kart script: steer along the forward vector, brake for obstacles.

use ordoplay_script_graph::catalog::KART;
use ordoplay_script_graph::{BuildError, Graph, ScriptBuilder};

/// Distance below which a spherecast hit counts as an obstacle
const BRAKE_DISTANCE: f32 = 8.0;
/// Steering gain applied to the sideways component of the heading
const STEER_GAIN: f32 = -1.5;

/// Build the sample script
pub fn build_kart_script() -> Result<Graph, BuildError> {
    let mut script = ScriptBuilder::with_standard_catalog("kart_demo");

    let kart = script.node(KART)?;

    // Steering
    let heading = script.node("SplitVector3")?;
    script.wire(kart, "Forward", heading, "Vector")?;
    let steer = script.node("MultiplyFloats")?;
    script.wire(heading, "X", steer, "A")?;
    let gain = script.float(STEER_GAIN)?;
    script.connect(gain, script.input(steer, "B")?)?;
    script.wire(steer, "Result", kart, "Steer")?;

    // Obstacle probe
    let probe = script.node("Spherecast")?;
    script.wire(kart, "Position", probe, "Origin")?;
    script.wire(kart, "Forward", probe, "Direction")?;
    let radius = script.float(1.0)?;
    script.connect(radius, script.input(probe, "Radius")?)?;
    let reach = script.float(20.0)?;
    script.connect(reach, script.input(probe, "Distance")?)?;

    let close = script.node_with_modifier("CompareFloats", "LessThan")?;
    script.wire(probe, "HitDistance", close, "A")?;
    let brake_distance = script.float(BRAKE_DISTANCE)?;
    script.connect(brake_distance, script.input(close, "B")?)?;

    let blocked = script.node("And")?;
    script.wire(probe, "Hit", blocked, "A")?;
    script.wire(close, "Result", blocked, "B")?;
    script.wire(blocked, "Out", kart, "Brake")?;

    let clear = script.node("Not")?;
    script.wire(blocked, "Out", clear, "In")?;
    script.wire(clear, "Out", kart, "Accelerate")?;

    // Top speed tracker; nothing reads it, so pruning toward the kart drops it
    let top_speed = script.node("Memory")?;
    script.wire(kart, "Speed", top_speed, "Value")?;
    let always = script.node_with_modifier("BoolConstant", "True")?;
    script.wire(always, "Value", top_speed, "Write")?;

    Ok(script.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_builds() {
        let graph = build_kart_script().unwrap();
        assert_eq!(graph.nodes_of_kind(KART).count(), 1);
        assert_eq!(graph.nodes_of_kind("FloatConstant").count(), 4);
        assert_eq!(graph.node_count(), 13);
    }

    #[test]
    fn test_prune_drops_tracker() {
        let mut graph = build_kart_script().unwrap();
        let summary = graph.prune_unused_nodes(&[KART]);
        assert_eq!(summary.removed_nodes, 2);
        assert_eq!(graph.nodes_of_kind("Memory").count(), 0);
        assert_eq!(graph.nodes_of_kind("BoolConstant").count(), 0);
    }

    #[test]
    fn test_demo_is_cyclic() {
        // The kart feeds its own inputs, so the layout uses the grid
        let graph = build_kart_script().unwrap();
        assert!(graph.node_levels().is_none());
    }
}
