//! Schematic layout and rendering contract.
//!
//! Each topology maps to a fixed schematic: components and junctions as
//! graph nodes, conductor wire segments as edges, built on petgraph. The
//! graph structure gives the renderer ordered conductor paths for the
//! marching-dash effect and lets it look up which branch a segment
//! belongs to.
//!
//! The core hands the renderer exactly three live parameters per frame:
//! switch state, per-component glow (clamped to a displayable range here,
//! not in the physics), and the animation phase offset (applied only while
//! the switch is closed).

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::animation::PHASE_PERIOD;
use crate::config::{CircuitTopology, ComponentId};
use crate::physics::DerivedElectricalState;

/// Display glow range. Brightness below the floor still renders a faint
/// outline so components stay visible with the switch open.
pub const MIN_GLOW: f64 = 0.1;
pub const MAX_GLOW: f64 = 1.0;

/// Reference canvas the fixed layouts are laid out on.
pub const CANVAS_WIDTH: f64 = 400.0;
pub const CANVAS_HEIGHT: f64 = 300.0;

/// Clamp an unclamped physics brightness into the displayable glow range.
pub fn clamp_glow(brightness: f64) -> f64 {
    brightness.clamp(MIN_GLOW, MAX_GLOW)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a schematic node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Battery,
    Switch,
    Lamp(ComponentId),
    Capacitor,
    Junction,
}

/// Node in the schematic graph: a component or wire junction at a fixed
/// canvas position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchematicNode {
    pub label: String,
    pub kind: NodeKind,
    pub position: Point,
}

/// Edge in the schematic graph: a polyline wire segment. `branch` names
/// the component whose branch current the segment carries; `None` for the
/// shared main loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSegment {
    pub points: Vec<Point>,
    pub branch: Option<ComponentId>,
}

impl WireSegment {
    fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            branch: None,
        }
    }

    fn with_branch(mut self, branch: ComponentId) -> Self {
        self.branch = Some(branch);
        self
    }
}

/// Fixed schematic layout for one topology.
#[derive(Debug, Clone)]
pub struct SchematicLayout {
    topology: CircuitTopology,
    graph: DiGraph<SchematicNode, WireSegment>,
    node_indices: HashMap<String, NodeIndex>,
}

impl SchematicLayout {
    /// Build the fixed layout for a topology. Geometry is a rendering
    /// convention; the parameter set in [`RenderFrame`] is the contract.
    pub fn for_topology(topology: CircuitTopology) -> Self {
        let mut layout = Self {
            topology,
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        };
        match topology {
            CircuitTopology::Series => layout.build_series(),
            CircuitTopology::Parallel => layout.build_parallel(),
            CircuitTopology::RcDelay => layout.build_rc_delay(),
        }
        layout
    }

    pub fn topology(&self) -> CircuitTopology {
        self.topology
    }

    fn add_node(&mut self, label: &str, kind: NodeKind, x: f64, y: f64) -> NodeIndex {
        let idx = self.graph.add_node(SchematicNode {
            label: label.to_string(),
            kind,
            position: Point::new(x, y),
        });
        self.node_indices.insert(label.to_string(), idx);
        idx
    }

    fn add_wire(&mut self, from: NodeIndex, to: NodeIndex, segment: WireSegment) {
        self.graph.add_edge(from, to, segment);
    }

    fn build_series(&mut self) {
        let bat = self.add_node("BAT", NodeKind::Battery, 40.0, 150.0);
        let sw = self.add_node("SW", NodeKind::Switch, 130.0, 60.0);
        let l1 = self.add_node("L1", NodeKind::Lamp(ComponentId::Lamp1), 250.0, 60.0);
        let l2 = self.add_node("L2", NodeKind::Lamp(ComponentId::Lamp2), 330.0, 150.0);

        self.add_wire(
            bat,
            sw,
            WireSegment::new(vec![
                Point::new(40.0, 150.0),
                Point::new(40.0, 60.0),
                Point::new(130.0, 60.0),
            ]),
        );
        self.add_wire(
            sw,
            l1,
            WireSegment::new(vec![Point::new(130.0, 60.0), Point::new(250.0, 60.0)]),
        );
        self.add_wire(
            l1,
            l2,
            WireSegment::new(vec![
                Point::new(250.0, 60.0),
                Point::new(330.0, 60.0),
                Point::new(330.0, 150.0),
            ]),
        );
        self.add_wire(
            l2,
            bat,
            WireSegment::new(vec![
                Point::new(330.0, 150.0),
                Point::new(330.0, 240.0),
                Point::new(40.0, 240.0),
                Point::new(40.0, 150.0),
            ]),
        );
    }

    fn build_parallel(&mut self) {
        let bat = self.add_node("BAT", NodeKind::Battery, 40.0, 150.0);
        let sw = self.add_node("SW", NodeKind::Switch, 130.0, 60.0);
        let jtop = self.add_node("J1", NodeKind::Junction, 200.0, 60.0);
        let l1 = self.add_node("L1", NodeKind::Lamp(ComponentId::Lamp1), 250.0, 150.0);
        let l2 = self.add_node("L2", NodeKind::Lamp(ComponentId::Lamp2), 330.0, 150.0);
        let jbot = self.add_node("J2", NodeKind::Junction, 200.0, 240.0);

        self.add_wire(
            bat,
            sw,
            WireSegment::new(vec![
                Point::new(40.0, 150.0),
                Point::new(40.0, 60.0),
                Point::new(130.0, 60.0),
            ]),
        );
        self.add_wire(
            sw,
            jtop,
            WireSegment::new(vec![Point::new(130.0, 60.0), Point::new(200.0, 60.0)]),
        );
        self.add_wire(
            jtop,
            l1,
            WireSegment::new(vec![
                Point::new(200.0, 60.0),
                Point::new(250.0, 60.0),
                Point::new(250.0, 150.0),
            ])
            .with_branch(ComponentId::Lamp1),
        );
        self.add_wire(
            jtop,
            l2,
            WireSegment::new(vec![
                Point::new(200.0, 60.0),
                Point::new(330.0, 60.0),
                Point::new(330.0, 150.0),
            ])
            .with_branch(ComponentId::Lamp2),
        );
        self.add_wire(
            l1,
            jbot,
            WireSegment::new(vec![
                Point::new(250.0, 150.0),
                Point::new(250.0, 240.0),
                Point::new(200.0, 240.0),
            ])
            .with_branch(ComponentId::Lamp1),
        );
        self.add_wire(
            l2,
            jbot,
            WireSegment::new(vec![
                Point::new(330.0, 150.0),
                Point::new(330.0, 240.0),
                Point::new(200.0, 240.0),
            ])
            .with_branch(ComponentId::Lamp2),
        );
        self.add_wire(
            jbot,
            bat,
            WireSegment::new(vec![
                Point::new(200.0, 240.0),
                Point::new(40.0, 240.0),
                Point::new(40.0, 150.0),
            ]),
        );
    }

    fn build_rc_delay(&mut self) {
        let bat = self.add_node("BAT", NodeKind::Battery, 40.0, 150.0);
        let sw = self.add_node("SW", NodeKind::Switch, 130.0, 60.0);
        let l1 = self.add_node("L1", NodeKind::Lamp(ComponentId::Lamp1), 230.0, 60.0);
        let cap = self.add_node("C1", NodeKind::Capacitor, 330.0, 150.0);

        self.add_wire(
            bat,
            sw,
            WireSegment::new(vec![
                Point::new(40.0, 150.0),
                Point::new(40.0, 60.0),
                Point::new(130.0, 60.0),
            ]),
        );
        self.add_wire(
            sw,
            l1,
            WireSegment::new(vec![Point::new(130.0, 60.0), Point::new(230.0, 60.0)]),
        );
        self.add_wire(
            l1,
            cap,
            WireSegment::new(vec![
                Point::new(230.0, 60.0),
                Point::new(330.0, 60.0),
                Point::new(330.0, 150.0),
            ]),
        );
        self.add_wire(
            cap,
            bat,
            WireSegment::new(vec![
                Point::new(330.0, 150.0),
                Point::new(330.0, 240.0),
                Point::new(40.0, 240.0),
                Point::new(40.0, 150.0),
            ]),
        );
    }

    /// Look up a node by label.
    pub fn node(&self, label: &str) -> Option<&SchematicNode> {
        self.node_indices
            .get(label)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// All schematic nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &SchematicNode> {
        self.graph.node_weights()
    }

    /// Component nodes only (everything but wire junctions).
    pub fn components(&self) -> impl Iterator<Item = &SchematicNode> {
        self.nodes().filter(|n| n.kind != NodeKind::Junction)
    }

    /// Lamp nodes, the glow-bearing components.
    pub fn lamps(&self) -> impl Iterator<Item = (ComponentId, &SchematicNode)> {
        self.nodes().filter_map(|n| match n.kind {
            NodeKind::Lamp(id) => Some((id, n)),
            _ => None,
        })
    }

    /// All wire segments in loop order.
    pub fn segments(&self) -> impl Iterator<Item = &WireSegment> {
        self.graph.edge_weights()
    }

    /// Wire segments carrying a specific branch current.
    pub fn segments_for_branch(&self, branch: ComponentId) -> Vec<&WireSegment> {
        self.segments()
            .filter(|s| s.branch == Some(branch))
            .collect()
    }

    /// Node labels along the conductor path between two components.
    pub fn conductor_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        use petgraph::algo::astar;

        let from_idx = self.node_indices.get(from)?;
        let to_idx = self.node_indices.get(to)?;

        let result = astar(&self.graph, *from_idx, |n| n == *to_idx, |_| 1, |_| 0);

        result.map(|(_, path)| {
            path.into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).map(|n| n.label.clone()))
                .collect()
        })
    }

    /// Compose an evaluated state with this layout into the full set of
    /// parameters the renderer accepts.
    pub fn render_frame(
        &self,
        state: &DerivedElectricalState,
        switch_closed: bool,
        phase_offset: f64,
    ) -> RenderFrame {
        // Dashes only march while the switch is closed.
        let dash_offset = if switch_closed {
            phase_offset.rem_euclid(PHASE_PERIOD)
        } else {
            0.0
        };

        let segments = self
            .graph
            .edge_references()
            .map(|edge| {
                let segment = edge.weight();
                SegmentParams {
                    points: segment.points.clone(),
                    branch: segment.branch,
                    dash_offset,
                    flowing: switch_closed,
                }
            })
            .collect();

        let glows = self
            .lamps()
            .map(|(id, node)| GlowParams {
                component: id,
                position: node.position,
                intensity: clamp_glow(state.brightness(id)),
            })
            .collect();

        RenderFrame {
            topology: self.topology,
            switch_closed,
            segments,
            glows,
            capacitor_voltage: state.capacitor_voltage,
        }
    }
}

/// Per-segment render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentParams {
    pub points: Vec<Point>,
    pub branch: Option<ComponentId>,
    /// Dashed-stroke offset along the conductor path; 0 and static while
    /// the switch is open.
    pub dash_offset: f64,
    pub flowing: bool,
}

/// Per-lamp render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlowParams {
    pub component: ComponentId,
    pub position: Point,
    /// Glow intensity clamped into `[MIN_GLOW, MAX_GLOW]`.
    pub intensity: f64,
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub topology: CircuitTopology,
    pub switch_closed: bool,
    pub segments: Vec<SegmentParams>,
    pub glows: Vec<GlowParams>,
    pub capacitor_voltage: Option<f64>,
}
