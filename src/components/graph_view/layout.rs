//! Force-simulation coordination.
//!
//! The physics engine is a black box; this module owns its lifecycle so it
//! stays in lockstep with the displayed snapshot. `start` always produces a
//! fresh handle bound to the given node set, `restart` re-seeds a handle
//! from historical positions during undo/redo, `stop` is an idempotent halt.
//! In static layout mode no handle exists and every operation degrades to a
//! no-op at the caller.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::{Dimensions, GraphData, GraphNode, LayoutConfig, LayoutKind};

/// Radius of the ring new nodes are seeded on before the simulation spreads
/// them out.
const SEED_RADIUS: f64 = 100.0;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(0);

/// Per-node payload kept inside the physics graph so positions can be
/// matched back to data nodes by identifier.
#[derive(Clone, Debug, Default)]
struct NodeTag {
	id: String,
}

/// A running (or halted) physics simulation bound to one node set.
///
/// Handles are replaced, never rebuilt in place: every layout recomputation
/// yields a new `ForceSimulation` with a fresh generation number.
pub struct ForceSimulation {
	graph: ForceGraph<NodeTag, ()>,
	running: bool,
	generation: u64,
}

impl ForceSimulation {
	fn new(graph: ForceGraph<NodeTag, ()>) -> Self {
		Self {
			graph,
			running: true,
			generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
		}
	}

	/// Identifies this handle; a recomputed layout always carries a new
	/// generation.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Halts ticking. Idempotent.
	pub fn stop(&mut self) {
		if self.running {
			debug!("simulation {} stopped", self.generation);
		}
		self.running = false;
	}

	/// Re-seeds the simulation from an externally supplied node list and
	/// resumes ticking. Used when a history snapshot is restored so physics
	/// continues from the historical positions rather than the live ones.
	pub fn restart(&mut self, nodes: &[GraphNode]) {
		let positions: HashMap<&str, (f32, f32)> = nodes
			.iter()
			.filter_map(|n| match (n.x, n.y) {
				(Some(x), Some(y)) => Some((n.id.as_str(), (x as f32, y as f32))),
				_ => None,
			})
			.collect();

		self.graph.visit_nodes_mut(|node| {
			if let Some(&(x, y)) = positions.get(node.data.user_data.id.as_str()) {
				node.data.x = x;
				node.data.y = y;
			}
		});
		self.running = true;
		debug!("simulation {} restarted from {} node positions", self.generation, positions.len());
	}

	/// Advances the physics by `dt` seconds; a halted simulation does not
	/// move.
	pub fn tick(&mut self, dt: f32) {
		if self.running {
			self.graph.update(dt);
		}
	}

	/// Writes the simulation's current positions back into matching nodes.
	pub fn write_positions(&self, data: &mut GraphData) {
		let mut positions: HashMap<String, (f64, f64)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		for node in &mut data.nodes {
			if let Some(&(x, y)) = positions.get(&node.id) {
				node.x = Some(x);
				node.y = Some(y);
			}
		}
	}
}

/// Computes augmented data and a simulation handle for a node set.
///
/// Nodes without coordinates are seeded on a ring around the canvas center;
/// nodes that already carry positions keep them. `LayoutKind::Static`
/// returns the data as supplied and no handle.
pub fn start(
	data: &GraphData,
	layout: &LayoutConfig,
	dimensions: Dimensions,
) -> (GraphData, Option<Rc<RefCell<ForceSimulation>>>) {
	let mut augmented = data.clone();
	if layout.kind == LayoutKind::Static {
		return (augmented, None);
	}

	let opts = &layout.force;
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: opts.charge,
		force_spring: opts.spring,
		force_max: opts.max_force,
		node_speed: opts.node_speed,
		damping_factor: opts.damping,
	});

	let (cx, cy) = (dimensions.width / 2.0, dimensions.height / 2.0);
	let count = augmented.nodes.len().max(1);
	let mut id_to_idx = HashMap::new();

	for (i, node) in augmented.nodes.iter_mut().enumerate() {
		let (x, y) = match (node.x, node.y) {
			(Some(x), Some(y)) => (x, y),
			_ => {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				(cx + SEED_RADIUS * angle.cos(), cy + SEED_RADIUS * angle.sin())
			}
		};
		node.x = Some(x);
		node.y = Some(y);

		let idx = graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: NodeTag { id: node.id.clone() },
		});
		id_to_idx.insert(node.id.clone(), idx);
	}

	for edge in &augmented.edges {
		if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
		{
			graph.add_edge(src, tgt, EdgeData::default());
		}
	}

	let simulation = ForceSimulation::new(graph);
	debug!(
		"simulation {} started with {} nodes",
		simulation.generation,
		augmented.nodes.len()
	);
	(augmented, Some(Rc::new(RefCell::new(simulation))))
}
