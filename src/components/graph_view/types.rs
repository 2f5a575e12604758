//! Graph data model shared by the lifecycle core and the canvas adapters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node in the rendered graph. Identifiers are stable across renders;
/// positions and states may change between updates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub label: Option<String>,
	/// Named visual flags (e.g. `selected`, `hovered`) driving styling,
	/// independent of position.
	#[serde(default)]
	pub states: BTreeMap<String, Value>,
}

impl GraphNode {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	pub fn at(id: impl Into<String>, x: f64, y: f64) -> Self {
		Self {
			id: id.into(),
			x: Some(x),
			y: Some(y),
			..Self::default()
		}
	}
}

/// A directed edge between two node identifiers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub states: BTreeMap<String, Value>,
}

impl GraphEdge {
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			states: BTreeMap::new(),
		}
	}
}

/// Node/edge lists handed to the canvas. `Clone` produces a value-independent
/// deep copy, which is what makes history snapshots trustworthy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}

/// Size of the rendering surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
	pub width: f64,
	pub height: f64,
}

impl Dimensions {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Which layout drives node positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
	/// Positions come from the force simulation.
	#[default]
	Force,
	/// Positions are taken as supplied; no simulation handle is created.
	Static,
}

/// Tuning knobs for the force simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceOptions {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
}

impl Default for ForceOptions {
	fn default() -> Self {
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
		}
	}
}

/// Layout configuration diffed on every external update; a structural change
/// here forces a layout recomputation just like a data change does.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
	pub kind: LayoutKind,
	pub force: ForceOptions,
}

impl LayoutConfig {
	pub fn force_directed() -> Self {
		Self::default()
	}

	pub fn static_layout() -> Self {
		Self {
			kind: LayoutKind::Static,
			force: ForceOptions::default(),
		}
	}
}
