//! Render sequencing: fast first paint, state application, deferred full
//! paint, and the direct path used by undo/redo.
//!
//! The deferred full paint never runs inside the unit of work that triggered
//! it; the host pumps [`RenderScheduler::flush`] on its next tick. Multiple
//! triggers within one tick coalesce to the latest scheduled data set, so at
//! most one full repaint is pending at a time.

use log::debug;

use super::canvas::{CanvasEvent, GraphCanvas};
use super::state::apply_item_states;
use super::types::{GraphData, GraphNode};

/// Reduces a node set to at most four nodes: those at the minimum/maximum
/// `x` and minimum/maximum `y`, deduplicated by identifier, with no edges.
///
/// An initial fit-to-view over a huge node set is expensive; the extreme
/// nodes alone span the same bounding box. Nodes without coordinates are
/// skipped.
pub fn border_nodes(data: &GraphData) -> GraphData {
	let positioned: Vec<&GraphNode> = data
		.nodes
		.iter()
		.filter(|n| n.x.is_some() && n.y.is_some())
		.collect();

	let cmp = |a: f64, b: f64| a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
	let extremes = [
		positioned.iter().min_by(|a, b| cmp(a.x.unwrap_or(0.0), b.x.unwrap_or(0.0))),
		positioned.iter().max_by(|a, b| cmp(a.x.unwrap_or(0.0), b.x.unwrap_or(0.0))),
		positioned.iter().min_by(|a, b| cmp(a.y.unwrap_or(0.0), b.y.unwrap_or(0.0))),
		positioned.iter().max_by(|a, b| cmp(a.y.unwrap_or(0.0), b.y.unwrap_or(0.0))),
	];

	let mut nodes: Vec<GraphNode> = Vec::with_capacity(4);
	for candidate in extremes.into_iter().flatten() {
		if !nodes.iter().any(|n| n.id == candidate.id) {
			nodes.push((**candidate).clone());
		}
	}

	GraphData {
		nodes,
		edges: Vec::new(),
	}
}

/// Orchestrates the draw sequence around a [`GraphCanvas`].
#[derive(Default)]
pub struct RenderScheduler {
	first_render_done: bool,
	pending: Option<GraphData>,
}

impl RenderScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// The normal render path. On the very first call the border-node
	/// subset is painted and `FirstRender` emitted before anything else;
	/// every call then applies persisted item states and schedules a
	/// deferred full paint of `data`, replacing any paint still pending.
	pub fn render<C: GraphCanvas>(&mut self, canvas: &mut C, data: &GraphData) {
		if !self.first_render_done {
			let reduced = border_nodes(data);
			debug!("first paint with {} border node(s)", reduced.nodes.len());
			canvas.change_data(&reduced);
			canvas.emit(CanvasEvent::FirstRender);
			self.first_render_done = true;
		}
		apply_item_states(canvas, data);
		self.pending = Some(data.clone());
	}

	/// Runs the pending full paint, if any. Returns whether a paint
	/// happened.
	pub fn flush<C: GraphCanvas>(&mut self, canvas: &mut C) -> bool {
		let Some(data) = self.pending.take() else {
			return false;
		};
		canvas.change_data(&data);
		canvas.emit(CanvasEvent::AfterChangeData);
		true
	}

	/// Direct full paint, bypassing border reduction and state
	/// re-application. Used for history restores and for clearing; any
	/// pending deferred paint is dropped since this paint supersedes it.
	pub fn render_direct<C: GraphCanvas>(&mut self, canvas: &mut C, data: &GraphData) {
		self.pending = None;
		canvas.change_data(data);
		canvas.emit(CanvasEvent::AfterChangeData);
	}

	pub fn has_pending(&self) -> bool {
		self.pending.is_some()
	}
}
