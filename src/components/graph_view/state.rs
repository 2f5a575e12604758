//! Bulk application of persisted per-item visual states onto the canvas.

use super::canvas::GraphCanvas;
use super::types::GraphData;

/// Pushes every node and edge state in `data` onto the canvas.
///
/// Auto-paint is toggled off for the duration of the bulk pass and a single
/// explicit `paint()` is committed at the end, so intermediate state writes
/// never trigger redundant redraws. The previous auto-paint setting is
/// restored afterwards.
pub fn apply_item_states<C: GraphCanvas>(canvas: &mut C, data: &GraphData) {
	let auto_paint = canvas.auto_paint();
	canvas.set_auto_paint(false);

	for node in &data.nodes {
		for (state, value) in &node.states {
			canvas.set_item_state(&node.id, state, value.clone());
		}
	}
	for edge in &data.edges {
		for (state, value) in &edge.states {
			canvas.set_item_state(&edge.id, state, value.clone());
		}
	}

	canvas.paint();
	canvas.set_auto_paint(auto_paint);
}
