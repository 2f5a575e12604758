//! Rendering-surface collaborator contract.
//!
//! The lifecycle controller owns exactly one canvas and drives it through
//! this narrow interface; no other component retains the canvas across
//! calls. The web adapter in `render` implements it against a 2d context,
//! tests implement it with a recording double.

use serde_json::Value;

use super::types::GraphData;

/// Notifications the core emits for external collaborators (e.g. a
/// fit-to-view pass listening for the first paint).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasEvent {
	/// The cheap initial paint of the border-node subset has been committed.
	FirstRender,
	/// A full paint of the current data set has been committed.
	AfterChangeData,
}

/// An opaque drawing surface that accepts a node/edge list and draws it.
pub trait GraphCanvas {
	/// Replaces the rendered data set; repaints immediately when auto-paint
	/// is on.
	fn change_data(&mut self, data: &GraphData);

	/// Returns a value-independent structural save of everything currently
	/// rendered. The result must not alias the canvas' live state.
	fn save(&self) -> GraphData;

	/// Wipes the surface and forgets the rendered data set.
	fn clear(&mut self);

	fn auto_paint(&self) -> bool;

	fn set_auto_paint(&mut self, on: bool);

	/// Explicitly commits a paint of the current data set.
	fn paint(&mut self);

	/// Sets a named visual state on a node or edge. With auto-paint off this
	/// only records the state; the caller paints once after the bulk pass.
	fn set_item_state(&mut self, item_id: &str, state: &str, value: Value);

	fn emit(&mut self, event: CanvasEvent);
}
