//! Linear undo/redo over full visual snapshots.
//!
//! Snapshot-based rather than delta-based: every entry is a complete deep
//! copy of the displayed state, so restoring needs no inverse-operation
//! bookkeeping. Entries are never mutated after insertion; a save while the
//! cursor sits behind the tail discards the divergent forward history first.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::layout::ForceSimulation;
use super::types::{Dimensions, GraphData};

/// One undoable unit: the displayed data, the simulation handle that was
/// driving it, the surface dimensions and the canvas' structural save.
///
/// `graph_save` must already be a value-independent deep copy when handed to
/// [`HistoryController::save`]; later mutation of live canvas state must not
/// reach into stored history.
#[derive(Clone)]
pub struct VisualSnapshot {
	pub data: GraphData,
	pub force_simulation: Option<Rc<RefCell<ForceSimulation>>>,
	pub dimensions: Dimensions,
	pub graph_save: GraphData,
}

/// Introspection for UI affordances (enabling/disabling undo and redo
/// controls).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryInfo {
	pub can_undo: bool,
	pub can_redo: bool,
	pub size: usize,
}

/// Append-with-truncation snapshot store plus a cursor.
///
/// Unbounded by default; [`HistoryController::with_capacity`] turns it into
/// a ring that evicts the oldest snapshot first.
#[derive(Default)]
pub struct HistoryController {
	snapshots: Vec<VisualSnapshot>,
	/// Index of the currently displayed snapshot; `None` before the first
	/// save.
	cursor: Option<usize>,
	capacity: Option<usize>,
}

impl HistoryController {
	pub fn new() -> Self {
		Self::default()
	}

	/// A bounded stack holding at most `capacity` snapshots (minimum 1).
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			capacity: Some(capacity.max(1)),
			..Self::default()
		}
	}

	/// Deep-copies `current`, discards any forward history past the cursor
	/// and appends, leaving the cursor at the new tail.
	pub fn save(&mut self, current: &VisualSnapshot) {
		match self.cursor {
			Some(cursor) => self.snapshots.truncate(cursor + 1),
			None => self.snapshots.clear(),
		}
		self.snapshots.push(current.clone());
		if let Some(capacity) = self.capacity {
			while self.snapshots.len() > capacity {
				self.snapshots.remove(0);
			}
		}
		self.cursor = Some(self.snapshots.len() - 1);
		debug!("history saved, {} snapshot(s)", self.snapshots.len());
	}

	/// Moves the cursor one step back and returns the snapshot now under
	/// it; `None` (and no state change) at the earliest entry.
	pub fn undo(&mut self) -> Option<VisualSnapshot> {
		let cursor = self.cursor?;
		if cursor == 0 {
			return None;
		}
		self.cursor = Some(cursor - 1);
		Some(self.snapshots[cursor - 1].clone())
	}

	/// Moves the cursor one step toward the tail and returns the snapshot
	/// now under it; `None` (and no state change) at the latest entry.
	pub fn redo(&mut self) -> Option<VisualSnapshot> {
		let cursor = self.cursor?;
		if cursor + 1 >= self.snapshots.len() {
			return None;
		}
		self.cursor = Some(cursor + 1);
		Some(self.snapshots[cursor + 1].clone())
	}

	/// Drops all snapshots; used when the graph is cleared to empty.
	pub fn reset(&mut self) {
		self.snapshots.clear();
		self.cursor = None;
	}

	pub fn info(&self) -> HistoryInfo {
		HistoryInfo {
			can_undo: self.cursor.is_some_and(|c| c > 0),
			can_redo: self.cursor.is_some_and(|c| c + 1 < self.snapshots.len()),
			size: self.snapshots.len(),
		}
	}
}
