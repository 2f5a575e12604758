//! Top-level graph lifecycle orchestration.
//!
//! The controller exclusively owns the canvas, the simulation handle, the
//! history stack and the render scheduler, and enforces the ordering
//! invariants at one call site: item states apply before the full repaint of
//! the same cycle, the simulation stops before a history restore and
//! restarts before its repaint, and a history entry is captured only after
//! the corresponding repaint has committed.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};

use super::canvas::GraphCanvas;
use super::diff;
use super::history::{HistoryController, HistoryInfo, VisualSnapshot};
use super::layout::{self, ForceSimulation};
use super::scheduler::RenderScheduler;
use super::types::{Dimensions, GraphData, LayoutConfig};

/// Handle returned by an event binder; invoked exactly once to tear the
/// bindings down.
pub type EventTeardown = Box<dyn FnOnce()>;

/// Produces an event binding on demand; called on mount and again after
/// `clear` re-binds.
pub type EventBinder = Box<dyn FnMut() -> EventTeardown>;

/// Drives a [`GraphCanvas`] through mount, external updates, undo/redo,
/// clear and unmount.
pub struct GraphController<C: GraphCanvas> {
	canvas: C,
	/// Last accepted external data, pre-augmentation; the differ runs
	/// against this, never against layout-assigned positions.
	source_data: GraphData,
	/// Currently displayed data, including simulation-assigned positions.
	data: GraphData,
	layout: LayoutConfig,
	dimensions: Dimensions,
	simulation: Option<Rc<RefCell<ForceSimulation>>>,
	history: HistoryController,
	scheduler: RenderScheduler,
	event_binder: Option<EventBinder>,
	clear_events: Option<EventTeardown>,
	mounted: bool,
}

impl<C: GraphCanvas> GraphController<C> {
	pub fn new(canvas: C, data: GraphData, layout: LayoutConfig, dimensions: Dimensions) -> Self {
		Self {
			canvas,
			source_data: data.clone(),
			data,
			layout,
			dimensions,
			simulation: None,
			history: HistoryController::new(),
			scheduler: RenderScheduler::new(),
			event_binder: None,
			clear_events: None,
			mounted: false,
		}
	}

	/// Caps the history stack; oldest snapshots are evicted first.
	pub fn with_history_capacity(mut self, capacity: usize) -> Self {
		self.history = HistoryController::with_capacity(capacity);
		self
	}

	/// Registers the event subsystem. The binder runs on mount and again
	/// when `clear` re-binds; its teardown handle runs on unmount.
	pub fn set_event_binder(&mut self, binder: impl FnMut() -> EventTeardown + 'static) {
		self.event_binder = Some(Box::new(binder));
	}

	/// Binds events, starts the simulation and performs the initial render
	/// (border-node fast paint, state application, deferred full paint).
	/// The first history snapshot is captured when that deferred paint is
	/// flushed.
	pub fn mount(&mut self) {
		debug_assert!(!self.mounted, "mount called twice");
		self.bind_events();

		let (augmented, simulation) = layout::start(&self.data, &self.layout, self.dimensions);
		self.data = augmented;
		self.simulation = simulation;
		self.scheduler.render(&mut self.canvas, &self.data);
		self.mounted = true;
		debug!("mounted with {} node(s)", self.data.nodes.len());
	}

	/// Entry point for external data/config changes.
	///
	/// Data and layout are diffed independently; if neither differs
	/// structurally this is a complete no-op (no paint, no history entry)
	/// and `false` is returned. Otherwise the layout is recomputed with a
	/// fresh simulation handle and a repaint is scheduled.
	pub fn update(&mut self, new_data: Option<GraphData>, new_layout: Option<LayoutConfig>) -> bool {
		let data_changed = new_data
			.as_ref()
			.is_some_and(|d| diff::changed(&self.source_data, d));
		let layout_changed = new_layout
			.as_ref()
			.is_some_and(|l| diff::changed(&self.layout, l));
		if !data_changed && !layout_changed {
			return false;
		}

		let base = if data_changed {
			let new_data = new_data.unwrap_or_default();
			self.source_data = new_data.clone();
			new_data
		} else {
			self.data.clone()
		};
		if layout_changed {
			if let Some(new_layout) = new_layout {
				self.layout = new_layout;
			}
		}

		self.stop_simulation();
		let (augmented, simulation) = layout::start(&base, &self.layout, self.dimensions);
		self.data = augmented;
		self.simulation = simulation;
		self.scheduler.render(&mut self.canvas, &self.data);
		true
	}

	/// Runs the coalesced deferred full paint, then captures a history
	/// snapshot reflecting the canvas *after* drawing. Returns whether a
	/// paint happened. The host calls this on its next tick after `mount`
	/// or an accepted `update`.
	pub fn flush_deferred(&mut self) -> bool {
		if !self.scheduler.flush(&mut self.canvas) {
			return false;
		}
		self.save_history();
		true
	}

	/// Restores the previous snapshot: simulation stops first, then the
	/// snapshot's positions re-seed it, then the structural save is painted
	/// directly. A no-op returning `false` at the earliest entry.
	pub fn undo(&mut self) -> bool {
		self.stop_simulation();
		match self.history.undo() {
			Some(snapshot) => {
				self.restore_snapshot(snapshot);
				true
			}
			None => false,
		}
	}

	/// Symmetric to [`GraphController::undo`], toward the latest entry.
	pub fn redo(&mut self) -> bool {
		self.stop_simulation();
		match self.history.redo() {
			Some(snapshot) => {
				self.restore_snapshot(snapshot);
				true
			}
			None => false,
		}
	}

	/// Hard reset to an empty graph: wipes the canvas, drops all history,
	/// re-binds events and repaints empty data synchronously. Deliberately
	/// pushes no snapshot; the empty state is not an undoable edit.
	pub fn clear(&mut self) {
		self.stop_simulation();
		self.canvas.clear();
		self.history.reset();

		if let Some(teardown) = self.clear_events.take() {
			teardown();
		}
		self.bind_events();

		self.source_data = GraphData::default();
		self.data = GraphData::default();
		self.simulation = None;
		self.scheduler.render_direct(&mut self.canvas, &self.data);
		debug!("cleared");
	}

	/// Advances a running simulation and repaints the moved positions.
	/// Returns `false` when no simulation is running. Pumped by the host's
	/// animation loop.
	pub fn advance_simulation(&mut self, dt: f32) -> bool {
		let Some(simulation) = self.simulation.clone() else {
			return false;
		};
		{
			let mut simulation = simulation.borrow_mut();
			if !simulation.is_running() {
				return false;
			}
			simulation.tick(dt);
			let mut moved = self.data.clone();
			simulation.write_positions(&mut moved);
			self.data = moved;
		}
		self.canvas.change_data(&self.data);
		true
	}

	/// Synchronous teardown: halts the simulation and invokes the event
	/// teardown exactly once. A registered binder whose teardown handle is
	/// missing here is a programmer error.
	pub fn unmount(&mut self) {
		self.stop_simulation();
		match self.clear_events.take() {
			Some(teardown) => teardown(),
			None => {
				if self.mounted && self.event_binder.is_some() {
					error!("unmount without event teardown handle");
					debug_assert!(false, "unmount without event teardown handle");
				}
			}
		}
		self.mounted = false;
	}

	pub fn history_info(&self) -> HistoryInfo {
		self.history.info()
	}

	pub fn has_pending_paint(&self) -> bool {
		self.scheduler.has_pending()
	}

	pub fn is_mounted(&self) -> bool {
		self.mounted
	}

	/// Currently displayed (augmented) data.
	pub fn data(&self) -> &GraphData {
		&self.data
	}

	pub fn dimensions(&self) -> Dimensions {
		self.dimensions
	}

	pub fn simulation(&self) -> Option<&Rc<RefCell<ForceSimulation>>> {
		self.simulation.as_ref()
	}

	pub fn canvas(&self) -> &C {
		&self.canvas
	}

	pub fn canvas_mut(&mut self) -> &mut C {
		&mut self.canvas
	}

	fn bind_events(&mut self) {
		if let Some(binder) = self.event_binder.as_mut() {
			self.clear_events = Some(binder());
		}
	}

	fn stop_simulation(&mut self) {
		if let Some(simulation) = &self.simulation {
			simulation.borrow_mut().stop();
		}
	}

	fn restore_snapshot(&mut self, snapshot: VisualSnapshot) {
		self.dimensions = snapshot.dimensions;
		self.simulation = snapshot.force_simulation.clone();
		if let Some(simulation) = &self.simulation {
			simulation.borrow_mut().restart(&snapshot.graph_save.nodes);
		}
		self.data = snapshot.data.clone();
		self.scheduler.render_direct(&mut self.canvas, &snapshot.graph_save);
	}

	fn save_history(&mut self) {
		let snapshot = VisualSnapshot {
			data: self.data.clone(),
			force_simulation: self.simulation.clone(),
			dimensions: self.dimensions,
			graph_save: self.canvas.save(),
		};
		self.history.save(&snapshot);
	}
}
