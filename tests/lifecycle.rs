//! End-to-end lifecycle scenarios driven through a recording canvas double.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{Value, json};

use graph_view_canvas::components::graph_view::{
	CanvasEvent, Dimensions, GraphCanvas, GraphController, GraphData, GraphEdge, GraphNode,
	LayoutConfig,
};

#[derive(Clone, Debug, PartialEq)]
enum Op {
	ChangeData(GraphData),
	Paint,
	SetAutoPaint(bool),
	SetItemState(String, String, Value),
	Emit(CanvasEvent),
	Clear,
}

/// Canvas double recording every operation in order.
#[derive(Default)]
struct RecordingCanvas {
	data: GraphData,
	auto_paint_off: bool,
	ops: Vec<Op>,
}

impl RecordingCanvas {
	fn new() -> Self {
		Self::default()
	}

	fn change_data_calls(&self) -> Vec<&GraphData> {
		self.ops
			.iter()
			.filter_map(|op| match op {
				Op::ChangeData(data) => Some(data),
				_ => None,
			})
			.collect()
	}

	fn events(&self) -> Vec<CanvasEvent> {
		self.ops
			.iter()
			.filter_map(|op| match op {
				Op::Emit(event) => Some(*event),
				_ => None,
			})
			.collect()
	}

	fn last_op_index(&self, matches: impl Fn(&Op) -> bool) -> Option<usize> {
		self.ops.iter().rposition(matches)
	}
}

impl GraphCanvas for RecordingCanvas {
	fn change_data(&mut self, data: &GraphData) {
		self.data = data.clone();
		self.ops.push(Op::ChangeData(data.clone()));
	}

	fn save(&self) -> GraphData {
		self.data.clone()
	}

	fn clear(&mut self) {
		self.data = GraphData::default();
		self.ops.push(Op::Clear);
	}

	fn auto_paint(&self) -> bool {
		!self.auto_paint_off
	}

	fn set_auto_paint(&mut self, on: bool) {
		self.auto_paint_off = !on;
		self.ops.push(Op::SetAutoPaint(on));
	}

	fn paint(&mut self) {
		self.ops.push(Op::Paint);
	}

	fn set_item_state(&mut self, item_id: &str, state: &str, value: Value) {
		if let Some(node) = self.data.nodes.iter_mut().find(|n| n.id == item_id) {
			node.states.insert(state.to_string(), value.clone());
		}
		self.ops
			.push(Op::SetItemState(item_id.to_string(), state.to_string(), value));
	}

	fn emit(&mut self, event: CanvasEvent) {
		self.ops.push(Op::Emit(event));
	}
}

fn two_node_data() -> GraphData {
	GraphData {
		nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
		edges: vec![GraphEdge::new("e1", "a", "b")],
	}
}

fn with_extra_node(mut data: GraphData, id: &str, anchor: &str) -> GraphData {
	data.nodes.push(GraphNode::new(id));
	data.edges
		.push(GraphEdge::new(format!("e-{}", id), id, anchor));
	data
}

fn mounted_controller() -> GraphController<RecordingCanvas> {
	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		two_node_data(),
		LayoutConfig::force_directed(),
		Dimensions::new(800.0, 600.0),
	);
	controller.mount();
	controller
}

#[test]
fn mount_paints_border_subset_then_full_data() {
	let mut controller = mounted_controller();

	{
		let canvas = controller.canvas();
		let calls = canvas.change_data_calls();
		assert_eq!(calls.len(), 1, "only the border paint before the flush");
		assert!(calls[0].nodes.len() <= 4);
		assert!(calls[0].edges.is_empty());
		assert_eq!(canvas.events(), vec![CanvasEvent::FirstRender]);
	}
	assert_eq!(controller.history_info().size, 0, "snapshot waits for the flush");
	assert!(controller.has_pending_paint());

	assert!(controller.flush_deferred());
	let canvas = controller.canvas();
	let calls = canvas.change_data_calls();
	assert_eq!(calls.len(), 2);
	assert_eq!(calls[1].nodes.len(), 2);
	assert_eq!(calls[1].edges.len(), 1);
	assert!(
		calls[1].nodes.iter().all(|n| n.x.is_some() && n.y.is_some()),
		"full paint uses layout-augmented data"
	);
	assert_eq!(
		canvas.events(),
		vec![CanvasEvent::FirstRender, CanvasEvent::AfterChangeData]
	);
	assert_eq!(controller.history_info().size, 1);
}

#[test]
fn item_states_apply_before_the_full_repaint() {
	let mut data = two_node_data();
	data.nodes[0]
		.states
		.insert("selected".to_string(), json!(true));

	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		data,
		LayoutConfig::force_directed(),
		Dimensions::new(800.0, 600.0),
	);
	controller.mount();
	controller.flush_deferred();

	let canvas = controller.canvas();
	let state_idx = canvas
		.last_op_index(|op| {
			matches!(op, Op::SetItemState(id, state, _) if id.as_str() == "a" && state.as_str() == "selected")
		})
		.expect("state applied");
	let paint_idx = canvas
		.last_op_index(|op| matches!(op, Op::Paint))
		.expect("bulk pass paints once");
	let full_paint_idx = canvas
		.last_op_index(|op| matches!(op, Op::ChangeData(_)))
		.unwrap();
	assert!(state_idx < paint_idx && paint_idx < full_paint_idx);

	// Auto-paint is toggled off for the bulk pass and restored after.
	let off_idx = canvas
		.last_op_index(|op| matches!(op, Op::SetAutoPaint(false)))
		.unwrap();
	let on_idx = canvas
		.last_op_index(|op| matches!(op, Op::SetAutoPaint(true)))
		.unwrap();
	assert!(off_idx < state_idx && state_idx < on_idx);
}

#[test]
fn unchanged_update_is_a_complete_noop() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	let ops_before = controller.canvas().ops.len();

	assert!(!controller.update(Some(two_node_data()), None));
	assert!(!controller.has_pending_paint());
	assert!(!controller.flush_deferred());

	assert_eq!(controller.canvas().ops.len(), ops_before);
	assert_eq!(controller.history_info().size, 1);
}

#[test]
fn unchanged_layout_update_is_also_a_noop() {
	let mut controller = mounted_controller();
	controller.flush_deferred();

	assert!(!controller.update(None, Some(LayoutConfig::force_directed())));
	assert!(!controller.update(None, None));
}

#[test]
fn accepted_update_replaces_the_simulation_handle() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	let first = controller.simulation().unwrap().clone();

	assert!(controller.update(Some(with_extra_node(two_node_data(), "c", "a")), None));
	let second = controller.simulation().unwrap();
	assert!(!Rc::ptr_eq(&first, second), "a new handle, not the same reference");
	assert_ne!(
		first.borrow().generation(),
		second.borrow().generation()
	);
	assert!(!first.borrow().is_running(), "the replaced handle no longer ticks");

	controller.flush_deferred();
	assert_eq!(controller.history_info().size, 2);
}

#[test]
fn undo_restores_the_snapshot_captured_at_mount() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	let mount_save = controller.canvas().save();
	assert_eq!(controller.history_info().size, 1);

	assert!(controller.update(Some(with_extra_node(two_node_data(), "c", "a")), None));
	controller.flush_deferred();
	assert_eq!(controller.history_info().size, 2);
	assert!(controller.canvas().data.nodes.iter().any(|n| n.id == "c"));

	let sim_before_undo = controller.simulation().unwrap().clone();
	assert!(controller.undo());

	let canvas = controller.canvas();
	assert_eq!(canvas.data, mount_save, "structural save equals the mount-time entry");
	assert!(!canvas.data.nodes.iter().any(|n| n.id == "c"));
	assert!(!sim_before_undo.borrow().is_running(), "physics stopped before the restore");
	assert!(
		controller.simulation().unwrap().borrow().is_running(),
		"restored simulation restarted from historical positions"
	);

	let info = controller.history_info();
	assert!(info.can_redo && !info.can_undo);
	assert_eq!(info.size, 2, "undo adds no entries");
}

#[test]
fn history_restore_skips_state_reapplication_and_border_reduction() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	controller.update(Some(with_extra_node(two_node_data(), "c", "a")), None);
	controller.flush_deferred();

	let ops_before = controller.canvas().ops.len();
	assert!(controller.undo());
	let new_ops = &controller.canvas().ops[ops_before..];
	assert_eq!(
		new_ops
			.iter()
			.filter(|op| matches!(op, Op::ChangeData(_)))
			.count(),
		1,
		"one direct full paint"
	);
	assert!(
		new_ops
			.iter()
			.all(|op| !matches!(op, Op::SetAutoPaint(_) | Op::SetItemState(..))),
		"no bulk state pass on the history path"
	);
}

#[test]
fn redo_returns_to_the_latest_snapshot() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	controller.update(Some(with_extra_node(two_node_data(), "c", "a")), None);
	controller.flush_deferred();
	let latest_save = controller.canvas().save();

	assert!(controller.undo());
	assert!(controller.redo());
	assert_eq!(controller.canvas().data, latest_save);
	assert!(controller.canvas().data.nodes.iter().any(|n| n.id == "c"));
}

#[test]
fn history_boundaries_are_noops() {
	let mut controller = mounted_controller();
	controller.flush_deferred();

	let ops_before = controller.canvas().ops.len();
	let info_before = controller.history_info();
	assert!(!controller.undo());
	assert!(!controller.redo());
	assert_eq!(controller.canvas().ops.len(), ops_before, "no visible effect");
	assert_eq!(controller.history_info(), info_before);
}

#[test]
fn deferred_repaints_coalesce_to_the_latest_update() {
	let mut controller = mounted_controller();
	controller.flush_deferred();

	assert!(controller.update(Some(with_extra_node(two_node_data(), "c", "a")), None));
	let with_both = with_extra_node(with_extra_node(two_node_data(), "c", "a"), "d", "b");
	assert!(controller.update(Some(with_both), None));

	let events_before = controller.canvas().events().len();
	assert!(controller.flush_deferred());
	assert!(!controller.flush_deferred(), "only one pending paint existed");

	let canvas = controller.canvas();
	assert_eq!(canvas.events().len(), events_before + 1, "a single AfterChangeData");
	let painted = canvas.change_data_calls().last().cloned().unwrap().clone();
	assert!(painted.nodes.iter().any(|n| n.id == "d"), "last writer wins");
	assert_eq!(controller.history_info().size, 2, "one snapshot per flush");
}

#[test]
fn clear_resets_history_and_rebinds_events() {
	let binds = Rc::new(Cell::new(0usize));
	let teardowns = Rc::new(Cell::new(0usize));

	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		two_node_data(),
		LayoutConfig::force_directed(),
		Dimensions::new(800.0, 600.0),
	);
	let (binds_in, teardowns_in) = (binds.clone(), teardowns.clone());
	controller.set_event_binder(move || {
		binds_in.set(binds_in.get() + 1);
		let teardowns = teardowns_in.clone();
		Box::new(move || teardowns.set(teardowns.get() + 1))
	});
	controller.mount();
	controller.flush_deferred();
	assert_eq!(binds.get(), 1);

	controller.clear();
	assert_eq!(teardowns.get(), 1, "old binding torn down");
	assert_eq!(binds.get(), 2, "fresh binding installed");
	assert_eq!(controller.history_info().size, 0, "clear is not an undoable edit");
	assert!(controller.simulation().is_none());
	assert!(controller.data().is_empty());

	let canvas = controller.canvas();
	assert!(canvas.ops.iter().any(|op| matches!(op, Op::Clear)));
	let last_paint = canvas.change_data_calls().last().cloned().unwrap();
	assert!(last_paint.is_empty(), "empty data set repainted");

	// The next real update starts history afresh.
	assert!(controller.update(Some(two_node_data()), None));
	controller.flush_deferred();
	assert_eq!(controller.history_info().size, 1);
}

#[test]
fn unmount_invokes_the_teardown_exactly_once() {
	let teardowns = Rc::new(Cell::new(0usize));
	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		two_node_data(),
		LayoutConfig::force_directed(),
		Dimensions::new(800.0, 600.0),
	);
	let teardowns_in = teardowns.clone();
	controller.set_event_binder(move || {
		let teardowns = teardowns_in.clone();
		Box::new(move || teardowns.set(teardowns.get() + 1))
	});
	controller.mount();
	controller.flush_deferred();

	let simulation = controller.simulation().unwrap().clone();
	controller.unmount();
	assert_eq!(teardowns.get(), 1);
	assert!(!simulation.borrow().is_running(), "no dangling ticks after teardown");
	assert!(!controller.is_mounted());
}

#[test]
fn static_layout_mode_degrades_to_noops() {
	let data = GraphData {
		nodes: vec![GraphNode::at("a", 0.0, 0.0), GraphNode::at("b", 10.0, 10.0)],
		edges: vec![GraphEdge::new("e1", "a", "b")],
	};
	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		data,
		LayoutConfig::static_layout(),
		Dimensions::new(800.0, 600.0),
	);
	controller.mount();
	assert!(controller.simulation().is_none());
	assert!(!controller.advance_simulation(0.016));
	controller.flush_deferred();
	assert_eq!(controller.history_info().size, 1);

	// Undo at the boundary with no simulation stays silent.
	assert!(!controller.undo());
}

#[test]
fn border_reduction_on_static_positions_matches_extremes() {
	let data = GraphData {
		nodes: vec![
			GraphNode::at("a", 0.0, 0.0),
			GraphNode::at("b", 5.0, 5.0),
			GraphNode::at("c", 10.0, 0.0),
			GraphNode::at("d", 0.0, 10.0),
			GraphNode::at("e", 10.0, 10.0),
		],
		edges: vec![GraphEdge::new("e1", "a", "b")],
	};
	let mut controller = GraphController::new(
		RecordingCanvas::new(),
		data,
		LayoutConfig::static_layout(),
		Dimensions::new(800.0, 600.0),
	);
	controller.mount();

	let canvas = controller.canvas();
	let first = canvas.change_data_calls()[0].clone();
	assert!(first.nodes.len() <= 4);
	assert!(first.edges.is_empty());
	let xs: Vec<f64> = first.nodes.iter().filter_map(|n| n.x).collect();
	let ys: Vec<f64> = first.nodes.iter().filter_map(|n| n.y).collect();
	assert!(xs.contains(&0.0) && xs.contains(&10.0));
	assert!(ys.contains(&0.0) && ys.contains(&10.0));
	assert!(!first.nodes.iter().any(|n| n.id == "b"), "interior node excluded");
}

#[test]
fn layout_change_alone_triggers_recomputation() {
	let mut controller = mounted_controller();
	controller.flush_deferred();
	assert!(controller.simulation().is_some());

	assert!(controller.update(None, Some(LayoutConfig::static_layout())));
	assert!(controller.simulation().is_none(), "static mode drops the handle");
	controller.flush_deferred();
	assert_eq!(controller.history_info().size, 2);
}

#[test]
fn advance_simulation_repaints_moved_positions() {
	let mut controller = mounted_controller();
	controller.flush_deferred();

	let calls_before = controller.canvas().change_data_calls().len();
	assert!(controller.advance_simulation(0.016));
	let canvas = controller.canvas();
	assert_eq!(canvas.change_data_calls().len(), calls_before + 1);
	assert!(
		controller
			.data()
			.nodes
			.iter()
			.all(|n| n.x.is_some() && n.y.is_some())
	);
}
