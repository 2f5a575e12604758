//! Web canvas adapter: implements [`GraphCanvas`] on a 2d rendering
//! context.
//!
//! Visual emphasis comes from persisted item states (`selected`,
//! `hovered`) instead of any internal pointer tracking; the lifecycle core
//! stays in charge of what those states are.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use log::debug;
use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::canvas::{CanvasEvent, GraphCanvas};
use super::types::{GraphData, GraphNode};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

fn color_for(id: &str) -> &'static str {
	let mut hasher = DefaultHasher::new();
	id.hash(&mut hasher);
	COLORS[(hasher.finish() % COLORS.len() as u64) as usize]
}

fn state_flag(node_or_edge_states: &std::collections::BTreeMap<String, Value>, state: &str) -> bool {
	node_or_edge_states.get(state).is_some_and(|v| match v {
		Value::Null => false,
		Value::Bool(b) => *b,
		_ => true,
	})
}

/// Pan/zoom applied before drawing.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// A [`GraphCanvas`] drawing onto an HTML canvas 2d context.
pub struct WebCanvas {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	data: GraphData,
	transform: ViewTransform,
	auto_paint: bool,
}

impl WebCanvas {
	pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
		Self {
			ctx,
			width,
			height,
			data: GraphData::default(),
			transform: ViewTransform::default(),
			auto_paint: true,
		}
	}

	/// Screen-space hit test against the rendered node set.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<String> {
		let gx = (sx - self.transform.x) / self.transform.k;
		let gy = (sy - self.transform.y) / self.transform.k;
		let mut found = None;
		for node in &self.data.nodes {
			if let (Some(x), Some(y)) = (node.x, node.y) {
				let (dx, dy) = (x - gx, y - gy);
				if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
					found = Some(node.id.clone());
				}
			}
		}
		found
	}

	/// Whether the named state is currently set truthy on a node.
	pub fn node_state(&self, id: &str, state: &str) -> bool {
		self.data
			.nodes
			.iter()
			.find(|n| n.id == id)
			.is_some_and(|n| state_flag(&n.states, state))
	}

	/// Scales and centers the view onto the bounding box of the rendered
	/// nodes. Runs on `FirstRender`, which is why the border-node subset is
	/// enough to drive it.
	fn fit_to_view(&mut self) {
		let positioned: Vec<(f64, f64)> = self
			.data
			.nodes
			.iter()
			.filter_map(|n| Some((n.x?, n.y?)))
			.collect();
		if positioned.is_empty() {
			self.transform = ViewTransform::default();
			return;
		}

		let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
		for (x, y) in positioned {
			min_x = min_x.min(x);
			max_x = max_x.max(x);
			min_y = min_y.min(y);
			max_y = max_y.max(y);
		}

		let padding = 40.0;
		let (span_x, span_y) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((self.width - padding) / span_x)
			.min((self.height - padding) / span_y)
			.clamp(0.1, 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * (min_x + span_x / 2.0),
			y: self.height / 2.0 - k * (min_y + span_y / 2.0),
			k,
		};
	}

	fn draw(&self) {
		let ctx = &self.ctx;
		ctx.set_fill_style_str("#1a1a2e");
		ctx.fill_rect(0.0, 0.0, self.width, self.height);
		ctx.save();
		let _ = ctx.translate(self.transform.x, self.transform.y);
		let _ = ctx.scale(self.transform.k, self.transform.k);
		self.draw_edges();
		self.draw_nodes();
		ctx.restore();
	}

	fn draw_edges(&self) {
		let ctx = &self.ctx;
		let k = self.transform.k;
		let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);

		for edge in &self.data.edges {
			let Some(source) = self.node_by_id(&edge.source) else {
				continue;
			};
			let Some(target) = self.node_by_id(&edge.target) else {
				continue;
			};
			let (Some(x1), Some(y1), Some(x2), Some(y2)) = (source.x, source.y, target.x, target.y)
			else {
				continue;
			};
			let (dx, dy) = (x2 - x1, y2 - y1);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				continue;
			}

			let emphasized = state_flag(&edge.states, "selected")
				|| (state_flag(&source.states, "selected") && state_flag(&target.states, "selected"));
			let (edge_alpha, width) = if emphasized {
				(0.9, line_width * 1.3)
			} else {
				(0.6, line_width)
			};

			ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
			ctx.set_line_width(width);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));

			let (ux, uy) = (dx / dist, dy / dist);
			ctx.begin_path();
			ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
			ctx.line_to(
				x2 - ux * (NODE_RADIUS + arrow_size),
				y2 - uy * (NODE_RADIUS + arrow_size),
			);
			ctx.stroke();

			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
			let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
		let _ = self.ctx.set_line_dash(&js_sys::Array::new());
	}

	fn draw_nodes(&self) {
		let ctx = &self.ctx;
		let k = self.transform.k;

		for node in &self.data.nodes {
			let (Some(x), Some(y)) = (node.x, node.y) else {
				continue;
			};
			let selected = state_flag(&node.states, "selected");
			let hovered = state_flag(&node.states, "hovered");
			let radius = if hovered {
				NODE_RADIUS * 1.35
			} else {
				NODE_RADIUS
			};

			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(color_for(&node.id));
			ctx.fill();

			if selected {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
				ctx.set_line_width(1.5 / k);
				ctx.stroke();
			}

			if let Some(label) = &node.label {
				ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
				ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
				let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
			}
		}
	}

	fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
		self.data.nodes.iter().find(|n| n.id == id)
	}
}

impl GraphCanvas for WebCanvas {
	fn change_data(&mut self, data: &GraphData) {
		self.data = data.clone();
		if self.auto_paint {
			self.draw();
		}
	}

	fn save(&self) -> GraphData {
		self.data.clone()
	}

	fn clear(&mut self) {
		self.data = GraphData::default();
		self.transform = ViewTransform::default();
		self.ctx.set_fill_style_str("#1a1a2e");
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn auto_paint(&self) -> bool {
		self.auto_paint
	}

	fn set_auto_paint(&mut self, on: bool) {
		self.auto_paint = on;
	}

	fn paint(&mut self) {
		self.draw();
	}

	fn set_item_state(&mut self, item_id: &str, state: &str, value: Value) {
		if let Some(node) = self.data.nodes.iter_mut().find(|n| n.id == item_id) {
			node.states.insert(state.to_string(), value);
		} else if let Some(edge) = self.data.edges.iter_mut().find(|e| e.id == item_id) {
			edge.states.insert(state.to_string(), value);
		}
		if self.auto_paint {
			self.draw();
		}
	}

	fn emit(&mut self, event: CanvasEvent) {
		debug!("canvas event: {:?}", event);
		if event == CanvasEvent::FirstRender {
			self.fit_to_view();
			if self.auto_paint {
				self.draw();
			}
		}
	}
}
