//! Interactive node-edge graph view.
//!
//! The render-lifecycle and history core (`diff`, `layout`, `history`,
//! `scheduler`, `state`, `controller`) is plain Rust against the
//! [`GraphCanvas`] trait; `component` and `render` adapt it to the browser.

mod canvas;
mod component;
mod controller;
pub mod diff;
mod history;
mod layout;
mod render;
mod scheduler;
mod state;
mod types;

pub use canvas::{CanvasEvent, GraphCanvas};
pub use component::GraphViewCanvas;
pub use controller::{EventBinder, EventTeardown, GraphController};
pub use history::{HistoryController, HistoryInfo, VisualSnapshot};
pub use layout::{ForceSimulation, start as start_layout};
pub use render::WebCanvas;
pub use scheduler::{RenderScheduler, border_nodes};
pub use state::apply_item_states;
pub use types::{
	Dimensions, ForceOptions, GraphData, GraphEdge, GraphNode, LayoutConfig, LayoutKind,
};
