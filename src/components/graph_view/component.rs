//! Leptos component shim around [`GraphController`].
//!
//! Everything here is glue: canvas sizing, event wiring with a single
//! teardown handle, and the animation-frame loop that pumps deferred
//! repaints and simulation ticks. The lifecycle decisions all live in the
//! controller.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::canvas::GraphCanvas;
use super::controller::{EventTeardown, GraphController};
use super::render::WebCanvas;
use super::types::{Dimensions, GraphData, LayoutConfig};

type SharedController = Rc<RefCell<Option<GraphController<WebCanvas>>>>;

fn bind_dom_events(controller: SharedController, canvas: HtmlCanvasElement) -> EventTeardown {
	let document = web_sys::window().unwrap().document().unwrap();

	let key_controller = controller.clone();
	let on_keydown: Closure<dyn FnMut(KeyboardEvent)> = Closure::new(move |ev: KeyboardEvent| {
		if !(ev.ctrl_key() || ev.meta_key()) {
			return;
		}
		let key = ev.key();
		let redo = key.eq_ignore_ascii_case("y") || (key.eq_ignore_ascii_case("z") && ev.shift_key());
		let undo = key.eq_ignore_ascii_case("z") && !ev.shift_key();
		if !undo && !redo {
			return;
		}
		ev.prevent_default();
		if let Some(c) = key_controller.borrow_mut().as_mut() {
			if undo {
				c.undo();
			} else {
				c.redo();
			}
		}
	});
	let _ = document
		.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());

	let click_controller = controller.clone();
	let click_canvas = canvas.clone();
	let on_mousedown: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
		let rect = click_canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(c) = click_controller.borrow_mut().as_mut() {
			if let Some(id) = c.canvas().node_at(x, y) {
				let selected = c.canvas().node_state(&id, "selected");
				c.canvas_mut().set_item_state(&id, "selected", json!(!selected));
			}
		}
	});
	let _ = canvas
		.add_event_listener_with_callback("mousedown", on_mousedown.as_ref().unchecked_ref());

	Box::new(move || {
		let _ = document
			.remove_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
		let _ = canvas.remove_event_listener_with_callback(
			"mousedown",
			on_mousedown.as_ref().unchecked_ref(),
		);
		drop(on_keydown);
		drop(on_mousedown);
	})
}

/// Interactive graph view with undo/redo history and a force-directed
/// layout.
#[component]
pub fn GraphViewCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] layout: Option<LayoutConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller: SharedController = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (controller_effect, animate_effect) = (controller.clone(), animate.clone());

	Effect::new(move |_| {
		let current = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};

		// Subsequent runs are external updates; the differ inside the
		// controller decides whether anything actually changed.
		if let Some(c) = controller_effect.borrow_mut().as_mut() {
			c.update(Some(current), None);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();
		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut c = GraphController::new(
			WebCanvas::new(ctx, w, h),
			current,
			layout.clone().unwrap_or_default(),
			Dimensions::new(w, h),
		);
		let (binder_controller, binder_canvas) = (controller_effect.clone(), canvas.clone());
		c.set_event_binder(move || {
			bind_dom_events(binder_controller.clone(), binder_canvas.clone())
		});
		c.mount();
		*controller_effect.borrow_mut() = Some(c);

		// Animation loop: the pending full paint always wins the frame, so
		// the deferred repaint lands on the tick after the update that
		// scheduled it.
		let (loop_controller, animate_inner) = (controller_effect.clone(), animate_effect.clone());
		*animate_effect.borrow_mut() = Some(Closure::new(move || {
			if let Some(c) = loop_controller.borrow_mut().as_mut() {
				if c.has_pending_paint() {
					c.flush_deferred();
				} else {
					c.advance_simulation(0.016);
				}
			}
			if let Some(cb) = &*animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = &*animate_effect.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let cleanup_state = send_wrapper::SendWrapper::new((animate, controller));
	on_cleanup(move || {
		let (animate, controller) = cleanup_state.take();
		*animate.borrow_mut() = None;
		if let Some(c) = controller.borrow_mut().as_mut() {
			c.unmount();
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-view-canvas"
			style="display: block; cursor: pointer;"
		/>
	}
}
