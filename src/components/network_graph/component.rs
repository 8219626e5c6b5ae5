use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::__reexports::send_wrapper::SendWrapper;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::NetworkGraphState;
use super::types::NetworkData;

/// Canvas size for the current layout: explicit props win, otherwise the
/// parent element's width and a capped share of the window height.
fn measure(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let w = width.unwrap_or_else(|| {
		canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.unwrap_or(800.0)
	});
	let h = height.unwrap_or_else(|| {
		let inner = web_sys::window()
			.and_then(|win| win.inner_height().ok())
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0);
		(inner * 0.6).min(500.0)
	});
	(w, h)
}

/// Continuously-relaxing force-directed view of a [`NetworkData`] snapshot.
///
/// One simulation step runs per animation frame; pointer movement drives the
/// hover highlight; window resizes re-clamp positions into the new bounds.
/// The frame loop is cancelled whenever the component unmounts or the
/// snapshot changes, so no loop outlives its canvas.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<NetworkData>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (state_init, animate_init, resize_cb_init, frame_id_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		frame_id.clone(),
	);

	Effect::new(move |_| {
		let snapshot = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window = web_sys::window().unwrap();

		// A new snapshot replaces the running simulation wholesale; make
		// sure the old frame loop is stopped first.
		if let Some(id) = frame_id_init.take() {
			let _ = window.cancel_animation_frame(id);
		}

		let (w, h) = measure(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		let seed = js_sys::Date::now() as u64;
		*state_init.borrow_mut() = NetworkGraphState::new(&snapshot, w, h, seed);

		if resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let (nw, nh) = measure(&canvas_resize, width, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, frame_id_anim) = (
			state_init.clone(),
			animate_init.clone(),
			frame_id_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(id) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					frame_id_anim.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_id_init.set(Some(id));
			}
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
			let cursor = if hovered.is_some() { "pointer" } else { "default" };
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	// Stop the loop and detach listeners on every exit path.
	let (animate_cleanup, resize_cleanup, frame_id_cleanup) = (
		SendWrapper::new(animate.clone()),
		SendWrapper::new(resize_cb.clone()),
		SendWrapper::new(frame_id.clone()),
	);
	on_cleanup(move || {
		if let Some(window) = web_sys::window() {
			if let Some(id) = Cell::take(&frame_id_cleanup) {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *resize_cleanup.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		*animate_cleanup.borrow_mut() = None;
		*resize_cleanup.borrow_mut() = None;
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; touch-action: none;"
		/>
	}
}
