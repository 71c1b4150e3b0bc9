use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{error, info};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{FlowchartState, PointerAction, ViewSettings};
use super::style::Theme;

const FRAME_DT: f64 = 0.016;

/// Shared flowchart state. The canvas, its controls and the page that loads
/// layouts all hold a clone.
#[derive(Clone)]
pub struct FlowchartHandle(Rc<RefCell<FlowchartState>>);

impl FlowchartHandle {
	pub fn new(settings: ViewSettings) -> Self {
		Self(Rc::new(RefCell::new(FlowchartState::new(800.0, 600.0, settings))))
	}

	pub fn borrow(&self) -> Ref<'_, FlowchartState> {
		self.0.borrow()
	}

	pub fn borrow_mut(&self) -> RefMut<'_, FlowchartState> {
		self.0.borrow_mut()
	}
}

/// Browser callbacks owned by one mounted canvas.
#[derive(Clone, Default)]
struct CanvasCallbacks {
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl CanvasCallbacks {
	/// Unhooks the resize listener, cancels the pending frame and drops both
	/// closures. The animation closure holds its own slot, so taking it out
	/// breaks that cycle.
	fn release(&self) {
		let window = web_sys::window();
		if let Some(id) = self.frame.take() {
			if let Some(window) = &window {
				let _ = window.cancel_animation_frame(id);
			}
		}
		if let Some(cb) = self.resize.borrow_mut().take() {
			if let Some(window) = &window {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
	}
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

#[component]
pub fn FlowchartCanvas(
	handle: FlowchartHandle,
	#[prop(into)] show_grid: Signal<bool>,
	#[prop(into)] show_minimap: Signal<bool>,
	/// Called with the node id when a card's "File Report" button is clicked.
	#[prop(optional)]
	on_file_report: Option<Rc<dyn Fn(String)>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let callbacks = CanvasCallbacks::default();
	let alive = Arc::new(AtomicBool::new(true));
	let theme = use_context::<RwSignal<Theme>>();

	{
		let alive = alive.clone();
		on_cleanup(move || alive.store(false, Ordering::Relaxed));
	}
	{
		let callbacks = SendWrapper::new(callbacks.clone());
		on_cleanup(move || callbacks.release());
	}

	let handle_opts = handle.clone();
	Effect::new(move |_| {
		let mut s = handle_opts.borrow_mut();
		s.show_grid = show_grid.get();
		s.show_minimap = show_minimap.get();
		if let Some(theme) = theme {
			s.theme = theme.get();
		}
	});

	let (handle_init, callbacks_init) = (handle.clone(), callbacks.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		callbacks_init.release();
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		handle_init.borrow_mut().resize(w, h);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas 2D context unavailable");
				return;
			}
		};

		let (handle_resize, canvas_resize, alive_resize) =
			(handle_init.clone(), canvas.clone(), alive.clone());
		*callbacks_init.resize.borrow_mut() = Some(Closure::new(move || {
			if !alive_resize.load(Ordering::Relaxed) {
				return;
			}
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			handle_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *callbacks_init.resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (handle_anim, animate_inner, frame_inner, alive_anim) = (
			handle_init.clone(),
			callbacks_init.animate.clone(),
			callbacks_init.frame.clone(),
			alive.clone(),
		);
		*callbacks_init.animate.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			{
				let mut s = handle_anim.borrow_mut();
				s.tick(FRAME_DT);
				render::render(&s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *callbacks_init.animate.borrow() {
			callbacks_init
				.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_md.borrow_mut().pointer_down(x, y);
		}
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let cursor = {
			let mut s = handle_mm.borrow_mut();
			s.pointer_move(x, y);
			s.cursor_at(x, y)
		};
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		// Release the borrow before handing control to the page.
		let action = handle_mu.borrow_mut().pointer_up(x, y);
		match action {
			PointerAction::FileReport(id) => {
				if let Some(cb) = &on_file_report {
					cb(id);
				}
			}
			PointerAction::Connected(edge) => {
				info!("Connected {} -> {}", edge.source, edge.target);
			}
			PointerAction::None => {}
		}
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		handle_ml.borrow_mut().pointer_leave();
	};

	let handle_wh = handle;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_wh.borrow_mut().wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flowchart-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
