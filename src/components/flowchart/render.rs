use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{self, EdgeCurve, HANDLE_RADIUS, HEADER_HEIGHT, Rect};
use super::state::{FlowchartState, NodeInfo};
use super::style::{Palette, StatusStyle, correlation_color};
use super::types::{HandleId, MachineStatus};

const CARD_RADIUS: f64 = 8.0;
const EDGE_WIDTH: f64 = 2.5;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn dash(ctx: &CanvasRenderingContext2d, on: f64, off: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(on),
		&JsValue::from_f64(off),
	));
}

fn solid(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let radius = radius.min(r.w / 2.0).min(r.h / 2.0);
	ctx.begin_path();
	ctx.move_to(r.x + radius, r.y);
	let _ = ctx.arc_to(r.x + r.w, r.y, r.x + r.w, r.y + r.h, radius);
	let _ = ctx.arc_to(r.x + r.w, r.y + r.h, r.x, r.y + r.h, radius);
	let _ = ctx.arc_to(r.x, r.y + r.h, r.x, r.y, radius);
	let _ = ctx.arc_to(r.x, r.y, r.x + r.w, r.y, radius);
	ctx.close_path();
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

/// Shortens `text` with an ellipsis until it fits `max_width`.
fn fit_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> String {
	if text_width(ctx, text) <= max_width {
		return text.to_string();
	}
	let mut chars: Vec<char> = text.chars().collect();
	while !chars.is_empty() {
		chars.pop();
		let candidate: String = chars.iter().collect::<String>() + "\u{2026}";
		if text_width(ctx, &candidate) <= max_width {
			return candidate;
		}
	}
	String::new()
}

pub fn render(state: &FlowchartState, ctx: &CanvasRenderingContext2d) {
	let palette = state.theme.palette();
	ctx.set_fill_style_str(palette.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.show_grid {
		draw_grid(state, ctx, palette);
	}

	let t = &state.viewport.transform;
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_edges(state, ctx, palette);
	draw_pending_connection(state, ctx, palette);
	draw_nodes(state, ctx, palette);
	ctx.restore();

	draw_minimap(state, ctx, palette);
}

fn draw_grid(state: &FlowchartState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let t = &state.viewport.transform;
	let gap = state.settings.grid_gap * t.k;
	if gap < 4.0 {
		return;
	}
	let size = t.k.clamp(0.5, 2.0);
	let (ox, oy) = (t.x.rem_euclid(gap), t.y.rem_euclid(gap));
	ctx.set_fill_style_str(palette.grid_dot);
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
			y += gap;
		}
		x += gap;
	}
}

fn draw_edges(state: &FlowchartState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let dash_offset = -(state.flow_time * 30.0) % 12.0;

	state.graph.visit_edges(|n1, n2, data| {
		let edge = &data.user_data;
		let (src, tgt) = if n1.data.user_data.id == edge.source {
			(n1, n2)
		} else {
			(n2, n1)
		};
		let (src_info, tgt_info) = (&src.data.user_data, &tgt.data.user_data);
		let curve = EdgeCurve::new(
			geometry::handle_point(&state.node_rect(src_info), edge.source_handle()),
			geometry::handle_point(&state.node_rect(tgt_info), edge.target_handle()),
		);

		let highlighted = state.is_highlighted(src.index()) && state.is_highlighted(tgt.index());
		let alpha = if state.has_active_highlight() && !highlighted {
			1.0 - 0.6 * t
		} else {
			1.0
		};
		let width_scale = if highlighted { 1.0 + 0.4 * t } else { 1.0 };
		let color = correlation_color(edge.correlation, state.theme);

		// base path
		ctx.set_global_alpha(alpha * 0.5);
		ctx.set_stroke_style_str(palette.edge_base);
		ctx.set_line_width(EDGE_WIDTH + 2.0);
		if edge.dashed {
			dash(ctx, 5.0, 5.0);
		}
		stroke_curve(ctx, &curve);
		solid(ctx);
		ctx.set_global_alpha(alpha);

		ctx.set_stroke_style_str(color);
		if edge.animated {
			ctx.set_line_width(EDGE_WIDTH * width_scale);
			dash(ctx, 8.0, 4.0);
			ctx.set_line_dash_offset(dash_offset);
		} else {
			ctx.set_line_width(1.5 * width_scale);
			if edge.dashed {
				dash(ctx, 5.0, 5.0);
			}
		}
		stroke_curve(ctx, &curve);
		solid(ctx);

		draw_arrow(ctx, &curve, palette.arrow, 10.0);

		if let Some(label) = &edge.label {
			draw_edge_label(ctx, &curve, label, color, palette);
		}
		ctx.set_global_alpha(1.0);
	});
	solid(ctx);
}

fn stroke_curve(ctx: &CanvasRenderingContext2d, curve: &EdgeCurve) {
	ctx.begin_path();
	ctx.move_to(curve.start.0, curve.start.1);
	ctx.quadratic_curve_to(curve.control.0, curve.control.1, curve.end.0, curve.end.1);
	ctx.stroke();
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, curve: &EdgeCurve, color: &str, size: f64) {
	let (ux, uy) = curve.end_direction();
	let (tip_x, tip_y) = curve.end;
	let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
	let (px, py) = (-uy * size * 0.35, ux * size * 0.35);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	curve: &EdgeCurve,
	label: &str,
	color: &str,
	palette: &Palette,
) {
	let (cx, cy) = curve.label_anchor();
	ctx.set_font("600 10px sans-serif");
	let w = (text_width(ctx, label) + 20.0).max(60.0);
	let pill = Rect {
		x: cx - w / 2.0,
		y: cy - 12.0,
		w,
		h: 24.0,
	};
	rounded_rect(ctx, &pill, 12.0);
	ctx.set_fill_style_str(palette.label_fill);
	ctx.fill();
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(color);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, cx, cy + 0.5);
}

fn draw_pending_connection(
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
) {
	let Some(connect) = &state.connect else {
		return;
	};
	let mut from = None;
	state.graph.visit_nodes(|node| {
		if node.index() == connect.from {
			from = Some(geometry::handle_point(
				&state.node_rect(&node.data.user_data),
				connect.handle,
			));
		}
	});
	let Some((fx, fy)) = from else {
		return;
	};
	ctx.set_stroke_style_str(palette.primary_handle);
	ctx.set_line_width(2.0);
	dash(ctx, 6.0, 4.0);
	ctx.begin_path();
	ctx.move_to(fx, fy);
	ctx.line_to(connect.pointer.0, connect.pointer.1);
	ctx.stroke();
	solid(ctx);
}

fn draw_nodes(state: &FlowchartState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	// Dimmed cards first so highlighted ones paint on top
	state.graph.visit_nodes(|node| {
		if has_highlight && state.is_highlighted(node.index()) {
			return;
		}
		let alpha = if has_highlight { 1.0 - 0.4 * t } else { 1.0 };
		draw_card(state, ctx, palette, &node.data.user_data, alpha, 0.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let lift = if state.is_hovered(idx) { t } else { 0.0 };
		draw_card(state, ctx, palette, &node.data.user_data, 1.0, lift);
	});
}

fn draw_card(
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
	info: &NodeInfo,
	alpha: f64,
	lift: f64,
) {
	let rect = state.node_rect(info);
	let data = &info.data;
	let style = StatusStyle::for_status(data.status);
	let pad = geometry::BODY_PADDING;

	ctx.set_global_alpha(alpha);

	// card with shadow; lift grows it while hovered
	ctx.save();
	ctx.set_shadow_color(palette.shadow);
	ctx.set_shadow_blur(10.0 + 14.0 * lift);
	ctx.set_shadow_offset_y(4.0 + 6.0 * lift);
	rounded_rect(ctx, &rect, CARD_RADIUS);
	ctx.set_fill_style_str(palette.card);
	ctx.fill();
	ctx.restore();
	rounded_rect(ctx, &rect, CARD_RADIUS);
	ctx.set_stroke_style_str(palette.card_border);
	ctx.set_line_width(1.0);
	ctx.stroke();

	// header: name and status badge
	ctx.set_text_baseline("middle");
	ctx.set_font("11px sans-serif");
	let badge_text = format!("{} {}", style.icon.glyph(), style.label);
	let badge_w = text_width(ctx, &badge_text) + 16.0;
	let badge = Rect {
		x: rect.x + rect.w - pad - badge_w,
		y: rect.y + HEADER_HEIGHT / 2.0 - 11.0,
		w: badge_w,
		h: 22.0,
	};
	rounded_rect(ctx, &badge, 11.0);
	ctx.set_fill_style_str(style.background);
	ctx.fill();
	ctx.set_fill_style_str(style.text_color);
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&badge_text, badge.x + badge.w / 2.0, badge.y + badge.h / 2.0);

	ctx.set_font("600 14px sans-serif");
	ctx.set_text_align("left");
	ctx.set_fill_style_str(palette.title);
	let name = fit_text(ctx, data.display_name(), badge.x - rect.x - pad - 8.0);
	let _ = ctx.fill_text(&name, rect.x + pad, rect.y + HEADER_HEIGHT / 2.0);

	divider(ctx, palette, rect.x, rect.x + rect.w, rect.y + HEADER_HEIGHT);

	// body
	let mut y = rect.y + HEADER_HEIGHT + pad;
	if data.status.shows_health() {
		let health = data.health();
		ctx.set_font("500 11px sans-serif");
		ctx.set_fill_style_str(palette.muted_text);
		let _ = ctx.fill_text("Machine Health", rect.x + pad, y + 7.0);
		ctx.set_font("600 11px sans-serif");
		ctx.set_fill_style_str(palette.strong_text);
		ctx.set_text_align("right");
		let _ = ctx.fill_text(&format!("{}%", health), rect.x + rect.w - pad, y + 7.0);
		ctx.set_text_align("left");

		let track = Rect {
			x: rect.x + pad,
			y: y + 18.0,
			w: rect.w - pad * 2.0,
			h: 8.0,
		};
		rounded_rect(ctx, &track, 4.0);
		ctx.set_fill_style_str(palette.bar_track);
		ctx.fill();
		if health > 0 {
			let fill = Rect {
				w: track.w * health as f64 / 100.0,
				..track
			};
			rounded_rect(ctx, &fill, 4.0);
			ctx.set_fill_style_str(palette.bar_fill);
			ctx.fill();
		}
		y += geometry::HEALTH_BLOCK;
	}

	ctx.set_font("11px sans-serif");
	if let Some(date) = &data.last_report_date {
		ctx.set_fill_style_str(palette.muted_text);
		let _ = ctx.fill_text(&format!("Last Report: {}", date), rect.x + pad, y + 8.0);
		y += geometry::TEXT_LINE;
	}
	if data.status == MachineStatus::ReportNotFiled {
		ctx.set_fill_style_str(palette.warning_text);
		let _ = ctx.fill_text(
			"\u{26A0} Maintenance report overdue or not filed.",
			rect.x + pad,
			y + 8.0,
		);
	}

	if state.report_action {
		let footer_y = rect.y + rect.h - geometry::FOOTER_HEIGHT;
		divider(ctx, palette, rect.x, rect.x + rect.w, footer_y);
		let button = geometry::report_button_rect(&rect);
		rounded_rect(ctx, &button, 6.0);
		ctx.set_fill_style_str(palette.card);
		ctx.fill();
		ctx.set_stroke_style_str(palette.button_border);
		ctx.stroke();
		ctx.set_font("500 13px sans-serif");
		ctx.set_fill_style_str(palette.button_text);
		ctx.set_text_align("center");
		let (bx, by) = button.center();
		let _ = ctx.fill_text("\u{1F4C4} File Report", bx, by);
		ctx.set_text_align("left");
	}

	for handle in HandleId::ALL {
		let (hx, hy) = geometry::handle_point(&rect, handle);
		let (radius, fill) = if handle.is_primary() {
			(HANDLE_RADIUS, palette.primary_handle)
		} else {
			(HANDLE_RADIUS - 1.0, palette.aux_handle)
		};
		ctx.begin_path();
		let _ = ctx.arc(hx, hy, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(palette.handle_border);
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

fn divider(ctx: &CanvasRenderingContext2d, palette: &Palette, x0: f64, x1: f64, y: f64) {
	ctx.set_stroke_style_str(palette.card_divider);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(x0, y);
	ctx.line_to(x1, y);
	ctx.stroke();
}

fn draw_minimap(state: &FlowchartState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let Some(map) = state.minimap() else {
		return;
	};
	ctx.save();
	rounded_rect(ctx, &map.frame, 8.0);
	ctx.set_fill_style_str(palette.minimap_bg);
	ctx.fill();
	ctx.set_stroke_style_str(palette.minimap_border);
	ctx.set_line_width(1.0);
	ctx.stroke();
	rounded_rect(ctx, &map.frame, 8.0);
	ctx.clip();

	ctx.set_fill_style_str(palette.minimap_mask);
	ctx.fill_rect(map.frame.x, map.frame.y, map.frame.w, map.frame.h);

	let visible = state
		.viewport
		.transform
		.visible_rect(state.width, state.height);
	let view = map.project_rect(&visible);
	ctx.set_fill_style_str(palette.background);
	ctx.fill_rect(view.x, view.y, view.w, view.h);

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let r = map.project_rect(&state.node_rect(info));
		rounded_rect(ctx, &r, 2.0);
		ctx.set_fill_style_str(StatusStyle::for_status(info.data.status).background);
		ctx.fill();
		ctx.set_stroke_style_str(palette.arrow);
		ctx.set_line_width(1.0);
		ctx.stroke();
	});

	ctx.set_stroke_style_str(palette.arrow);
	ctx.set_line_width(1.5);
	ctx.stroke_rect(view.x, view.y, view.w, view.h);
	ctx.restore();
}
