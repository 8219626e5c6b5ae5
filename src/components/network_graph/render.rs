use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NetworkGraphState;

const BACKGROUND: &str = "#faf5ff";
const LINK_COLOR: &str = "#d8b4fe";
const FOCAL_BORDER: &str = "#9333ea";
const NODE_BORDER: &str = "#d8b4fe";
const LABEL_BACKGROUND: &str = "rgba(147, 51, 234, 0.9)";

/// Fill color for a journey stage.
fn stage_color(category: &str) -> &'static str {
	match category {
		"pregnancy" => "#e9d5ff",
		"early-postpartum" => "#fbcfe8",
		"ongoing-postpartum" => "#a5f3fc",
		_ => "#e9d5ff",
	}
}

pub fn render(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.sim.width(), state.sim.height());
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_hover_label(state, ctx);
}

fn draw_links(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(2.0);
	for seg in state.sim.segments() {
		ctx.set_global_alpha(seg.strength * 0.6);
		ctx.begin_path();
		ctx.move_to(seg.x1, seg.y1);
		ctx.line_to(seg.x2, seg.y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	for (idx, node) in state.sim.nodes().iter().enumerate() {
		let is_hovered = state.hover == Some(idx);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(stage_color(&node.category));
		ctx.fill();

		ctx.set_stroke_style_str(if node.is_focal { FOCAL_BORDER } else { NODE_BORDER });
		ctx.set_line_width(if is_hovered {
			4.0
		} else if node.is_focal {
			3.0
		} else {
			2.0
		});
		ctx.stroke();
	}
}

/// Name, stage, and support score under the hovered node.
fn draw_hover_label(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(node) = state.hovered() else {
		return;
	};

	let name = node.label.as_str();
	let detail = format!("{} · {:.0} support", node.category, node.weight);
	ctx.set_font("14px sans-serif");
	let width = [name, detail.as_str()]
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.fold(0.0_f64, |acc, m| acc.max(m.width()));
	let padding = 8.0;

	ctx.set_fill_style_str(LABEL_BACKGROUND);
	ctx.fill_rect(
		node.x - width / 2.0 - padding,
		node.y + node.radius + 5.0,
		width + padding * 2.0,
		42.0,
	);

	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(name, node.x, node.y + node.radius + 22.0);
	let _ = ctx.fill_text(&detail, node.x, node.y + node.radius + 40.0);
	ctx.set_text_align("start");
}
