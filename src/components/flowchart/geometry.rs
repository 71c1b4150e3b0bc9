//! Card and edge geometry in graph space. Pure arithmetic, no canvas access.

use super::types::{HandleId, MachineNodeData, MachineStatus, Position};

pub const NODE_WIDTH: f64 = 288.0;
pub const HEADER_HEIGHT: f64 = 52.0;
pub const BODY_PADDING: f64 = 16.0;
pub const HEALTH_BLOCK: f64 = 32.0;
pub const TEXT_LINE: f64 = 18.0;
pub const FOOTER_HEIGHT: f64 = 52.0;
pub const HANDLE_RADIUS: f64 = 6.0;
/// Pointer distance (graph space) that still counts as a handle hit.
pub const HANDLE_HIT_RADIUS: f64 = 14.0;
/// Vertical sag of the edge curve's control point.
pub const EDGE_SAG: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	/// Smallest rect covering both.
	pub fn union(&self, other: &Rect) -> Rect {
		let (x0, y0) = (self.x.min(other.x), self.y.min(other.y));
		let (x1, y1) = (
			(self.x + self.w).max(other.x + other.w),
			(self.y + self.h).max(other.y + other.h),
		);
		Rect {
			x: x0,
			y: y0,
			w: x1 - x0,
			h: y1 - y0,
		}
	}
}

/// Height of a card, which grows with the sections it shows.
pub fn node_height(data: &MachineNodeData, with_report_action: bool) -> f64 {
	let mut h = HEADER_HEIGHT + BODY_PADDING * 2.0;
	if data.status.shows_health() {
		h += HEALTH_BLOCK;
	}
	if data.last_report_date.is_some() {
		h += TEXT_LINE;
	}
	if data.status == MachineStatus::ReportNotFiled {
		h += TEXT_LINE;
	}
	if with_report_action {
		h += FOOTER_HEIGHT;
	}
	h
}

pub fn node_rect(position: Position, data: &MachineNodeData, with_report_action: bool) -> Rect {
	Rect {
		x: position.x,
		y: position.y,
		w: NODE_WIDTH,
		h: node_height(data, with_report_action),
	}
}

pub fn handle_point(rect: &Rect, handle: HandleId) -> (f64, f64) {
	match handle {
		HandleId::Left => (rect.x, rect.y + rect.h / 2.0),
		HandleId::Right => (rect.x + rect.w, rect.y + rect.h / 2.0),
		HandleId::Top => (rect.x + rect.w / 2.0, rect.y),
		HandleId::Bottom => (rect.x + rect.w / 2.0, rect.y + rect.h),
	}
}

/// Handle of `rect` within hit distance of the point, if any.
pub fn handle_at(rect: &Rect, px: f64, py: f64) -> Option<HandleId> {
	HandleId::ALL.into_iter().find(|&h| {
		let (hx, hy) = handle_point(rect, h);
		let (dx, dy) = (hx - px, hy - py);
		(dx * dx + dy * dy).sqrt() <= HANDLE_HIT_RADIUS
	})
}

/// "File Report" button inside the footer.
pub fn report_button_rect(rect: &Rect) -> Rect {
	Rect {
		x: rect.x + BODY_PADDING,
		y: rect.y + rect.h - FOOTER_HEIGHT + 10.0,
		w: rect.w - BODY_PADDING * 2.0,
		h: FOOTER_HEIGHT - 20.0,
	}
}

/// Quadratic curve from one handle to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	pub start: (f64, f64),
	pub control: (f64, f64),
	pub end: (f64, f64),
}

impl EdgeCurve {
	pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
		let control = (
			(start.0 + end.0) / 2.0,
			(start.1 + end.1) / 2.0 + EDGE_SAG,
		);
		Self {
			start,
			control,
			end,
		}
	}

	/// Anchor for the label pill, above the straight-line midpoint.
	pub fn label_anchor(&self) -> (f64, f64) {
		(
			(self.start.0 + self.end.0) / 2.0,
			(self.start.1 + self.end.1) / 2.0 - 15.0,
		)
	}

	/// Unit direction of travel where the curve meets its target.
	pub fn end_direction(&self) -> (f64, f64) {
		let (dx, dy) = (self.end.0 - self.control.0, self.end.1 - self.control.1);
		let len = (dx * dx + dy * dy).sqrt();
		if len < 0.001 {
			(1.0, 0.0)
		} else {
			(dx / len, dy / len)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data(status: MachineStatus) -> MachineNodeData {
		MachineNodeData {
			name: "Lathe".into(),
			status,
			health_percentage: Some(40.0),
			last_report_date: None,
		}
	}

	#[test]
	fn card_grows_with_sections() {
		let working = node_height(&data(MachineStatus::Working), false);
		let not_working = node_height(&data(MachineStatus::NotWorking), false);
		assert_eq!(working - not_working, HEALTH_BLOCK);

		let unfiled = node_height(&data(MachineStatus::ReportNotFiled), false);
		assert_eq!(unfiled - not_working, TEXT_LINE);

		let with_action = node_height(&data(MachineStatus::Working), true);
		assert_eq!(with_action - working, FOOTER_HEIGHT);
	}

	#[test]
	fn handles_sit_on_card_edges() {
		let rect = Rect {
			x: 10.0,
			y: 20.0,
			w: 100.0,
			h: 40.0,
		};
		assert_eq!(handle_point(&rect, HandleId::Left), (10.0, 40.0));
		assert_eq!(handle_point(&rect, HandleId::Right), (110.0, 40.0));
		assert_eq!(handle_point(&rect, HandleId::Top), (60.0, 20.0));
		assert_eq!(handle_point(&rect, HandleId::Bottom), (60.0, 60.0));
	}

	#[test]
	fn handle_hit_uses_radius() {
		let rect = Rect {
			x: 0.0,
			y: 0.0,
			w: 100.0,
			h: 40.0,
		};
		assert_eq!(handle_at(&rect, 103.0, 22.0), Some(HandleId::Right));
		assert_eq!(handle_at(&rect, 50.0, 20.0), None);
	}

	#[test]
	fn union_covers_both() {
		let a = Rect {
			x: 0.0,
			y: 0.0,
			w: 10.0,
			h: 10.0,
		};
		let b = Rect {
			x: 20.0,
			y: -5.0,
			w: 5.0,
			h: 5.0,
		};
		assert_eq!(
			a.union(&b),
			Rect {
				x: 0.0,
				y: -5.0,
				w: 25.0,
				h: 15.0
			}
		);
	}

	#[test]
	fn curve_sags_below_midpoint() {
		let curve = EdgeCurve::new((0.0, 0.0), (100.0, 0.0));
		assert_eq!(curve.control, (50.0, EDGE_SAG));
		assert_eq!(curve.label_anchor(), (50.0, -15.0));
		let (ux, uy) = curve.end_direction();
		assert!(ux > 0.0 && uy < 0.0);
	}
}
