use super::geometry::Rect;

pub const MINIMAP_WIDTH: f64 = 200.0;
pub const MINIMAP_HEIGHT: f64 = 150.0;
const MARGIN: f64 = 12.0;
const INSET: f64 = 8.0;

/// Maps the whole graph (plus the visible area) into the overview box in the
/// bottom-right corner of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimap {
	pub frame: Rect,
	world: Rect,
	scale: f64,
	offset_x: f64,
	offset_y: f64,
}

impl Minimap {
	pub fn new(canvas_width: f64, canvas_height: f64, world: Rect) -> Self {
		let frame = Rect {
			x: canvas_width - MINIMAP_WIDTH - MARGIN,
			y: canvas_height - MINIMAP_HEIGHT - MARGIN,
			w: MINIMAP_WIDTH,
			h: MINIMAP_HEIGHT,
		};
		let (inner_w, inner_h) = (frame.w - INSET * 2.0, frame.h - INSET * 2.0);
		let scale = (inner_w / world.w.max(1.0)).min(inner_h / world.h.max(1.0));
		let offset_x = frame.x + INSET + (inner_w - world.w * scale) / 2.0;
		let offset_y = frame.y + INSET + (inner_h - world.h * scale) / 2.0;
		Self {
			frame,
			world,
			scale,
			offset_x,
			offset_y,
		}
	}

	pub fn contains(&self, sx: f64, sy: f64) -> bool {
		self.frame.contains(sx, sy)
	}

	pub fn project(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			self.offset_x + (gx - self.world.x) * self.scale,
			self.offset_y + (gy - self.world.y) * self.scale,
		)
	}

	pub fn project_rect(&self, rect: &Rect) -> Rect {
		let (x, y) = self.project(rect.x, rect.y);
		Rect {
			x,
			y,
			w: rect.w * self.scale,
			h: rect.h * self.scale,
		}
	}

	/// Graph point under a minimap pixel.
	pub fn unproject(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			self.world.x + (sx - self.offset_x) / self.scale,
			self.world.y + (sy - self.offset_y) / self.scale,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn world() -> Rect {
		Rect {
			x: -100.0,
			y: 0.0,
			w: 736.0,
			h: 268.0,
		}
	}

	#[test]
	fn sits_in_bottom_right_corner() {
		let map = Minimap::new(1000.0, 600.0, world());
		assert_eq!(map.frame.x + map.frame.w, 1000.0 - MARGIN);
		assert_eq!(map.frame.y + map.frame.h, 600.0 - MARGIN);
		assert!(map.contains(900.0, 500.0));
		assert!(!map.contains(10.0, 10.0));
	}

	#[test]
	fn projection_round_trips() {
		let map = Minimap::new(1000.0, 600.0, world());
		let (sx, sy) = map.project(250.0, 120.0);
		let (gx, gy) = map.unproject(sx, sy);
		assert!((gx - 250.0).abs() < 1e-9);
		assert!((gy - 120.0).abs() < 1e-9);
	}

	#[test]
	fn world_fits_inside_frame() {
		let w = world();
		let map = Minimap::new(1000.0, 600.0, w);
		let projected = map.project_rect(&w);
		assert!(projected.x >= map.frame.x);
		assert!(projected.y >= map.frame.y);
		assert!(projected.x + projected.w <= map.frame.x + map.frame.w + 1e-9);
		assert!(projected.y + projected.h <= map.frame.y + map.frame.h + 1e-9);
	}
}
