//! Pan/zoom transform between graph space and canvas pixels.

use super::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scale by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoomed_at(&self, sx: f64, sy: f64, factor: f64, min: f64, max: f64) -> Self {
		let k = (self.k * factor).clamp(min, max);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	/// Transform that puts graph point `(gx, gy)` in the middle of the canvas.
	pub fn centered_on(&self, gx: f64, gy: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - gx * self.k,
			y: height / 2.0 - gy * self.k,
			k: self.k,
		}
	}

	/// Transform showing all of `bounds` with `padding` as a fraction of its size.
	pub fn fitting(bounds: &Rect, width: f64, height: f64, padding: f64, min: f64, max: f64) -> Self {
		let (bw, bh) = (
			(bounds.w * (1.0 + padding)).max(1.0),
			(bounds.h * (1.0 + padding)).max(1.0),
		);
		let k = (width / bw).min(height / bh).clamp(min, max);
		let (cx, cy) = bounds.center();
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}

	/// Graph-space rectangle visible on a canvas of the given size.
	pub fn visible_rect(&self, width: f64, height: f64) -> Rect {
		let (x0, y0) = self.screen_to_graph(0.0, 0.0);
		Rect {
			x: x0,
			y: y0,
			w: width / self.k,
			h: height / self.k,
		}
	}
}

/// Current transform plus an optional animation target.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
	pub transform: ViewTransform,
	target: Option<ViewTransform>,
}

impl Viewport {
	pub fn set(&mut self, transform: ViewTransform) {
		self.transform = transform;
		self.target = None;
	}

	pub fn animate_to(&mut self, target: ViewTransform) {
		self.target = Some(target);
	}

	pub fn is_animating(&self) -> bool {
		self.target.is_some()
	}

	/// Moves towards the target; snaps once close enough. Returns whether
	/// the animation is still running.
	pub fn step(&mut self, dt: f64) -> bool {
		let Some(target) = self.target else {
			return false;
		};
		// ~300ms to settle
		let t = (dt * 12.0).min(1.0);
		let cur = &mut self.transform;
		cur.x += (target.x - cur.x) * t;
		cur.y += (target.y - cur.y) * t;
		cur.k += (target.k - cur.k) * t;

		if (target.k - cur.k).abs() < 0.001
			&& (target.x - cur.x).abs() < 0.1
			&& (target.y - cur.y).abs() < 0.1
		{
			*cur = target;
			self.target = None;
		}
		self.target.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_graph_round_trip() {
		let t = ViewTransform {
			x: 40.0,
			y: -20.0,
			k: 2.0,
		};
		let (gx, gy) = t.screen_to_graph(140.0, 80.0);
		assert_eq!((gx, gy), (50.0, 50.0));
		assert_eq!(t.graph_to_screen(gx, gy), (140.0, 80.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed_and_clamps() {
		let t = ViewTransform::default();
		let z = t.zoomed_at(100.0, 100.0, 2.0, 0.1, 4.0);
		assert_eq!(z.k, 2.0);
		assert_eq!(z.screen_to_graph(100.0, 100.0), t.screen_to_graph(100.0, 100.0));

		let capped = z.zoomed_at(0.0, 0.0, 10.0, 0.1, 4.0);
		assert_eq!(capped.k, 4.0);
		let floored = t.zoomed_at(0.0, 0.0, 0.001, 0.1, 4.0);
		assert_eq!(floored.k, 0.1);
	}

	#[test]
	fn fitting_centres_bounds() {
		let bounds = Rect {
			x: 0.0,
			y: 0.0,
			w: 400.0,
			h: 200.0,
		};
		let t = ViewTransform::fitting(&bounds, 800.0, 600.0, 0.0, 0.1, 4.0);
		assert_eq!(t.k, 2.0);
		assert_eq!(t.graph_to_screen(200.0, 100.0), (400.0, 300.0));
	}

	#[test]
	fn fitting_respects_zoom_limits() {
		let tiny = Rect {
			x: 0.0,
			y: 0.0,
			w: 1.0,
			h: 1.0,
		};
		let t = ViewTransform::fitting(&tiny, 800.0, 600.0, 0.2, 0.1, 4.0);
		assert_eq!(t.k, 4.0);
	}

	#[test]
	fn animation_settles_on_target() {
		let mut vp = Viewport::default();
		let target = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 1.5,
		};
		vp.animate_to(target);
		let mut frames = 0;
		while vp.step(0.016) {
			frames += 1;
			assert!(frames < 1000, "animation never settled");
		}
		assert_eq!(vp.transform, target);
		assert!(!vp.is_animating());
	}
}
