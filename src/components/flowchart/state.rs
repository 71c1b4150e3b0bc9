use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info};

use super::geometry::{self, Rect};
use super::minimap::Minimap;
use super::style::Theme;
use super::types::{FlowEdge, HandleId, Layout, MachineNode, MachineNodeData, MachineStatus, Position};
use super::viewport::{ViewTransform, Viewport};

/// Simulation steps used to place nodes that arrive without a position.
const SETTLE_STEPS: usize = 300;
const FIT_PADDING: f64 = 0.2;
const INITIAL_FIT_PADDING: f64 = 0.5;
const BUTTON_ZOOM: f64 = 1.2;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub data: MachineNodeData,
	/// Authoritative position; the simulation copy is `f32`.
	pub position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSettings {
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub snap_grid: f64,
	pub grid_gap: f64,
}

impl Default for ViewSettings {
	fn default() -> Self {
		Self {
			min_zoom: 0.1,
			max_zoom: 4.0,
			snap_grid: 15.0,
			grid_gap: 20.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// In-progress connection drag from a source handle.
#[derive(Clone, Debug)]
pub struct ConnectState {
	pub from: DefaultNodeIdx,
	pub handle: HandleId,
	pub pointer: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerAction {
	None,
	FileReport(String),
	Connected(FlowEdge),
}

pub struct FlowchartState {
	pub graph: ForceGraph<NodeInfo, FlowEdge>,
	pub viewport: Viewport,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub connect: Option<ConnectState>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub show_grid: bool,
	pub show_minimap: bool,
	pub theme: Theme,
	pub report_action: bool,
	pub settings: ViewSettings,
	pressed_report: Option<DefaultNodeIdx>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	original_positions: HashMap<String, Position>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 4000.0,
		force_spring: 0.05,
		force_max: 280.0,
		node_speed: 7000.0,
		damping_factor: 0.9,
	}
}

fn snap(value: f64, grid: f64) -> f64 {
	if grid <= 0.0 {
		value
	} else {
		(value / grid).round() * grid
	}
}

impl FlowchartState {
	pub fn new(width: f64, height: f64, settings: ViewSettings) -> Self {
		Self {
			graph: ForceGraph::new(simulation_parameters()),
			viewport: Viewport::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			connect: None,
			width,
			height,
			flow_time: 0.0,
			show_grid: true,
			show_minimap: true,
			theme: Theme::default(),
			report_action: false,
			settings,
			pressed_report: None,
			id_to_idx: HashMap::new(),
			original_positions: HashMap::new(),
			edges: Vec::new(),
		}
	}

	/// Replaces the graph with `layout`. Positions present in the layout
	/// become the table `recenter` restores; nodes without one are placed
	/// by a short force simulation around the positioned ones.
	pub fn load(&mut self, layout: &Layout) {
		let layout = layout.clone().sanitized();
		let mut graph = ForceGraph::new(simulation_parameters());
		let mut id_to_idx = HashMap::new();
		let mut original_positions = HashMap::new();
		let mut edges = Vec::new();

		let placed: Vec<Position> = layout.nodes.iter().filter_map(|n| n.position).collect();
		let (cx, cy) = if placed.is_empty() {
			(0.0, 0.0)
		} else {
			let n = placed.len() as f64;
			(
				placed.iter().map(|p| p.x).sum::<f64>() / n,
				placed.iter().map(|p| p.y).sum::<f64>() / n,
			)
		};
		let unplaced = layout.nodes.len() - placed.len();
		let radius = (unplaced as f64 * 80.0).max(200.0);

		let mut ring = 0;
		for node in &layout.nodes {
			let (position, is_anchor) = match node.position {
				Some(p) => {
					original_positions.insert(node.id.clone(), p);
					(p, true)
				}
				None => {
					let angle = ring as f64 * 2.0 * PI / unplaced as f64;
					ring += 1;
					(
						Position::new(cx + radius * angle.cos(), cy + radius * angle.sin()),
						false,
					)
				}
			};

			let idx = graph.add_node(NodeData {
				x: position.x as f32,
				y: position.y as f32,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					data: node.data.clone(),
					position,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for edge in &layout.edges {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&edge.source), id_to_idx.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData {
					user_data: edge.clone(),
				});
				edges.push((src, tgt));
			}
		}

		if unplaced > 0 {
			debug!("Placing {} node(s) without a position", unplaced);
			settle(&mut graph);
		}

		info!(
			"Flowchart loaded: {} nodes, {} edges",
			id_to_idx.len(),
			edges.len()
		);
		self.graph = graph;
		self.id_to_idx = id_to_idx;
		self.original_positions = original_positions;
		self.edges = edges;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();
		self.connect = None;
		self.pressed_report = None;
		self.fit_view(INITIAL_FIT_PADDING, false);
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Current graph as a layout, every node with its position.
	pub fn layout(&self) -> Layout {
		let mut nodes = Vec::new();
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			nodes.push(MachineNode {
				id: info.id.clone(),
				position: Some(info.position),
				data: info.data.clone(),
			});
		});
		let mut edges = Vec::new();
		self.graph.visit_edges(|_, _, edge| edges.push(edge.user_data.clone()));
		Layout { nodes, edges }
	}

	pub fn node_data(&self, id: &str) -> Option<MachineNodeData> {
		let idx = *self.id_to_idx.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.data.clone());
			}
		});
		found
	}

	pub fn position_of(&self, id: &str) -> Option<Position> {
		let idx = *self.id_to_idx.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.position);
			}
		});
		found
	}

	pub fn node_rect(&self, info: &NodeInfo) -> Rect {
		geometry::node_rect(info.position, &info.data, self.report_action)
	}

	fn set_position(&mut self, idx: DefaultNodeIdx, position: Position) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = position.x as f32;
				node.data.y = position.y as f32;
				node.data.user_data.position = position;
			}
		});
	}

	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		match self.id_to_idx.get(id) {
			Some(&idx) => {
				self.set_position(idx, position);
				true
			}
			None => false,
		}
	}

	/// Puts every node listed in `table` back at its recorded position.
	/// Nodes missing from the table keep theirs.
	pub fn restore_positions(&mut self, table: &HashMap<String, Position>) {
		self.graph.visit_nodes_mut(|node| {
			if let Some(&p) = table.get(&node.data.user_data.id) {
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
				node.data.user_data.position = p;
			}
		});
	}

	/// Restores loaded positions and refocuses the view.
	pub fn recenter(&mut self) {
		let table = std::mem::take(&mut self.original_positions);
		self.restore_positions(&table);
		self.original_positions = table;
		self.fit_view(FIT_PADDING, true);
	}

	/// Records a filed report on a node. Returns false if the id is unknown.
	pub fn mark_reported(&mut self, id: &str, reported_at: &str) -> bool {
		let Some(&idx) = self.id_to_idx.get(id) else {
			return false;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				let data = &mut node.data.user_data.data;
				data.status = MachineStatus::ReviewPending;
				data.last_report_date = Some(reported_at.to_string());
			}
		});
		true
	}

	/// Adds an edge unless it is a self-loop, runs against handle direction,
	/// names an unknown node or repeats an existing connection.
	pub fn connect(
		&mut self,
		source: &str,
		source_handle: HandleId,
		target: &str,
		target_handle: HandleId,
	) -> Option<FlowEdge> {
		if source == target || !source_handle.is_source() || target_handle.is_source() {
			return None;
		}
		let (&src, &tgt) = (self.id_to_idx.get(source)?, self.id_to_idx.get(target)?);

		let mut duplicate = false;
		self.graph.visit_edges(|_, _, edge| {
			let e = &edge.user_data;
			if e.source == source
				&& e.target == target
				&& e.source_handle() == source_handle
				&& e.target_handle() == target_handle
			{
				duplicate = true;
			}
		});
		if duplicate {
			return None;
		}

		let edge = FlowEdge {
			id: format!(
				"e-{}-{}-{}-{}",
				source,
				source_handle.as_str(),
				target,
				target_handle.as_str()
			),
			source: source.to_string(),
			target: target.to_string(),
			source_handle: Some(source_handle),
			target_handle: Some(target_handle),
			..Default::default()
		};
		self.graph.add_edge(src, tgt, EdgeData {
			user_data: edge.clone(),
		});
		self.edges.push((src, tgt));
		info!("Connected {} -> {}", source, target);
		Some(edge)
	}

	pub fn content_bounds(&self) -> Option<Rect> {
		let mut bounds: Option<Rect> = None;
		self.graph.visit_nodes(|node| {
			let rect = self.node_rect(&node.data.user_data);
			bounds = Some(match bounds {
				Some(b) => b.union(&rect),
				None => rect,
			});
		});
		bounds
	}

	pub fn fit_view(&mut self, padding: f64, animate: bool) {
		let target = match self.content_bounds() {
			Some(bounds) => ViewTransform::fitting(
				&bounds,
				self.width,
				self.height,
				padding,
				self.settings.min_zoom,
				self.settings.max_zoom,
			),
			None => ViewTransform::default(),
		};
		if animate {
			self.viewport.animate_to(target);
		} else {
			self.viewport.set(target);
		}
	}

	pub fn fit(&mut self) {
		self.fit_view(FIT_PADDING, true);
	}

	pub fn zoom_in(&mut self) {
		self.zoom_by(BUTTON_ZOOM);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_by(1.0 / BUTTON_ZOOM);
	}

	fn zoom_by(&mut self, factor: f64) {
		let t = self.viewport.transform.zoomed_at(
			self.width / 2.0,
			self.height / 2.0,
			factor,
			self.settings.min_zoom,
			self.settings.max_zoom,
		);
		self.viewport.animate_to(t);
	}

	pub fn minimap(&self) -> Option<Minimap> {
		if !self.show_minimap {
			return None;
		}
		let visible = self
			.viewport
			.transform
			.visible_rect(self.width, self.height);
		let world = self
			.content_bounds()
			.map(|b| b.union(&visible))
			.unwrap_or(visible);
		Some(Minimap::new(self.width, self.height, world))
	}

	/// Topmost node under a graph-space point.
	fn node_at_graph(&self, gx: f64, gy: f64) -> Option<DefaultNodeIdx> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if self.node_rect(&node.data.user_data).contains(gx, gy) {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.viewport.transform.screen_to_graph(sx, sy);
		self.node_at_graph(gx, gy)
	}

	fn handle_at_graph(&self, gx: f64, gy: f64) -> Option<(DefaultNodeIdx, HandleId)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let rect = self.node_rect(&node.data.user_data);
			if let Some(h) = geometry::handle_at(&rect, gx, gy) {
				found = Some((node.index(), h));
			}
		});
		found
	}

	fn report_button_at_graph(&self, gx: f64, gy: f64) -> Option<DefaultNodeIdx> {
		if !self.report_action {
			return None;
		}
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let rect = self.node_rect(&node.data.user_data);
			if geometry::report_button_rect(&rect).contains(gx, gy) {
				found = Some(node.index());
			}
		});
		found
	}

	fn info_of(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> PointerAction {
		if let Some(map) = self.minimap() {
			if map.contains(sx, sy) {
				let (gx, gy) = map.unproject(sx, sy);
				let t = self
					.viewport
					.transform
					.centered_on(gx, gy, self.width, self.height);
				self.viewport.animate_to(t);
				return PointerAction::None;
			}
		}

		let (gx, gy) = self.viewport.transform.screen_to_graph(sx, sy);

		if let Some(idx) = self.report_button_at_graph(gx, gy) {
			self.pressed_report = Some(idx);
			return PointerAction::None;
		}

		if let Some((idx, handle)) = self.handle_at_graph(gx, gy) {
			if handle.is_source() {
				self.connect = Some(ConnectState {
					from: idx,
					handle,
					pointer: (gx, gy),
				});
				return PointerAction::None;
			}
		}

		if let Some(idx) = self.node_at_graph(gx, gy) {
			let start = self.info_of(idx).map(|i| i.position).unwrap_or_default();
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start: start,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.viewport.transform.x,
				transform_start_y: self.viewport.transform.y,
			};
		}
		PointerAction::None
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active && self.connect.is_none() {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}

		if let Some(connect) = self.connect.as_mut() {
			connect.pointer = self.viewport.transform.screen_to_graph(sx, sy);
		} else if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let k = self.viewport.transform.k;
				let (dx, dy) = ((sx - self.drag.start_x) / k, (sy - self.drag.start_y) / k);
				let mut next = Position::new(
					self.drag.node_start.x + dx,
					self.drag.node_start.y + dy,
				);
				if self.show_grid {
					next.x = snap(next.x, self.settings.snap_grid);
					next.y = snap(next.y, self.settings.snap_grid);
				}
				self.set_position(idx, next);
			}
		} else if self.pan.active {
			let mut t = self.viewport.transform;
			t.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			t.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			self.viewport.set(t);
		}
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> PointerAction {
		let (gx, gy) = self.viewport.transform.screen_to_graph(sx, sy);
		let mut action = PointerAction::None;

		if let Some(pressed) = self.pressed_report.take() {
			if self.report_button_at_graph(gx, gy) == Some(pressed) {
				if let Some(info) = self.info_of(pressed) {
					action = PointerAction::FileReport(info.id);
				}
			}
		}

		if let Some(connect) = self.connect.take() {
			if let Some((idx, handle)) = self.handle_at_graph(gx, gy) {
				let ends = (self.info_of(connect.from), self.info_of(idx));
				if let (Some(from), Some(to)) = ends {
					if let Some(edge) = self.connect(&from.id, connect.handle, &to.id, handle) {
						action = PointerAction::Connected(edge);
					}
				}
			}
		}

		if let Some(info) = self.drag.node_idx.and_then(|i| self.info_of(i)) {
			debug!(
				"Moved {} to ({}, {})",
				info.id, info.position.x, info.position.y
			);
		}
		self.drag = DragState::default();
		self.pan.active = false;
		action
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.connect = None;
		self.pressed_report = None;
		self.set_hover(None);
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let t = self.viewport.transform.zoomed_at(
			sx,
			sy,
			factor,
			self.settings.min_zoom,
			self.settings.max_zoom,
		);
		self.viewport.set(t);
	}

	pub fn cursor_at(&self, sx: f64, sy: f64) -> &'static str {
		if self.drag.active || self.pan.active {
			return "grabbing";
		}
		if self.connect.is_some() {
			return "crosshair";
		}
		if self.minimap().is_some_and(|m| m.contains(sx, sy)) {
			return "pointer";
		}
		let (gx, gy) = self.viewport.transform.screen_to_graph(sx, sy);
		if self.report_button_at_graph(gx, gy).is_some() {
			"pointer"
		} else if self.handle_at_graph(gx, gy).is_some() {
			"crosshair"
		} else {
			"grab"
		}
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous highlight around so it can fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		self.viewport.step(dt);

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 6.0)
		} else {
			(0.0, 0.0, 4.0)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Runs the simulation until free nodes have spread out, then pins them.
fn settle(graph: &mut ForceGraph<NodeInfo, FlowEdge>) {
	for _ in 0..SETTLE_STEPS {
		graph.update(0.016);
	}
	graph.visit_nodes_mut(|node| {
		if !node.data.is_anchor {
			node.data.user_data.position = Position::new(node.data.x as f64, node.data.y as f64);
			node.data.is_anchor = true;
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	fn machine(id: &str, x: f64, y: f64) -> MachineNode {
		MachineNode {
			id: id.into(),
			position: Some(Position::new(x, y)),
			data: MachineNodeData {
				name: id.to_uppercase(),
				status: MachineStatus::Working,
				health_percentage: Some(80.0),
				last_report_date: None,
			},
		}
	}

	fn loaded() -> FlowchartState {
		let layout = Layout {
			nodes: vec![machine("a", 50.0, 150.0), machine("b", 350.5, 150.25)],
			edges: vec![FlowEdge::new("ab", "a", "b")],
		};
		let mut state = FlowchartState::new(800.0, 600.0, ViewSettings::default());
		state.load(&layout);
		state
	}

	#[test]
	fn load_skips_dangling_edges() {
		let layout = Layout {
			nodes: vec![machine("a", 0.0, 0.0)],
			edges: vec![FlowEdge::new("e4", "decision1", "process3")],
		};
		let mut state = FlowchartState::new(800.0, 600.0, ViewSettings::default());
		state.load(&layout);
		assert_eq!(state.node_count(), 1);
		assert_eq!(state.edge_count(), 0);
	}

	#[test]
	fn recenter_restores_listed_nodes_only() {
		let mut state = loaded();
		state.move_node("a", Position::new(999.0, -3.0));
		state.move_node("b", Position::new(12.0, 13.0));

		let mut table = HashMap::new();
		table.insert("a".to_string(), Position::new(50.0, 150.0));
		table.insert("ghost".to_string(), Position::new(1.0, 1.0));
		state.restore_positions(&table);

		assert_eq!(state.position_of("a"), Some(Position::new(50.0, 150.0)));
		assert_eq!(state.position_of("b"), Some(Position::new(12.0, 13.0)));
		assert_eq!(state.position_of("ghost"), None);
	}

	#[test]
	fn recenter_uses_loaded_positions() {
		let mut state = loaded();
		state.move_node("b", Position::new(-40.0, 700.0));
		state.recenter();
		assert_eq!(state.position_of("b"), Some(Position::new(350.5, 150.25)));
		assert!(state.viewport.is_animating());
	}

	#[test]
	fn unpositioned_nodes_are_placed_but_not_recentered() {
		let mut free = machine("c", 0.0, 0.0);
		free.position = None;
		let layout = Layout {
			nodes: vec![machine("a", 0.0, 0.0), free],
			edges: vec![FlowEdge::new("ac", "a", "c")],
		};
		let mut state = FlowchartState::new(800.0, 600.0, ViewSettings::default());
		state.load(&layout);

		let placed = state.position_of("c").unwrap();
		assert!(placed.x.is_finite() && placed.y.is_finite());
		assert_eq!(state.position_of("a"), Some(Position::new(0.0, 0.0)));

		state.move_node("c", Position::new(5.0, 5.0));
		state.recenter();
		assert_eq!(state.position_of("c"), Some(Position::new(5.0, 5.0)));
	}

	#[test]
	fn connect_rules() {
		let mut state = loaded();
		assert!(state.connect("a", HandleId::Right, "a", HandleId::Left).is_none());
		assert!(state.connect("a", HandleId::Left, "b", HandleId::Right).is_none());
		assert!(state.connect("a", HandleId::Right, "zzz", HandleId::Left).is_none());
		// same as the loaded edge
		assert!(state.connect("a", HandleId::Right, "b", HandleId::Left).is_none());

		let edge = state
			.connect("a", HandleId::Bottom, "b", HandleId::Top)
			.expect("branch connection");
		assert_eq!(edge.source, "a");
		assert_eq!(edge.target_handle, Some(HandleId::Top));
		assert!(!edge.animated);
		assert_eq!(state.edge_count(), 2);
		assert!(state.connect("a", HandleId::Bottom, "b", HandleId::Top).is_none());
	}

	#[test]
	fn mark_reported_sets_review_pending() {
		let mut state = loaded();
		assert!(state.mark_reported("a", "2024-07-30T09:00:00.000Z"));
		let data = state.node_data("a").unwrap();
		assert_eq!(data.status, MachineStatus::ReviewPending);
		assert_eq!(data.last_report_date.as_deref(), Some("2024-07-30T09:00:00.000Z"));
		assert!(!state.mark_reported("missing", "now"));
	}

	#[test]
	fn drag_snaps_to_grid_when_shown() {
		let mut state = loaded();
		state.viewport.set(ViewTransform::default());
		state.show_minimap = false;

		// inside card "a", away from handles and the footer
		state.pointer_down(100.0, 170.0);
		assert!(state.drag.active);
		state.pointer_move(107.0, 178.0);
		state.pointer_up(107.0, 178.0);
		assert_eq!(state.position_of("a"), Some(Position::new(60.0, 165.0)));

		state.show_grid = false;
		state.pointer_down(110.0, 180.0);
		state.pointer_move(113.0, 181.0);
		state.pointer_up(113.0, 181.0);
		assert_eq!(state.position_of("a"), Some(Position::new(63.0, 166.0)));
	}

	#[test]
	fn background_drag_pans() {
		let mut state = loaded();
		state.viewport.set(ViewTransform::default());
		state.show_minimap = false;
		state.pointer_down(10.0, 10.0);
		assert!(state.pan.active);
		state.pointer_move(30.0, 50.0);
		state.pointer_up(30.0, 50.0);
		assert_eq!(state.viewport.transform.x, 20.0);
		assert_eq!(state.viewport.transform.y, 40.0);
	}

	#[test]
	fn report_button_click_requests_dialog() {
		let mut state = loaded();
		state.report_action = true;
		state.show_minimap = false;
		state.viewport.set(ViewTransform::default());

		let info = NodeInfo {
			id: "a".into(),
			data: state.node_data("a").unwrap(),
			position: state.position_of("a").unwrap(),
		};
		let (bx, by) = geometry::report_button_rect(&state.node_rect(&info)).center();
		assert_eq!(state.pointer_down(bx, by), PointerAction::None);
		assert_eq!(
			state.pointer_up(bx, by),
			PointerAction::FileReport("a".into())
		);
	}

	#[test]
	fn dragging_between_handles_connects() {
		let mut state = loaded();
		state.show_minimap = false;
		state.viewport.set(ViewTransform::default());

		let rect_of = |s: &FlowchartState, id: &str| {
			let info = NodeInfo {
				id: id.into(),
				data: s.node_data(id).unwrap(),
				position: s.position_of(id).unwrap(),
			};
			s.node_rect(&info)
		};
		let (sx, sy) = geometry::handle_point(&rect_of(&state, "a"), HandleId::Bottom);
		let (tx, ty) = geometry::handle_point(&rect_of(&state, "b"), HandleId::Top);

		state.pointer_down(sx, sy);
		assert!(state.connect.is_some());
		state.pointer_move(tx, ty);
		match state.pointer_up(tx, ty) {
			PointerAction::Connected(edge) => assert_eq!(edge.target, "b"),
			other => panic!("expected connection, got {other:?}"),
		}
		assert!(state.connect.is_none());
	}

	#[test]
	fn fit_view_covers_all_nodes() {
		let state = loaded();
		let bounds = state.content_bounds().unwrap();
		let t = state.viewport.transform;
		let (x0, y0) = t.graph_to_screen(bounds.x, bounds.y);
		let (x1, y1) = t.graph_to_screen(bounds.x + bounds.w, bounds.y + bounds.h);
		assert!(x0 >= 0.0 && y0 >= 0.0);
		assert!(x1 <= 800.0 && y1 <= 600.0);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = loaded();
		let a = state.id_to_idx["a"];
		let b = state.id_to_idx["b"];
		state.set_hover(Some(a));
		assert!(state.hover.neighbors.contains(&b));
		assert!(state.is_highlighted(b));
		state.set_hover(None);
		assert_eq!(state.hover.prev_node, Some(a));
		for _ in 0..200 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn empty_layout_resets_view() {
		let mut state = loaded();
		state.load(&Layout::default());
		assert_eq!(state.node_count(), 0);
		assert_eq!(state.viewport.transform, ViewTransform::default());
		assert!(state.content_bounds().is_none());
	}
}
