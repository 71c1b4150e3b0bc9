use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Operating or reporting state of a machine.
///
/// Anything outside the fixed set deserializes to `Unrecognized` instead of
/// failing, so a bad value from the backend still renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MachineStatus {
	Working,
	NeedsMaintenance,
	NotWorking,
	ReviewPending,
	#[default]
	ReportNotFiled,
	Unrecognized,
}

impl MachineStatus {
	pub const ALL: [MachineStatus; 5] = [
		MachineStatus::Working,
		MachineStatus::NeedsMaintenance,
		MachineStatus::NotWorking,
		MachineStatus::ReviewPending,
		MachineStatus::ReportNotFiled,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			MachineStatus::Working => "Working",
			MachineStatus::NeedsMaintenance => "Needs Maintenance",
			MachineStatus::NotWorking => "Not Working",
			MachineStatus::ReviewPending => "Review Pending",
			MachineStatus::ReportNotFiled => "Report Not Filed",
			MachineStatus::Unrecognized => "Unrecognized",
		}
	}

	/// Whether the card shows a health bar for this status.
	pub fn shows_health(self) -> bool {
		!matches!(
			self,
			MachineStatus::ReportNotFiled | MachineStatus::NotWorking
		)
	}
}

impl From<&str> for MachineStatus {
	fn from(value: &str) -> Self {
		MachineStatus::ALL
			.into_iter()
			.find(|s| s.as_str() == value)
			.unwrap_or(MachineStatus::Unrecognized)
	}
}

impl fmt::Display for MachineStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for MachineStatus {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for MachineStatus {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		// `null` reads the same as a missing status.
		let raw = Option::<String>::deserialize(deserializer)?;
		Ok(raw.map_or(MachineStatus::default(), |raw| MachineStatus::from(raw.as_str())))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineNodeData {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub status: MachineStatus,
	/// Raw percentage as sent by the backend; may be fractional or out of range.
	#[serde(default)]
	pub health_percentage: Option<f64>,
	#[serde(default)]
	pub last_report_date: Option<String>,
}

impl MachineNodeData {
	pub fn display_name(&self) -> &str {
		if self.name.trim().is_empty() {
			"Unnamed Machine"
		} else {
			&self.name
		}
	}

	/// Health clamped to 0..=100 and rounded for display.
	pub fn health(&self) -> u8 {
		match self.health_percentage {
			Some(raw) if raw.is_finite() => raw.clamp(0.0, 100.0).round() as u8,
			_ => 0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineNode {
	pub id: String,
	/// Missing positions are filled in when the layout is loaded.
	#[serde(default)]
	pub position: Option<Position>,
	pub data: MachineNodeData,
}

/// Connection point on a node card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleId {
	Left,
	Right,
	Top,
	Bottom,
}

impl HandleId {
	pub const ALL: [HandleId; 4] = [
		HandleId::Left,
		HandleId::Right,
		HandleId::Top,
		HandleId::Bottom,
	];

	/// Right and bottom start connections, left and top receive them.
	pub fn is_source(self) -> bool {
		matches!(self, HandleId::Right | HandleId::Bottom)
	}

	/// Left/right carry the main flow, top/bottom are for branches.
	pub fn is_primary(self) -> bool {
		matches!(self, HandleId::Left | HandleId::Right)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			HandleId::Left => "left",
			HandleId::Right => "right",
			HandleId::Top => "top",
			HandleId::Bottom => "bottom",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub source_handle: Option<HandleId>,
	#[serde(default)]
	pub target_handle: Option<HandleId>,
	#[serde(default)]
	pub animated: bool,
	#[serde(default)]
	pub dashed: bool,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub correlation: Option<f64>,
}

impl FlowEdge {
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			..Default::default()
		}
	}

	pub fn source_handle(&self) -> HandleId {
		self.source_handle.unwrap_or(HandleId::Right)
	}

	pub fn target_handle(&self) -> HandleId {
		self.target_handle.unwrap_or(HandleId::Left)
	}
}

/// Nodes and edges of one production line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
	pub nodes: Vec<MachineNode>,
	pub edges: Vec<FlowEdge>,
}

impl Layout {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Drops repeated node ids (first wins) and edges whose endpoints are
	/// not in the layout.
	pub fn sanitized(self) -> Self {
		let mut seen = HashSet::new();
		let nodes: Vec<MachineNode> = self
			.nodes
			.into_iter()
			.filter(|node| {
				let fresh = seen.insert(node.id.clone());
				if !fresh {
					warn!("Duplicate node id '{}' dropped from layout", node.id);
				}
				fresh
			})
			.collect();

		let edges = self
			.edges
			.into_iter()
			.filter(|edge| {
				let ok = seen.contains(&edge.source) && seen.contains(&edge.target);
				if !ok {
					warn!(
						"Edge '{}' references unknown node ({} -> {}), dropped",
						edge.id, edge.source, edge.target
					);
				}
				ok
			})
			.collect();

		Self { nodes, edges }
	}
}
