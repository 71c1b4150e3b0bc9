//! Canned layouts bundled into the binary.

use log::error;
use once_cell::sync::Lazy;

use crate::components::flowchart::Layout;

const LINE_1_JSON: &str = include_str!("fixtures/line-1.json");
const DEFAULT_LINE_JSON: &str = include_str!("fixtures/default-line.json");

static LINE_1: Lazy<Layout> = Lazy::new(|| parse("line-1", LINE_1_JSON));
static DEFAULT_LINE: Lazy<Layout> = Lazy::new(|| parse("default-line", DEFAULT_LINE_JSON));

fn parse(name: &str, json: &str) -> Layout {
	serde_json::from_str(json).unwrap_or_else(|err| {
		error!("Bundled layout '{}' is malformed: {}", name, err);
		Layout::default()
	})
}

/// Placeholder data for a named line, if there is any.
pub fn line_layout(line_id: &str) -> Option<Layout> {
	match line_id {
		"line-1" => Some(LINE_1.clone()),
		_ => None,
	}
}

/// Shown when loading a line fails. Three of its edges point at stages that
/// are not part of the layout and get dropped on load.
pub fn default_layout() -> Layout {
	DEFAULT_LINE.clone()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flowchart::MachineStatus;

	#[test]
	fn bundled_json_parses() {
		let line: Layout = serde_json::from_str(LINE_1_JSON).unwrap();
		assert_eq!(line.nodes.len(), 2);
		assert_eq!(line.edges.len(), 1);
		assert!(line.edges[0].animated);
		assert_eq!(line.nodes[1].data.status, MachineStatus::NeedsMaintenance);

		let fallback: Layout = serde_json::from_str(DEFAULT_LINE_JSON).unwrap();
		assert_eq!(fallback.nodes.len(), 7);
		assert_eq!(fallback.edges.len(), 6);
	}

	#[test]
	fn only_line_1_has_data() {
		assert!(line_layout("line-1").is_some());
		assert!(line_layout("line-2").is_none());
		assert!(line_layout("").is_none());
	}

	#[test]
	fn default_layout_loses_dangling_edges() {
		let layout = default_layout().sanitized();
		assert_eq!(layout.nodes.len(), 7);
		let ids: Vec<_> = layout.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["e1", "e2", "e3"]);
	}
}
