use super::types::MachineStatus;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

impl Theme {
	pub fn as_str(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Theme::Light => Theme::Dark,
			Theme::Dark => Theme::Light,
		}
	}

	pub fn palette(self) -> &'static Palette {
		match self {
			Theme::Light => &LIGHT,
			Theme::Dark => &DARK,
		}
	}
}

/// Canvas colours for one theme.
#[derive(Debug)]
pub struct Palette {
	pub background: &'static str,
	pub grid_dot: &'static str,
	pub card: &'static str,
	pub card_border: &'static str,
	pub card_divider: &'static str,
	pub title: &'static str,
	pub muted_text: &'static str,
	pub strong_text: &'static str,
	pub warning_text: &'static str,
	pub bar_track: &'static str,
	pub bar_fill: &'static str,
	pub button_border: &'static str,
	pub button_text: &'static str,
	pub primary_handle: &'static str,
	pub aux_handle: &'static str,
	pub handle_border: &'static str,
	pub edge: &'static str,
	pub edge_base: &'static str,
	pub label_fill: &'static str,
	pub arrow: &'static str,
	pub minimap_bg: &'static str,
	pub minimap_border: &'static str,
	pub minimap_mask: &'static str,
	pub shadow: &'static str,
}

const LIGHT: Palette = Palette {
	background: "#FFFFFF",
	grid_dot: "#D1D5DB",
	card: "#FFFFFF",
	card_border: "#D1D5DB",
	card_divider: "#E5E7EB",
	title: "#111827",
	muted_text: "#6B7280",
	strong_text: "#374151",
	warning_text: "#CA8A04",
	bar_track: "#F3F4F6",
	bar_fill: "#22C55E",
	button_border: "#D1D5DB",
	button_text: "#111827",
	primary_handle: "#14B8A6",
	aux_handle: "#9CA3AF",
	handle_border: "#D1D5DB",
	edge: "#9CA3AF",
	edge_base: "#E5E7EB",
	label_fill: "#FFFFFF",
	arrow: "#6B7280",
	minimap_bg: "#F3F4F6",
	minimap_border: "#E5E7EB",
	minimap_mask: "rgba(249, 250, 251, 0.7)",
	shadow: "rgba(0, 0, 0, 0.15)",
};

const DARK: Palette = Palette {
	background: "#030712",
	grid_dot: "#374151",
	card: "#1F2937",
	card_border: "#374151",
	card_divider: "#374151",
	title: "#F3F4F6",
	muted_text: "#9CA3AF",
	strong_text: "#D1D5DB",
	warning_text: "#FACC15",
	bar_track: "#374151",
	bar_fill: "#22C55E",
	button_border: "#4B5563",
	button_text: "#D1D5DB",
	primary_handle: "#14B8A6",
	aux_handle: "#9CA3AF",
	handle_border: "#374151",
	edge: "#4B5563",
	edge_base: "#374151",
	label_fill: "#1F2937",
	arrow: "#9CA3AF",
	minimap_bg: "#111827",
	minimap_border: "#374151",
	minimap_mask: "rgba(17, 24, 39, 0.7)",
	shadow: "rgba(0, 0, 0, 0.5)",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIcon {
	CheckCircle,
	AlertTriangle,
	Clock,
	FileText,
}

impl StatusIcon {
	pub fn glyph(self) -> &'static str {
		match self {
			StatusIcon::CheckCircle => "\u{2714}",
			StatusIcon::AlertTriangle => "\u{26A0}",
			StatusIcon::Clock => "\u{23F1}",
			StatusIcon::FileText => "\u{1F4C4}",
		}
	}
}

/// Badge appearance for a machine status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusStyle {
	pub label: &'static str,
	pub background: &'static str,
	pub icon: StatusIcon,
	pub text_color: &'static str,
}

const WHITE: &str = "#FFFFFF";

const STATUS_STYLES: [(MachineStatus, StatusStyle); 5] = [
	(
		MachineStatus::Working,
		StatusStyle {
			label: "Working",
			background: "#22C55E",
			icon: StatusIcon::CheckCircle,
			text_color: WHITE,
		},
	),
	(
		MachineStatus::NeedsMaintenance,
		StatusStyle {
			label: "Needs Maintenance",
			background: "#F97316",
			icon: StatusIcon::AlertTriangle,
			text_color: WHITE,
		},
	),
	(
		MachineStatus::NotWorking,
		StatusStyle {
			label: "Not Working",
			background: "#EF4444",
			icon: StatusIcon::AlertTriangle,
			text_color: WHITE,
		},
	),
	(
		MachineStatus::ReviewPending,
		StatusStyle {
			label: "Review Pending",
			background: "#FACC15",
			icon: StatusIcon::Clock,
			text_color: "#1F2937",
		},
	),
	(
		MachineStatus::ReportNotFiled,
		StatusStyle {
			label: "Report Not Filed",
			background: "#9CA3AF",
			icon: StatusIcon::FileText,
			text_color: WHITE,
		},
	),
];

impl StatusStyle {
	pub fn for_status(status: MachineStatus) -> StatusStyle {
		STATUS_STYLES
			.iter()
			.find(|(s, _)| *s == status)
			.map(|(_, style)| *style)
			.unwrap_or(STATUS_STYLES[4].1)
	}
}

/// Edge stroke colour for a correlation value; `None` uses the theme's edge colour.
pub fn correlation_color(correlation: Option<f64>, theme: Theme) -> &'static str {
	let Some(c) = correlation else {
		return theme.palette().edge;
	};
	if c > 0.8 {
		"#10B981"
	} else if c > 0.5 {
		"#3B82F6"
	} else if c > 0.0 {
		"#F59E0B"
	} else if c > -0.5 {
		"#EF4444"
	} else {
		"#6B7280"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_known_status_has_its_own_label() {
		for status in MachineStatus::ALL {
			assert_eq!(StatusStyle::for_status(status).label, status.as_str());
		}
	}

	#[test]
	fn unrecognized_status_uses_report_not_filed_style() {
		let fallback = StatusStyle::for_status(MachineStatus::ReportNotFiled);
		assert_eq!(StatusStyle::for_status(MachineStatus::Unrecognized), fallback);
		assert_eq!(
			StatusStyle::for_status(MachineStatus::from("Overheating")),
			fallback
		);
		assert_eq!(fallback.icon, StatusIcon::FileText);
	}

	#[test]
	fn review_pending_uses_dark_text() {
		let style = StatusStyle::for_status(MachineStatus::ReviewPending);
		assert_eq!(style.text_color, "#1F2937");
		assert_eq!(style.icon, StatusIcon::Clock);
	}

	#[test]
	fn correlation_thresholds() {
		assert_eq!(correlation_color(Some(0.9), Theme::Light), "#10B981");
		assert_eq!(correlation_color(Some(0.8), Theme::Light), "#3B82F6");
		assert_eq!(correlation_color(Some(0.5), Theme::Light), "#F59E0B");
		assert_eq!(correlation_color(Some(0.0), Theme::Light), "#EF4444");
		assert_eq!(correlation_color(Some(-0.45), Theme::Light), "#EF4444");
		assert_eq!(correlation_color(Some(-0.64), Theme::Light), "#6B7280");
	}

	#[test]
	fn missing_correlation_follows_theme() {
		assert_eq!(correlation_color(None, Theme::Dark), "#4B5563");
		assert_eq!(correlation_color(None, Theme::Light), "#9CA3AF");
	}

	#[test]
	fn theme_toggle_round_trips() {
		assert_eq!(Theme::Light.toggled(), Theme::Dark);
		assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
	}
}
