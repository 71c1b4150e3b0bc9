mod component;
mod controls;
pub mod geometry;
pub mod minimap;
mod render;
mod state;
pub mod style;
mod types;
pub mod viewport;

pub use component::{FlowchartCanvas, FlowchartHandle};
pub use controls::FlowchartControls;
pub use state::{FlowchartState, PointerAction, ViewSettings};
pub use style::Theme;
pub use types::{FlowEdge, HandleId, Layout, MachineNode, MachineNodeData, MachineStatus, Position};
