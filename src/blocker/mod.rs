pub mod blur;
pub mod capture;
pub mod composite;
pub mod controller;
pub mod error;
pub mod input;
pub mod menu;
pub mod model;
pub mod monitor;
pub mod overlay;
pub mod render;
pub mod state;
pub mod tray;

pub use controller::{ControllerResponse, OverlayController};
pub use error::OverlayError;
pub use overlay::{run, OverlayApp};
pub use render::{DrawSurface, FrameOutcome, RenderPipeline, RenderStyle};
pub use state::{InteractionMode, OverlayLimits, OverlayState};
