use crate::blocker::input::{resize_edge_at, resized_geometry};
use crate::blocker::menu::{opacity_label, ContextMenu};
use crate::blocker::model::{CursorShape, PointerButton, ResizeEdge, ScreenRect};
use crate::blocker::monitor::{initial_geometry, primary_screen_or_fallback, ScreenGeometry};
use crate::blocker::state::{Gesture, OverlayLimits, OverlayState};
use crate::settings::OverlaySettings;

/// What the host should do after an input event. Input handlers never draw;
/// they only ask for a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerResponse {
    pub repaint: bool,
    pub cursor: Option<CursorShape>,
}

impl ControllerResponse {
    fn repaint() -> Self {
        Self {
            repaint: true,
            cursor: None,
        }
    }

    fn cursor(shape: CursorShape) -> Self {
        Self {
            repaint: false,
            cursor: Some(shape),
        }
    }
}

/// Owns the overlay state and turns pointer and wheel events into geometry
/// and opacity changes.
pub struct OverlayController<M> {
    state: OverlayState,
    limits: OverlayLimits,
    menu: M,
}

impl<M: ContextMenu> OverlayController<M> {
    /// Place the overlay on the primary screen using the configured defaults.
    pub fn new(settings: &OverlaySettings, screens: &dyn ScreenGeometry, menu: M) -> Self {
        let screen = primary_screen_or_fallback(screens);
        let geometry = initial_geometry(screen, settings);
        tracing::info!(
            x = geometry.x,
            y = geometry.y,
            width = geometry.width,
            height = geometry.height,
            "overlay placed"
        );
        Self::with_geometry(
            geometry,
            settings.default_opacity,
            OverlayLimits::from_settings(settings),
            menu,
        )
    }

    pub fn with_geometry(
        geometry: ScreenRect,
        opacity: f32,
        limits: OverlayLimits,
        mut menu: M,
    ) -> Self {
        let state = OverlayState::new(geometry, opacity, &limits);
        menu.set_opacity_label(&opacity_label(state.opacity()));
        Self {
            state,
            limits,
            menu,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn limits(&self) -> &OverlayLimits {
        &self.limits
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut M {
        &mut self.menu
    }

    pub fn resize_edge_at(&self, local: (i32, i32)) -> Option<ResizeEdge> {
        resize_edge_at(local, self.state.size(), self.limits.edge_handle_size)
    }

    pub fn handle_press(
        &mut self,
        button: PointerButton,
        local: (i32, i32),
        global: (i32, i32),
    ) -> ControllerResponse {
        match button {
            PointerButton::Primary => {
                let (x, y) = self.state.position();
                let gesture = match self.resize_edge_at(local) {
                    Some(edge) => Gesture::Resizing {
                        edge,
                        anchor: global,
                        base: self.state.geometry(),
                    },
                    None => Gesture::Dragging {
                        offset: (global.0 - x, global.1 - y),
                    },
                };
                tracing::debug!(?gesture, "gesture started");
                self.state.set_gesture(gesture);
                ControllerResponse::default()
            }
            PointerButton::Secondary => {
                self.menu
                    .set_opacity_label(&opacity_label(self.state.opacity()));
                self.menu.show_at(global);
                ControllerResponse::default()
            }
            PointerButton::Middle => ControllerResponse::default(),
        }
    }

    pub fn handle_move(&mut self, local: (i32, i32), global: (i32, i32)) -> ControllerResponse {
        match self.state.gesture() {
            Gesture::Idle => {
                ControllerResponse::cursor(CursorShape::for_edge(self.resize_edge_at(local)))
            }
            Gesture::Dragging { offset } => {
                self.state
                    .move_to((global.0 - offset.0, global.1 - offset.1));
                ControllerResponse::repaint()
            }
            Gesture::Resizing { edge, anchor, base } => {
                let delta = (global.0 - anchor.0, global.1 - anchor.1);
                let geometry = resized_geometry(base, edge, delta, &self.limits);
                self.state.set_geometry(geometry);
                ControllerResponse::repaint()
            }
        }
    }

    pub fn handle_release(&mut self, button: PointerButton) -> ControllerResponse {
        if button != PointerButton::Primary {
            return ControllerResponse::default();
        }
        if self.state.primary_held() {
            tracing::debug!(geometry = ?self.state.geometry(), "gesture finished");
        }
        self.state.set_gesture(Gesture::Idle);
        ControllerResponse::default()
    }

    /// Adjust opacity by `delta_y / wheel_divisor`, only while the primary
    /// button is held.
    pub fn handle_wheel(&mut self, delta_y: f32) -> ControllerResponse {
        if !self.state.primary_held() {
            return ControllerResponse::default();
        }
        let opacity = self
            .limits
            .clamp_opacity(self.state.opacity() + delta_y / self.limits.wheel_divisor);
        self.state.set_opacity(opacity);
        self.menu.set_opacity_label(&opacity_label(opacity));
        tracing::trace!(opacity, "opacity adjusted");
        ControllerResponse::repaint()
    }
}
