use crate::blocker::model::{ResizeEdge, ScreenRect};
use crate::settings::OverlaySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Dragging,
    Resizing,
}

/// Active pointer gesture. The anchor means different things per variant:
/// a pointer-to-origin offset while dragging, an absolute global pointer
/// position while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    Dragging {
        offset: (i32, i32),
    },
    Resizing {
        edge: ResizeEdge,
        anchor: (i32, i32),
        base: ScreenRect,
    },
}

/// Size and opacity bounds the overlay must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLimits {
    pub edge_handle_size: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub wheel_divisor: f32,
}

impl Default for OverlayLimits {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

impl OverlayLimits {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            edge_handle_size: settings.edge_handle_size,
            min_width: settings.min_width,
            min_height: settings.min_height,
            min_opacity: settings.min_opacity,
            max_opacity: settings.max_opacity,
            wheel_divisor: settings.wheel_divisor,
        }
    }

    pub fn clamp_opacity(&self, opacity: f32) -> f32 {
        opacity.clamp(self.min_opacity, self.max_opacity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    geometry: ScreenRect,
    opacity: f32,
    gesture: Gesture,
}

impl OverlayState {
    pub fn new(geometry: ScreenRect, opacity: f32, limits: &OverlayLimits) -> Self {
        Self {
            geometry: ScreenRect {
                width: geometry.width.max(limits.min_width),
                height: geometry.height.max(limits.min_height),
                ..geometry
            },
            opacity: limits.clamp_opacity(opacity),
            gesture: Gesture::Idle,
        }
    }

    pub fn geometry(&self) -> ScreenRect {
        self.geometry
    }

    pub fn position(&self) -> (i32, i32) {
        self.geometry.position()
    }

    pub fn size(&self) -> (i32, i32) {
        self.geometry.size()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        match self.gesture {
            Gesture::Idle => InteractionMode::Idle,
            Gesture::Dragging { .. } => InteractionMode::Dragging,
            Gesture::Resizing { .. } => InteractionMode::Resizing,
        }
    }

    pub fn active_edge(&self) -> Option<ResizeEdge> {
        match self.gesture {
            Gesture::Resizing { edge, .. } => Some(edge),
            _ => None,
        }
    }

    pub fn drag_anchor(&self) -> Option<(i32, i32)> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { offset } => Some(offset),
            Gesture::Resizing { anchor, .. } => Some(anchor),
        }
    }

    pub fn pre_gesture_geometry(&self) -> Option<ScreenRect> {
        match self.gesture {
            Gesture::Resizing { base, .. } => Some(base),
            _ => None,
        }
    }

    /// True while the primary button that started a gesture is still held.
    pub fn primary_held(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub(crate) fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    pub(crate) fn move_to(&mut self, position: (i32, i32)) {
        self.geometry.x = position.0;
        self.geometry.y = position.1;
    }

    pub(crate) fn set_geometry(&mut self, geometry: ScreenRect) {
        self.geometry = geometry;
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}
