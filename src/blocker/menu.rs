/// Context menu shown on secondary click and attached to the tray.
pub trait ContextMenu {
    fn show_at(&mut self, global: (i32, i32));
    fn set_opacity_label(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// Disabled entry showing the current opacity.
    OpacityDisplay(String),
    Separator,
    Help,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Help,
    Exit,
}

/// Whole percent, truncated. The small bias keeps values such as 0.7, which
/// are stored just below their decimal, from dropping a point.
pub fn opacity_label(opacity: f32) -> String {
    format!("Opacity: {}%", (opacity * 100.0 + 1e-3).floor() as i32)
}

/// Menu contents plus where it is currently open, if anywhere. Toolkit
/// frontends draw from this model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    label: String,
    open_at: Option<(i32, i32)>,
}

impl MenuModel {
    pub fn new(opacity: f32) -> Self {
        Self {
            label: opacity_label(opacity),
            open_at: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn items(&self) -> Vec<MenuItem> {
        vec![
            MenuItem::OpacityDisplay(self.label.clone()),
            MenuItem::Separator,
            MenuItem::Help,
            MenuItem::Exit,
        ]
    }

    pub fn open_at(&self) -> Option<(i32, i32)> {
        self.open_at
    }

    pub fn close(&mut self) {
        self.open_at = None;
    }
}

impl ContextMenu for MenuModel {
    fn show_at(&mut self, global: (i32, i32)) {
        tracing::debug!(x = global.0, y = global.1, "context menu requested");
        self.open_at = Some(global);
    }

    fn set_opacity_label(&mut self, text: &str) {
        if self.label != text {
            self.label = text.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{opacity_label, ContextMenu, MenuItem, MenuModel};

    #[test]
    fn label_formats_whole_percent() {
        assert_eq!(opacity_label(0.7), "Opacity: 70%");
        assert_eq!(opacity_label(0.6), "Opacity: 60%");
        assert_eq!(opacity_label(1.0), "Opacity: 100%");
        assert_eq!(opacity_label(0.1), "Opacity: 10%");
    }

    #[test]
    fn label_truncates_partial_percent() {
        assert_eq!(opacity_label(0.659), "Opacity: 65%");
        assert_eq!(opacity_label(0.7 + 120.0 / 1200.0), "Opacity: 80%");
        assert_eq!(opacity_label(0.1 + 1.0 / 1200.0), "Opacity: 10%");
    }

    #[test]
    fn items_list_opacity_then_help_and_exit() {
        let mut menu = MenuModel::new(0.7);
        menu.set_opacity_label("Opacity: 42%");
        assert_eq!(
            menu.items(),
            vec![
                MenuItem::OpacityDisplay("Opacity: 42%".to_string()),
                MenuItem::Separator,
                MenuItem::Help,
                MenuItem::Exit,
            ]
        );
    }

    #[test]
    fn show_and_close_track_position() {
        let mut menu = MenuModel::new(0.7);
        assert_eq!(menu.open_at(), None);
        menu.show_at((10, 20));
        assert_eq!(menu.open_at(), Some((10, 20)));
        menu.close();
        assert_eq!(menu.open_at(), None);
    }
}
