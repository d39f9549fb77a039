use eframe::egui;

pub const HELP_TITLE: &str = "Subtitle Blocker Help";

pub const HELP_TEXT: &str = "\
Subtitle Blocker

- Left click and drag: move the blocked area
- Hold the left button and scroll the wheel: adjust opacity
- Drag an edge or corner: resize the blocked area
    * corners change width and height together
    * top and bottom edges change the height
    * left and right edges change the width
- Right click: open the options menu

The background under the widget is Gaussian-blurred, the orange border stays
visible at every opacity, and the widget always stays above other windows.";

/// Help dialog collaborator.
pub trait HelpDialog {
    /// Open the dialog, or bring it to the front if it is already open.
    fn show_or_focus(&mut self);
}

#[derive(Debug, Default)]
pub struct HelpWindow {
    open: bool,
    focus_pending: bool,
}

impl HelpDialog for HelpWindow {
    fn show_or_focus(&mut self) {
        if self.open {
            self.focus_pending = true;
        } else {
            tracing::debug!("opening help window");
            self.open = true;
        }
    }
}

impl HelpWindow {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
        self.focus_pending = false;
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }
        let id = egui::ViewportId::from_hash_of("subtitle_blocker_help");
        if std::mem::take(&mut self.focus_pending) {
            ctx.send_viewport_cmd_to(id, egui::ViewportCommand::Focus);
        }

        let mut still_open = true;
        ctx.show_viewport_immediate(
            id,
            egui::ViewportBuilder::default()
                .with_title(HELP_TITLE)
                .with_inner_size([420.0, 260.0])
                .with_min_inner_size([400.0, 200.0])
                .with_always_on_top(),
            |ctx, _class| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.label(HELP_TEXT);
                });
                if ctx.input(|i| i.viewport().close_requested()) {
                    still_open = false;
                }
            },
        );
        if !still_open {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HelpDialog, HelpWindow};

    #[test]
    fn second_request_focuses_instead_of_reopening() {
        let mut help = HelpWindow::default();
        help.show_or_focus();
        assert!(help.is_open());
        assert!(!help.focus_pending);

        help.show_or_focus();
        assert!(help.is_open());
        assert!(help.focus_pending);

        help.close();
        assert!(!help.is_open());
        assert!(!help.focus_pending);
    }
}
