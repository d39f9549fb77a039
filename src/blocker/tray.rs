use crate::blocker::menu::MenuItem;

/// System tray collaborator. Its lifecycle is independent of the overlay.
///
/// Implementations receive menu snapshots, not a live view: the overlay calls
/// `refresh_menu` whenever the opacity label changes.
pub trait TrayIcon {
    fn attach_menu(&mut self, items: &[MenuItem]);

    fn refresh_menu(&mut self, items: &[MenuItem]) {
        self.attach_menu(items);
    }
}

/// Stand-in used until a platform tray is wired up; records what it was given.
#[derive(Debug, Default)]
pub struct LoggingTray {
    attached: Vec<MenuItem>,
}

impl LoggingTray {
    pub fn attached(&self) -> &[MenuItem] {
        &self.attached
    }
}

impl TrayIcon for LoggingTray {
    fn attach_menu(&mut self, items: &[MenuItem]) {
        tracing::info!(items = items.len(), "tray menu attached");
        self.attached = items.to_vec();
    }

    fn refresh_menu(&mut self, items: &[MenuItem]) {
        tracing::trace!("tray menu refreshed");
        self.attached = items.to_vec();
    }
}
