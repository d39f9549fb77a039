#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use subtitle_blocker::settings::OverlaySettings;
use subtitle_blocker::{blocker, logging, win_util};

fn main() -> anyhow::Result<()> {
    let path = OverlaySettings::default_path();
    let (settings, load_error) = OverlaySettings::load_or_default(&path);
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(settings = %path.display(), "starting subtitle blocker");
    if let Some(err) = load_error {
        tracing::warn!(settings = %path.display(), "ignoring unreadable settings: {err:#}");
    }

    win_util::log_privilege_diagnostic();

    blocker::run(settings)
}
