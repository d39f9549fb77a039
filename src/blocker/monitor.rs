use crate::blocker::error::OverlayError;
use crate::blocker::model::ScreenRect;
use crate::settings::OverlaySettings;
use screenshots::Screen;

/// Used when the primary screen cannot be queried at startup.
pub const FALLBACK_SCREEN: ScreenRect = ScreenRect::new(0, 0, 1920, 1080);

/// Source of screen geometry for initial placement.
pub trait ScreenGeometry {
    fn primary_screen(&self) -> Result<ScreenRect, OverlayError>;
}

/// Queries the attached displays through `screenshots`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemScreens;

impl ScreenGeometry for SystemScreens {
    fn primary_screen(&self) -> Result<ScreenRect, OverlayError> {
        let screens = Screen::all().map_err(|err| OverlayError::platform_query(err.to_string()))?;
        let screen = screens
            .iter()
            .find(|screen| screen.display_info.is_primary)
            .or_else(|| screens.first())
            .ok_or_else(|| OverlayError::platform_query("no displays attached"))?;
        let info = &screen.display_info;
        let rect = ScreenRect::new(info.x, info.y, info.width as i32, info.height as i32);
        if rect.is_empty() {
            return Err(OverlayError::platform_query(format!(
                "primary display reports empty bounds {}x{}",
                info.width, info.height
            )));
        }
        Ok(rect)
    }
}

pub fn primary_screen_or_fallback(screens: &dyn ScreenGeometry) -> ScreenRect {
    match screens.primary_screen() {
        Ok(rect) => rect,
        Err(err) => {
            tracing::warn!(
                "{err}; placing overlay on a {}x{} fallback screen",
                FALLBACK_SCREEN.width,
                FALLBACK_SCREEN.height
            );
            FALLBACK_SCREEN
        }
    }
}

/// Default widget geometry: horizontally centered, with its bottom edge
/// `bottom_margin` above the bottom of `screen`.
pub fn initial_geometry(screen: ScreenRect, settings: &OverlaySettings) -> ScreenRect {
    let width = settings.default_width.max(settings.min_width);
    let height = settings.default_height.max(settings.min_height);
    ScreenRect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + screen.height - height - settings.bottom_margin,
        width,
        height,
    }
}

pub fn intersect(a: ScreenRect, b: ScreenRect) -> Option<ScreenRect> {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = (a.x + a.width).min(b.x + b.width);
    let bottom = (a.y + a.height).min(b.y + b.height);
    let rect = ScreenRect::new(left, top, right - left, bottom - top);
    (!rect.is_empty()).then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    impl ScreenGeometry for Unavailable {
        fn primary_screen(&self) -> Result<ScreenRect, OverlayError> {
            Err(OverlayError::platform_query("no display connection"))
        }
    }

    #[test]
    fn default_placement_centers_near_bottom() {
        let screen = ScreenRect::new(0, 0, 2560, 1440);
        let rect = initial_geometry(screen, &OverlaySettings::default());
        assert_eq!(rect, ScreenRect::new(980, 1290, 600, 100));
    }

    #[test]
    fn placement_respects_screen_origin() {
        let screen = ScreenRect::new(-1920, 0, 1920, 1080);
        let rect = initial_geometry(screen, &OverlaySettings::default());
        assert_eq!(rect.position(), (-1920 + 660, 930));
    }

    #[test]
    fn query_failure_uses_fallback_screen() {
        assert_eq!(primary_screen_or_fallback(&Unavailable), FALLBACK_SCREEN);
    }

    #[test]
    fn intersection_clips_and_rejects_disjoint() {
        let screen = ScreenRect::new(0, 0, 1920, 1080);
        assert_eq!(
            intersect(ScreenRect::new(1800, 1000, 600, 100), screen),
            Some(ScreenRect::new(1800, 1000, 120, 80))
        );
        assert_eq!(intersect(ScreenRect::new(2000, 0, 600, 100), screen), None);
    }
}
