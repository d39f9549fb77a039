use crate::blocker::error::OverlayError;
use crate::blocker::model::ScreenRect;
use crate::blocker::monitor::intersect;
use image::RgbaImage;
use screenshots::Screen;

/// Grabs the pixels currently shown on screen inside a global rect.
pub trait ScreenCapture {
    fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, OverlayError>;
}

/// Region capture through `screenshots`. Parts of the rect that fall off the
/// display containing its top-left corner stay transparent.
#[derive(Debug, Default)]
pub struct RegionCapture;

impl ScreenCapture for RegionCapture {
    fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, OverlayError> {
        if rect.is_empty() {
            return Err(OverlayError::capture(format!(
                "capture bounds are empty ({}x{})",
                rect.width, rect.height
            )));
        }

        let screen = Screen::from_point(rect.x, rect.y)
            .or_else(|_| Screen::from_point(rect.x + rect.width / 2, rect.y + rect.height / 2))
            .map_err(|err| OverlayError::capture(err.to_string()))?;
        let info = &screen.display_info;
        let bounds = ScreenRect::new(info.x, info.y, info.width as i32, info.height as i32);
        let visible = intersect(rect, bounds).ok_or_else(|| {
            OverlayError::capture(format!("{rect:?} lies outside display {bounds:?}"))
        })?;

        let grabbed = screen
            .capture_area(
                visible.x - bounds.x,
                visible.y - bounds.y,
                visible.width as u32,
                visible.height as u32,
            )
            .map_err(|err| OverlayError::capture(err.to_string()))?;

        if visible == rect {
            return Ok(grabbed);
        }

        let mut frame = RgbaImage::new(rect.width as u32, rect.height as u32);
        image::imageops::replace(
            &mut frame,
            &grabbed,
            i64::from(visible.x - rect.x),
            i64::from(visible.y - rect.y),
        );
        Ok(frame)
    }
}
