use crate::blocker::blur::BlurFilter;
use crate::blocker::capture::ScreenCapture;
use crate::blocker::composite::RgbaBuffer;
use crate::blocker::error::OverlayError;
use crate::blocker::model::Color;
use crate::blocker::state::OverlayState;
use crate::settings::OverlaySettings;
use image::RgbaImage;

/// Target the pipeline paints a frame into.
pub trait DrawSurface {
    fn draw_image(&mut self, image: &RgbaImage, opacity: f32);
    /// Fill the whole surface.
    fn fill(&mut self, color: Color, opacity: f32);
    /// Stroke a `width`-pixel ring along the outer edge.
    fn stroke_border(&mut self, color: Color, width: u32, opacity: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub dim_color: Color,
    pub dim_factor: f32,
    pub border_color: Color,
    pub border_width: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

impl RenderStyle {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            dim_color: Color::BLACK,
            dim_factor: settings.dim_factor,
            border_color: Color::from_rgba_array(settings.border_color),
            border_width: settings.border_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Composited,
    /// Capture failed; only the dark layer and border were drawn.
    Degraded(OverlayError),
}

/// Capture, blur and composite one frame from the current overlay state.
///
/// Every call grabs the screen afresh; nothing is cached between frames, so
/// coalesced redraw requests simply paint the latest state.
pub struct RenderPipeline<C, B> {
    capture: C,
    blur: B,
    style: RenderStyle,
    failed_frames: u32,
}

impl<C: ScreenCapture, B: BlurFilter> RenderPipeline<C, B> {
    pub fn new(capture: C, blur: B, style: RenderStyle) -> Self {
        Self {
            capture,
            blur,
            style,
            failed_frames: 0,
        }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Consecutive frames that fell back to the degraded path.
    pub fn failed_frames(&self) -> u32 {
        self.failed_frames
    }

    pub fn render_frame(
        &mut self,
        state: &OverlayState,
        surface: &mut dyn DrawSurface,
    ) -> FrameOutcome {
        let opacity = state.opacity();

        let outcome = match self.capture.capture(state.geometry()) {
            Ok(captured) => {
                let blurred = self.blur.blur(&captured);
                surface.draw_image(&blurred, opacity);
                self.note_success();
                FrameOutcome::Composited
            }
            Err(err) => {
                self.note_failure(&err);
                FrameOutcome::Degraded(err)
            }
        };

        surface.fill(self.style.dim_color, self.style.dim_factor * opacity);
        surface.stroke_border(self.style.border_color, self.style.border_width, 1.0);
        outcome
    }

    /// Render into a fresh transparent buffer the size of the widget.
    pub fn render_to_buffer(&mut self, state: &OverlayState) -> (RgbaBuffer, FrameOutcome) {
        let (width, height) = state.size();
        let mut buffer = RgbaBuffer::transparent(width.max(0) as u32, height.max(0) as u32);
        let outcome = self.render_frame(state, &mut buffer);
        (buffer, outcome)
    }

    fn note_success(&mut self) {
        if self.failed_frames > 0 {
            tracing::debug!(
                failed_frames = self.failed_frames,
                "screen capture recovered"
            );
        }
        self.failed_frames = 0;
    }

    fn note_failure(&mut self, err: &OverlayError) {
        if self.failed_frames == 0 {
            tracing::warn!("{err}; drawing overlay without background");
        } else {
            tracing::trace!(failed_frames = self.failed_frames, "{err}");
        }
        self.failed_frames = self.failed_frames.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocker::blur::GaussianBlur;
    use crate::blocker::model::ScreenRect;
    use crate::blocker::state::OverlayLimits;
    use image::Rgba;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Image { opacity: f32, size: (u32, u32) },
        Fill { color: Color, opacity: f32 },
        Border { color: Color, width: u32, opacity: f32 },
    }

    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<Op>,
    }

    impl DrawSurface for RecordingSurface {
        fn draw_image(&mut self, image: &RgbaImage, opacity: f32) {
            self.ops.push(Op::Image {
                opacity,
                size: image.dimensions(),
            });
        }

        fn fill(&mut self, color: Color, opacity: f32) {
            self.ops.push(Op::Fill { color, opacity });
        }

        fn stroke_border(&mut self, color: Color, width: u32, opacity: f32) {
            self.ops.push(Op::Border {
                color,
                width,
                opacity,
            });
        }
    }

    struct SolidCapture {
        grabs: Vec<ScreenRect>,
    }

    impl ScreenCapture for SolidCapture {
        fn capture(&mut self, rect: ScreenRect) -> Result<RgbaImage, OverlayError> {
            self.grabs.push(rect);
            Ok(RgbaImage::from_pixel(
                rect.width as u32,
                rect.height as u32,
                Rgba([200, 200, 200, 255]),
            ))
        }
    }

    struct DeniedCapture;

    impl ScreenCapture for DeniedCapture {
        fn capture(&mut self, _rect: ScreenRect) -> Result<RgbaImage, OverlayError> {
            Err(OverlayError::capture("permission denied"))
        }
    }

    fn state(opacity: f32) -> OverlayState {
        OverlayState::new(
            ScreenRect::new(40, 60, 120, 30),
            opacity,
            &OverlayLimits::default(),
        )
    }

    #[test]
    fn frame_layers_run_in_order_with_scaled_opacities() {
        let mut pipeline = RenderPipeline::new(
            SolidCapture { grabs: Vec::new() },
            GaussianBlur::new(10.0),
            RenderStyle::default(),
        );
        let mut surface = RecordingSurface::default();

        let outcome = pipeline.render_frame(&state(0.5), &mut surface);

        assert_eq!(outcome, FrameOutcome::Composited);
        assert_eq!(pipeline.capture.grabs, vec![ScreenRect::new(40, 60, 120, 30)]);
        assert_eq!(
            surface.ops,
            vec![
                Op::Image {
                    opacity: 0.5,
                    size: (120, 30)
                },
                Op::Fill {
                    color: Color::BLACK,
                    opacity: 0.3 * 0.5
                },
                Op::Border {
                    color: Color::rgba(255, 140, 0, 255),
                    width: 2,
                    opacity: 1.0
                },
            ]
        );
    }

    #[test]
    fn every_frame_captures_afresh() {
        let mut pipeline = RenderPipeline::new(
            SolidCapture { grabs: Vec::new() },
            GaussianBlur::new(0.0),
            RenderStyle::default(),
        );
        let mut surface = RecordingSurface::default();
        let mut overlay = state(0.7);

        pipeline.render_frame(&overlay, &mut surface);
        overlay.move_to((300, 400));
        pipeline.render_frame(&overlay, &mut surface);
        pipeline.render_frame(&overlay, &mut surface);

        assert_eq!(
            pipeline.capture.grabs,
            vec![
                ScreenRect::new(40, 60, 120, 30),
                ScreenRect::new(300, 400, 120, 30),
                ScreenRect::new(300, 400, 120, 30),
            ]
        );
    }

    #[test]
    fn capture_failure_degrades_to_overlay_and_border() {
        let mut pipeline =
            RenderPipeline::new(DeniedCapture, GaussianBlur::new(10.0), RenderStyle::default());
        let mut surface = RecordingSurface::default();

        let outcome = pipeline.render_frame(&state(0.8), &mut surface);

        assert!(matches!(
            outcome,
            FrameOutcome::Degraded(OverlayError::CaptureFailure { .. })
        ));
        assert_eq!(surface.ops.len(), 2);
        assert!(matches!(surface.ops[0], Op::Fill { .. }));
        assert!(matches!(surface.ops[1], Op::Border { opacity, .. } if opacity == 1.0));

        pipeline.render_frame(&state(0.8), &mut surface);
        assert_eq!(pipeline.failed_frames(), 2);
    }

    #[test]
    fn border_stays_opaque_across_the_opacity_range() {
        let mut pipeline =
            RenderPipeline::new(DeniedCapture, GaussianBlur::new(0.0), RenderStyle::default());

        for step in 1..=10 {
            let (buffer, _) = pipeline.render_to_buffer(&state(step as f32 / 10.0));
            assert_eq!(buffer.pixel(0, 0), Color::rgba(255, 140, 0, 255));
            assert_eq!(buffer.pixel(119, 29), Color::rgba(255, 140, 0, 255));
            assert_eq!(buffer.pixel(1, 15), Color::rgba(255, 140, 0, 255));
        }
    }

    #[test]
    fn dark_layer_is_always_dimmer_than_main_opacity() {
        let mut pipeline =
            RenderPipeline::new(DeniedCapture, GaussianBlur::new(0.0), RenderStyle::default());

        let (buffer, _) = pipeline.render_to_buffer(&state(1.0));
        let interior = buffer.pixel(60, 15);
        assert_eq!((interior.r, interior.g, interior.b), (0, 0, 0));
        assert_eq!(interior.a, 77);
    }
}
