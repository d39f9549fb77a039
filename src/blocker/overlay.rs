use crate::blocker::blur::GaussianBlur;
use crate::blocker::capture::RegionCapture;
use crate::blocker::controller::{ControllerResponse, OverlayController};
use crate::blocker::menu::{MenuAction, MenuItem, MenuModel};
use crate::blocker::model::{CursorShape, PointerButton, ScreenRect};
use crate::blocker::monitor::SystemScreens;
use crate::blocker::render::{FrameOutcome, RenderPipeline, RenderStyle};
use crate::blocker::tray::{LoggingTray, TrayIcon};
use crate::help_window::{HelpDialog, HelpWindow};
use crate::settings::OverlaySettings;
use crate::win_util;
use anyhow::anyhow;
use eframe::egui;

pub const APP_NAME: &str = "Subtitle Blocker";

/// egui reports one wheel notch as this many points of scroll.
const SCROLL_POINTS_PER_NOTCH: f32 = 50.0;
/// Angle-delta units per wheel notch, as most platforms report them.
const ANGLE_DELTA_PER_NOTCH: f32 = 120.0;

const MENU_TITLE: &str = "Subtitle Blocker Menu";
const MENU_WIDTH: f32 = 140.0;
const MENU_ROW_HEIGHT: f32 = 24.0;
const MENU_SEPARATOR_HEIGHT: f32 = 8.0;
const MENU_MARGIN: f32 = 8.0;

/// Pointer event in widget-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    Moved((i32, i32)),
    Pressed(PointerButton, (i32, i32)),
    Released(PointerButton, (i32, i32)),
}

pub fn pointer_input_from_event(event: &egui::Event) -> Option<PointerInput> {
    match event {
        egui::Event::PointerMoved(pos) => Some(PointerInput::Moved(to_pixels(*pos))),
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = match button {
                egui::PointerButton::Primary => PointerButton::Primary,
                egui::PointerButton::Secondary => PointerButton::Secondary,
                egui::PointerButton::Middle => PointerButton::Middle,
                _ => return None,
            };
            let local = to_pixels(*pos);
            Some(if *pressed {
                PointerInput::Pressed(button, local)
            } else {
                PointerInput::Released(button, local)
            })
        }
        _ => None,
    }
}

pub fn wheel_angle_delta(scroll_points: f32) -> f32 {
    scroll_points / SCROLL_POINTS_PER_NOTCH * ANGLE_DELTA_PER_NOTCH
}

pub fn cursor_icon(shape: CursorShape) -> egui::CursorIcon {
    match shape {
        CursorShape::Default => egui::CursorIcon::Default,
        CursorShape::ResizeVertical => egui::CursorIcon::ResizeVertical,
        CursorShape::ResizeHorizontal => egui::CursorIcon::ResizeHorizontal,
        CursorShape::ResizeForwardDiagonal => egui::CursorIcon::ResizeNwSe,
        CursorShape::ResizeBackDiagonal => egui::CursorIcon::ResizeNeSw,
    }
}

/// Native rect of the context menu popup. It opens at the pointer and is
/// sized to its rows, independent of how small the overlay itself is.
pub fn menu_popup_rect(global: (i32, i32), items: &[MenuItem]) -> egui::Rect {
    let rows: f32 = items
        .iter()
        .map(|item| match item {
            MenuItem::Separator => MENU_SEPARATOR_HEIGHT,
            _ => MENU_ROW_HEIGHT,
        })
        .sum();
    egui::Rect::from_min_size(
        egui::pos2(global.0 as f32, global.1 as f32),
        egui::vec2(MENU_WIDTH, rows + 2.0 * MENU_MARGIN),
    )
}

fn to_pixels(pos: egui::Pos2) -> (i32, i32) {
    (pos.x.round() as i32, pos.y.round() as i32)
}

pub fn native_options(geometry: ScreenRect, settings: &OverlaySettings) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_position([geometry.x as f32, geometry.y as f32])
            .with_inner_size([geometry.width as f32, geometry.height as f32])
            .with_min_inner_size([settings.min_width as f32, settings.min_height as f32])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false),
        ..Default::default()
    }
}

/// Build the overlay and run the window event loop until it closes.
pub fn run(settings: OverlaySettings) -> anyhow::Result<()> {
    let controller = OverlayController::new(
        &settings,
        &SystemScreens,
        MenuModel::new(settings.default_opacity),
    );

    let pipeline = RenderPipeline::new(
        RegionCapture,
        GaussianBlur::new(settings.blur_radius),
        RenderStyle::from_settings(&settings),
    );
    let options = native_options(controller.state().geometry(), &settings);
    let mut tray = LoggingTray::default();
    tray.attach_menu(&controller.menu().items());
    let app = OverlayApp::new(controller, pipeline, tray);

    eframe::run_native(APP_NAME, options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow!("overlay window failed: {err}"))
}

pub struct OverlayApp {
    controller: OverlayController<MenuModel>,
    pipeline: RenderPipeline<RegionCapture, GaussianBlur>,
    help: HelpWindow,
    texture: Option<egui::TextureHandle>,
    /// Geometry last pushed to the native window.
    applied: ScreenRect,
    cursor: CursorShape,
    menu_had_focus: bool,
    tray: LoggingTray,
    /// Opacity label the tray menu was last given.
    tray_label: String,
    capture_exclusion_attempted: bool,
}

impl OverlayApp {
    pub fn new(
        controller: OverlayController<MenuModel>,
        pipeline: RenderPipeline<RegionCapture, GaussianBlur>,
        tray: LoggingTray,
    ) -> Self {
        let applied = controller.state().geometry();
        let tray_label = controller.menu().label().to_string();
        Self {
            controller,
            pipeline,
            help: HelpWindow::default(),
            texture: None,
            applied,
            cursor: CursorShape::Default,
            menu_had_focus: false,
            tray,
            tray_label,
            capture_exclusion_attempted: false,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) -> bool {
        let (events, scroll_y, origin) = ctx.input(|i| {
            let origin = i.viewport().inner_rect.map(|rect| to_pixels(rect.min));
            (i.events.clone(), i.raw_scroll_delta.y, origin)
        });
        let origin = origin.unwrap_or_else(|| self.controller.state().position());
        let menu_open = self.controller.menu().open_at().is_some();
        let mut repaint = false;

        for input in events.iter().filter_map(pointer_input_from_event) {
            let response = match input {
                PointerInput::Moved(local) => {
                    let global = (origin.0 + local.0, origin.1 + local.1);
                    self.controller.handle_move(local, global)
                }
                PointerInput::Pressed(button, local) => {
                    if menu_open {
                        // The menu lives in its own popup; a click on the overlay dismisses it.
                        self.controller.menu_mut().close();
                        continue;
                    }
                    let global = (origin.0 + local.0, origin.1 + local.1);
                    self.controller.handle_press(button, local, global)
                }
                PointerInput::Released(button, _) => self.controller.handle_release(button),
            };
            repaint |= self.apply_response(response);
        }

        if scroll_y != 0.0 {
            let response = self.controller.handle_wheel(wheel_angle_delta(scroll_y));
            repaint |= self.apply_response(response);
        }
        repaint
    }

    fn apply_response(&mut self, response: ControllerResponse) -> bool {
        if let Some(shape) = response.cursor {
            self.cursor = shape;
        }
        response.repaint
    }

    fn sync_tray(&mut self) {
        let label = self.controller.menu().label();
        if label != self.tray_label {
            self.tray_label = label.to_string();
            self.tray.refresh_menu(&self.controller.menu().items());
        }
    }

    fn sync_window_geometry(&mut self, ctx: &egui::Context) {
        let geometry = self.controller.state().geometry();
        if geometry.position() != self.applied.position() {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                geometry.x as f32,
                geometry.y as f32,
            )));
        }
        if geometry.size() != self.applied.size() {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                geometry.width as f32,
                geometry.height as f32,
            )));
        }
        self.applied = geometry;
    }

    fn paint(&mut self, ctx: &egui::Context) {
        let (buffer, outcome) = self.pipeline.render_to_buffer(self.controller.state());
        if let FrameOutcome::Degraded(err) = &outcome {
            tracing::trace!("frame degraded: {err}");
        }
        if buffer.width == 0 || buffer.height == 0 {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width as usize, buffer.height as usize],
            &buffer.pixels,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("overlay_frame", image, egui::TextureOptions::LINEAR));
            }
        }

        let screen = ctx.screen_rect();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        screen,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            });
    }

    fn menu_ui(&mut self, ctx: &egui::Context) {
        let Some(global) = self.controller.menu().open_at() else {
            self.menu_had_focus = false;
            return;
        };
        let items = self.controller.menu().items();
        let rect = menu_popup_rect(global, &items);
        let had_focus = &mut self.menu_had_focus;
        let mut action = None;
        let mut dismissed = false;

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("subtitle_blocker_menu"),
            egui::ViewportBuilder::default()
                .with_title(MENU_TITLE)
                .with_position(rect.min)
                .with_inner_size(rect.size())
                .with_decorations(false)
                .with_resizable(false)
                .with_always_on_top()
                .with_taskbar(false),
            |ctx, _class| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::menu(&ctx.style()))
                    .show(ctx, |ui| {
                        for item in items {
                            match item {
                                MenuItem::OpacityDisplay(label) => {
                                    ui.add_enabled(false, egui::Button::new(label));
                                }
                                MenuItem::Separator => {
                                    ui.separator();
                                }
                                MenuItem::Help => {
                                    if ui.button("Help").clicked() {
                                        action = Some(MenuAction::Help);
                                    }
                                }
                                MenuItem::Exit => {
                                    if ui.button("Exit").clicked() {
                                        action = Some(MenuAction::Exit);
                                    }
                                }
                            }
                        }
                    });

                let (focused, close, escape) = ctx.input(|i| {
                    (
                        i.viewport().focused,
                        i.viewport().close_requested(),
                        i.key_pressed(egui::Key::Escape),
                    )
                });
                // Losing focus after having had it means the user clicked elsewhere.
                match focused {
                    Some(true) => *had_focus = true,
                    Some(false) if *had_focus => dismissed = true,
                    _ => {}
                }
                dismissed |= close || escape;
            },
        );

        if dismissed && action.is_none() {
            self.controller.menu_mut().close();
        }

        match action {
            Some(MenuAction::Help) => {
                self.controller.menu_mut().close();
                self.help.show_or_focus();
            }
            Some(MenuAction::Exit) => {
                tracing::info!("exit requested from context menu");
                self.controller.menu_mut().close();
                self.help.close();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            None => {}
        }
    }
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if !self.capture_exclusion_attempted {
            self.capture_exclusion_attempted = true;
            if let Err(err) = win_util::exclude_from_capture(frame) {
                tracing::warn!("could not exclude overlay from capture: {err}");
            }
        }

        let repaint = self.handle_input(ctx);
        self.sync_tray();
        self.sync_window_geometry(ctx);
        self.paint(ctx);
        self.menu_ui(ctx);
        self.help.ui(ctx);

        ctx.set_cursor_icon(cursor_icon(self.cursor));
        if repaint {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_map_to_local_pixels() {
        let event = egui::Event::PointerButton {
            pos: egui::pos2(4.6, 10.2),
            button: egui::PointerButton::Secondary,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        };
        assert_eq!(
            pointer_input_from_event(&event),
            Some(PointerInput::Pressed(PointerButton::Secondary, (5, 10)))
        );

        let event = egui::Event::PointerMoved(egui::pos2(300.0, 50.0));
        assert_eq!(
            pointer_input_from_event(&event),
            Some(PointerInput::Moved((300, 50)))
        );
    }

    #[test]
    fn extra_buttons_and_other_events_are_ignored() {
        let event = egui::Event::PointerButton {
            pos: egui::pos2(0.0, 0.0),
            button: egui::PointerButton::Extra1,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        };
        assert_eq!(pointer_input_from_event(&event), None);
        assert_eq!(pointer_input_from_event(&egui::Event::PointerGone), None);
    }

    #[test]
    fn one_scroll_notch_is_one_angle_notch() {
        assert_eq!(wheel_angle_delta(50.0), 120.0);
        assert_eq!(wheel_angle_delta(-100.0), -240.0);
    }

    #[test]
    fn menu_popup_is_not_bounded_by_a_shallow_widget() {
        let items = MenuModel::new(0.7).items();
        let widget = ScreenRect::new(100, 900, 600, 20);

        let rect = menu_popup_rect((400, 905), &items);

        assert_eq!(rect.min, egui::pos2(400.0, 905.0));
        assert!(rect.height() > widget.height as f32);
        assert_eq!(
            rect.height(),
            3.0 * MENU_ROW_HEIGHT + MENU_SEPARATOR_HEIGHT + 2.0 * MENU_MARGIN
        );
        assert!(rect.max.y > (widget.y + widget.height) as f32);
    }

    #[test]
    fn diagonal_cursors_match_corners() {
        assert_eq!(
            cursor_icon(CursorShape::ResizeForwardDiagonal),
            egui::CursorIcon::ResizeNwSe
        );
        assert_eq!(
            cursor_icon(CursorShape::ResizeBackDiagonal),
            egui::CursorIcon::ResizeNeSw
        );
    }
}
