//! Per-frame update logic for [`RulerPanel`].
//!
//! Each frame: drain the capture channel (in delivery order), apply any
//! pending controller requests, render the footer and the camera view with
//! its pin overlay and cards, then publish state and emit events for
//! whatever changed.

use eframe::egui;
use tracing::{debug, warn};

use crate::capture::CaptureCommand;
use crate::controllers::{CameraInfo, SessionSnapshot};
use crate::data::point::Point;
use crate::data::session::SessionMode;
use crate::events::{
    CalibrationMeta, CameraMeta, ClickMeta, EventKind, ModeMeta, PinMeta, PlaneShiftMeta,
    ResultMeta, RulerEvent,
};
use crate::panels::{overlay, plane_shift_ui, status_ui};

use super::RulerPanel;

impl RulerPanel {
    /// Main per-frame update: ingest capture commands, apply controllers,
    /// render, publish. Call from an egui `Ui` context each frame.
    pub fn update(&mut self, ui: &mut egui::Ui) {
        self.ingest(ui.ctx());
        self.apply_controllers();

        if self.cfg.features.instruction_bar {
            self.render_footer(ui);
        }
        self.render_view(ui);
        self.render_cards(ui.ctx());

        self.publish_state();
        self.emit_mode_change();
    }

    // ── Capture ingestion ────────────────────────────────────────────────

    /// Process every pending [`CaptureCommand`], in order.
    fn ingest(&mut self, ctx: &egui::Context) {
        while let Ok(command) = self.rx.try_recv() {
            match command {
                CaptureCommand::Ready { mut stream, width, height } => {
                    if !self.session.is_camera_on() {
                        // The acquisition resolved after the camera was
                        // toggled off: release the device, keep nothing.
                        debug!("late capture-ready discarded, stopping stream");
                        stream.stop();
                        continue;
                    }
                    self.release_stream();
                    self.stream = Some(stream);
                    debug!(width, height, "capture stream attached");
                    self.session.handle_camera_ready();
                    let mut evt = RulerEvent::new(EventKind::CAMERA_READY);
                    evt.camera = Some(CameraMeta {
                        on: true,
                        error: None,
                    });
                    self.emit(evt);
                }
                CaptureCommand::Frame(frame) => {
                    if self.session.is_camera_on() {
                        self.upload_frame(ctx, frame);
                    }
                }
                CaptureCommand::Error { message } => {
                    if !self.session.is_camera_on() {
                        continue;
                    }
                    self.release_stream();
                    self.session.handle_camera_error(message.clone());
                    let mut evt = RulerEvent::new(EventKind::CAMERA_ERROR);
                    evt.camera = Some(CameraMeta {
                        on: true,
                        error: Some(message),
                    });
                    self.emit(evt);
                }
            }
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context, frame: crate::capture::CameraFrame) {
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.rgba.len() != expected {
            warn!(
                width = frame.width,
                height = frame.height,
                bytes = frame.rgba.len(),
                "dropping malformed camera frame"
            );
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("camera-frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Stop and drop the device guard, if any. Safe to call repeatedly.
    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }

    // ── Programmatic interaction ─────────────────────────────────────────

    fn apply_controllers(&mut self) {
        if let Some(ctrl) = self.camera_ctrl.clone() {
            let (set_on, toggle) = ctrl.take_requests();
            if let Some(on) = set_on {
                if on != self.session.is_camera_on() {
                    self.toggle_camera();
                }
            }
            if toggle {
                self.toggle_camera();
            }
        }
        if let Some(ctrl) = self.session_ctrl.clone() {
            let (remeasure, recalibrate, plane_shift) = ctrl.take_requests();
            if remeasure {
                self.remeasure();
            }
            if recalibrate {
                self.recalibrate();
            }
            if let Some(value) = plane_shift {
                self.set_plane_shift(value);
            }
        }
    }

    /// Flip the camera flag, releasing the capture stream when turning
    /// off. No device resource outlives the off transition.
    pub fn toggle_camera(&mut self) {
        self.session.toggle_camera();
        if !self.session.is_camera_on() {
            self.release_stream();
            self.texture = None;
        }
        let mut evt = RulerEvent::new(EventKind::CAMERA_TOGGLED);
        evt.camera = Some(CameraMeta {
            on: self.session.is_camera_on(),
            error: self.session.camera_error().map(str::to_string),
        });
        self.emit(evt);
    }

    /// Discard the current result and start a fresh measurement.
    pub fn remeasure(&mut self) {
        let was_showing = self.session.mode() == SessionMode::ShowResult;
        self.session.remeasure();
        if was_showing && self.session.mode() == SessionMode::MeasureStep1 {
            self.emit(RulerEvent::new(EventKind::MEASUREMENT_CLEARED));
        }
    }

    /// Discard the baseline and restart calibration.
    pub fn recalibrate(&mut self) {
        let had_baseline = self.session.baseline().is_some();
        self.session.recalibrate();
        if had_baseline && self.session.mode() == SessionMode::CalibrateStep1 {
            self.emit(RulerEvent::new(EventKind::RECALIBRATED));
        }
    }

    /// Assert a new plane shift, emitting change/result events.
    pub fn set_plane_shift(&mut self, value: f64) {
        let prev_distance = self.session.measured_distance();
        self.session.set_plane_shift(value);
        let mut evt = RulerEvent::new(EventKind::PLANE_SHIFT_CHANGED);
        evt.plane_shift = Some(PlaneShiftMeta { value });
        self.emit(evt);
        self.emit_result_if_updated(prev_distance);
    }

    // ── Rendering ────────────────────────────────────────────────────────

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        let mut toggle = false;
        let mut shift_changed = false;
        let prev_distance = self.session.measured_distance();
        let new_shift;

        {
            let session = &mut self.session;
            let cfg = &self.cfg;
            egui::TopBottomPanel::bottom("ruler-footer").show_inside(ui, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    toggle = status_ui::show(ui, session, cfg.features.camera_toggle).toggle_camera;
                    ui.separator();
                    if cfg.features.plane_shift_control {
                        shift_changed = plane_shift_ui::show(ui, session, &cfg.plane_shift);
                    }
                });
                ui.add_space(4.0);
            });
            new_shift = session.plane_shift();
        }

        if toggle {
            self.toggle_camera();
        }
        if shift_changed {
            let mut evt = RulerEvent::new(EventKind::PLANE_SHIFT_CHANGED);
            evt.plane_shift = Some(PlaneShiftMeta { value: new_shift });
            self.emit(evt);
            self.emit_result_if_updated(prev_distance);
        }
    }

    fn render_view(&mut self, ui: &mut egui::Ui) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show_inside(ui, |ui| {
                let rect = ui.max_rect();

                // Camera feed (most recent frame), black while off/waiting.
                let mut drew_frame = false;
                if self.session.is_camera_on() {
                    if let Some(texture) = &self.texture {
                        let uv = cover_uv(texture.size_vec2(), rect.size());
                        ui.painter()
                            .image(texture.id(), rect, uv, egui::Color32::WHITE);
                        drew_frame = true;
                    }
                }
                if !drew_frame {
                    ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
                }

                // Clicks on the view place pins; clicks over a card do not.
                let response = ui.interact(rect, ui.id().with("camera-view"), egui::Sense::click());
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let on_overlay = self.card_rects.iter().any(|r| r.contains(pos));
                        self.handle_click(Point::new(pos.x as f64, pos.y as f64), on_overlay);
                    }
                }

                let style = &self.cfg.style;
                let features = &self.cfg.features;
                overlay::draw_pair(
                    ui.painter(),
                    self.session.calibration_points(),
                    style.calibration_color,
                    style,
                    features.pins,
                    features.connecting_lines,
                );
                overlay::draw_pair(
                    ui.painter(),
                    self.session.measurement_points(),
                    style.measurement_color,
                    style,
                    features.pins,
                    features.connecting_lines,
                );
            });
    }

    fn render_cards(&mut self, ctx: &egui::Context) {
        let before_mode = self.session.mode();
        let had_baseline = self.session.baseline().is_some();

        self.card_rects.clear();
        {
            let session = &mut self.session;
            let cfg = &self.cfg;
            let rects = &mut self.card_rects;
            for card in &mut self.cards {
                if !card.visible(session) {
                    continue;
                }
                let response = egui::Window::new(card.title())
                    .title_bar(false)
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                    .show(ctx, |ui| card.show(ui, session, cfg));
                if let Some(response) = response {
                    rects.push(response.response.rect);
                }
            }
        }

        let after_mode = self.session.mode();
        if after_mode != before_mode {
            match (before_mode, after_mode) {
                (SessionMode::CalibrateInput, SessionMode::MeasureStep1) => {
                    let mut evt = RulerEvent::new(EventKind::CALIBRATION_COMPLETE);
                    evt.calibration = self
                        .session
                        .baseline()
                        .map(|baseline| CalibrationMeta { baseline: *baseline });
                    self.emit(evt);
                }
                (SessionMode::ShowResult, SessionMode::MeasureStep1) => {
                    self.emit(RulerEvent::new(EventKind::MEASUREMENT_CLEARED));
                }
                (_, SessionMode::CalibrateStep1) if had_baseline => {
                    self.emit(RulerEvent::new(EventKind::RECALIBRATED));
                }
                _ => {}
            }
        }
    }

    // ── Clicks ───────────────────────────────────────────────────────────

    fn handle_click(&mut self, point: Point, on_overlay: bool) {
        let before_mode = self.session.mode();
        let cal_before = self.session.calibration_points().len();
        let meas_before = self.session.measurement_points().len();

        self.session.handle_screen_click(point, on_overlay);

        let mut kinds = EventKind::CLICK;
        let mut evt = RulerEvent::new(kinds);
        evt.click = Some(ClickMeta { point, on_overlay });

        let cal_after = self.session.calibration_points().len();
        let meas_after = self.session.measurement_points().len();
        if cal_after > cal_before {
            kinds |= EventKind::CALIBRATION_POINT;
            evt.pin = Some(PinMeta {
                point,
                index: cal_after - 1,
            });
        }
        if meas_after > meas_before {
            kinds |= EventKind::MEASUREMENT_POINT;
            evt.pin = Some(PinMeta {
                point,
                index: meas_after - 1,
            });
        }
        if before_mode == SessionMode::MeasureStep2
            && self.session.mode() == SessionMode::ShowResult
        {
            kinds |= EventKind::MEASUREMENT_COMPLETE | EventKind::RESULT_UPDATED;
            evt.result = self.result_meta();
        }
        evt.kinds = kinds;
        self.emit(evt);
    }

    // ── State publication / events ───────────────────────────────────────

    fn publish_state(&self) {
        if let Some(ctrl) = &self.camera_ctrl {
            ctrl.publish(CameraInfo {
                on: self.session.is_camera_on(),
                mode: self.session.mode(),
                error: self.session.camera_error().map(str::to_string),
            });
        }
        if let Some(ctrl) = &self.session_ctrl {
            ctrl.publish(SessionSnapshot {
                mode: self.session.mode(),
                unit: self.session.unit(),
                plane_shift: self.session.plane_shift(),
                measured_distance: self.session.measured_distance(),
                reference_distance: self.session.reference_distance(),
            });
        }
    }

    fn emit_mode_change(&mut self) {
        let mode = self.session.mode();
        if mode != self.last_mode {
            let mut evt = RulerEvent::new(EventKind::MODE_CHANGED);
            evt.mode = Some(ModeMeta {
                from: self.last_mode,
                to: mode,
            });
            self.emit(evt);
            self.last_mode = mode;
        }
    }

    fn emit_result_if_updated(&self, prev_distance: Option<f64>) {
        if self.session.measured_distance() != prev_distance {
            let mut evt = RulerEvent::new(EventKind::RESULT_UPDATED);
            evt.result = self.result_meta();
            self.emit(evt);
        }
    }

    fn result_meta(&self) -> Option<ResultMeta> {
        self.session.measured_distance().map(|distance| ResultMeta {
            distance,
            unit: self.session.unit(),
            plane_shift: self.session.plane_shift(),
        })
    }

    fn emit(&self, event: RulerEvent) {
        if let Some(ctrl) = &self.event_ctrl {
            ctrl.emit_filtered(event);
        }
    }
}

/// UV rectangle that crops the texture to cover `view` while preserving
/// the frame's aspect ratio (centered, like CSS `object-fit: cover`).
fn cover_uv(tex: egui::Vec2, view: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if tex.x <= 0.0 || tex.y <= 0.0 || view.x <= 0.0 || view.y <= 0.0 {
        return full;
    }
    let tex_aspect = tex.x / tex.y;
    let view_aspect = view.x / view.y;
    if tex_aspect > view_aspect {
        let w = view_aspect / tex_aspect;
        let x0 = (1.0 - w) * 0.5;
        egui::Rect::from_min_max(egui::pos2(x0, 0.0), egui::pos2(x0 + w, 1.0))
    } else {
        let h = tex_aspect / view_aspect;
        let y0 = (1.0 - h) * 0.5;
        egui::Rect::from_min_max(egui::pos2(0.0, y0), egui::pos2(1.0, y0 + h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_uv_crops_the_wider_axis() {
        // Texture twice as wide as the view: crop half the width, centered.
        let uv = cover_uv(egui::vec2(200.0, 100.0), egui::vec2(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn cover_uv_matching_aspect_is_full() {
        let uv = cover_uv(egui::vec2(640.0, 480.0), egui::vec2(320.0, 240.0));
        assert_eq!(uv, egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)));
    }
}
