//! Run the ruler window against a synthetic camera: a moving gradient is
//! fed as frames, so calibration and measurement can be tried without a
//! real capture device.
//!
//! The feeder thread watches the camera flag through a
//! [`CameraController`] subscription and re-announces readiness whenever
//! the camera is toggled back on, the same handshake a real capture
//! backend performs.
//!
//! Run with: `cargo run --example synthetic_camera`

use std::time::Duration;

use pixelruler::{channel, CameraController, CameraFrame, NullStream, RulerConfig};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn gradient_frame(tick: u32) -> CameraFrame {
    let mut rgba = Vec::with_capacity((WIDTH * HEIGHT * 4) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let r = ((x + tick) % 256) as u8;
            let g = ((y + tick / 2) % 256) as u8;
            let b = 96u8;
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    CameraFrame::new(WIDTH, HEIGHT, rgba).expect("buffer matches dimensions")
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let camera = CameraController::new();
    let updates = camera.subscribe();

    let (sink, rx) = channel();
    std::thread::spawn(move || {
        let mut on = true;
        if sink.send_ready(Box::new(NullStream), WIDTH, HEIGHT).is_err() {
            return;
        }
        let mut tick = 0u32;
        loop {
            while let Ok(info) = updates.try_recv() {
                if info.on && !on {
                    // Toggled back on: run the acquisition handshake again.
                    if sink.send_ready(Box::new(NullStream), WIDTH, HEIGHT).is_err() {
                        return;
                    }
                }
                on = info.on;
            }
            if on {
                if sink.send_frame(gradient_frame(tick)).is_err() {
                    return; // window closed
                }
                tick = tick.wrapping_add(2);
            }
            std::thread::sleep(Duration::from_millis(33));
        }
    });

    let mut cfg = RulerConfig::default();
    cfg.controllers.camera = Some(camera);
    pixelruler::run_ruler(rx, cfg)
}
