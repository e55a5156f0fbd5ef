//! Capture-collaborator boundary: the channel that feeds camera signals
//! and frames into the ruler widget.
//!
//! The capture side (webcam glue, a file player, a synthetic generator)
//! owns the device for its active lifetime and talks to the widget only
//! through [`CaptureCommand`]s sent over an `std::sync::mpsc` channel:
//! exactly one of `Ready`/`Error` per acquisition attempt, then any number
//! of `Frame`s. The widget drains the channel once per UI frame, in order.
//!
//! `Ready` hands over a [`CaptureStream`] guard. The widget keeps it for
//! the lifetime of the capture and calls [`CaptureStream::stop`] when the
//! camera is toggled off, including the case where the toggle happened
//! while the acquisition was still in flight. No device resource may
//! outlive the off transition.

use std::sync::mpsc::{Receiver, Sender};

use thiserror::Error;
use tracing::warn;

/// Errors on the capture side of the boundary.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Device/permission failure while acquiring the capture stream.
    /// Carries the human-readable message shown in the error mode.
    #[error("camera acquisition failed: {0}")]
    Acquisition(String),
    /// A raw frame buffer did not match its declared dimensions.
    #[error("frame buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// An encoded frame could not be decoded.
    #[error("failed to decode camera frame: {0}")]
    Decode(#[from] image::ImageError),
    /// The widget side of the channel is gone.
    #[error("capture channel disconnected")]
    Disconnected,
}

/// A releasable handle on the underlying capture device.
///
/// Implementations stop all active media tracks in [`stop`](Self::stop);
/// the call must be safe to repeat.
pub trait CaptureStream: Send {
    fn stop(&mut self);
}

/// A stream with nothing to release, for tests and synthetic feeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStream;

impl CaptureStream for NullStream {
    fn stop(&mut self) {}
}

/// One RGBA frame from the capture device.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl CameraFrame {
    /// Wrap a raw RGBA buffer, checking it against the declared size.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(CaptureError::FrameSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Convert a decoded image into a frame.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }

    /// Decode an encoded image (PNG, JPEG, …) into a frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, CaptureError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&image))
    }
}

/// Messages sent over the channel to drive the widget.
pub enum CaptureCommand {
    /// The stream is acquired and attached. Carries the releasable device
    /// guard and the native frame dimensions.
    Ready {
        stream: Box<dyn CaptureStream>,
        width: u32,
        height: u32,
    },
    /// A new frame; the most recent one wins.
    Frame(CameraFrame),
    /// Acquisition failed with a human-readable message.
    Error { message: String },
}

/// Convenience sender for the capture side. Clone freely.
#[derive(Clone)]
pub struct CameraSink {
    tx: Sender<CaptureCommand>,
}

impl CameraSink {
    /// Announce a successful acquisition, handing over the stream guard.
    ///
    /// If the widget is gone the guard is stopped right here; the device
    /// must not stay open with nobody left to release it.
    pub fn send_ready(
        &self,
        stream: Box<dyn CaptureStream>,
        width: u32,
        height: u32,
    ) -> Result<(), CaptureError> {
        if let Err(err) = self.tx.send(CaptureCommand::Ready {
            stream,
            width,
            height,
        }) {
            if let CaptureCommand::Ready { mut stream, .. } = err.0 {
                stream.stop();
            }
            warn!("capture channel closed before ready could be delivered");
            return Err(CaptureError::Disconnected);
        }
        Ok(())
    }

    /// Announce a failed acquisition.
    pub fn send_error(&self, message: impl Into<String>) -> Result<(), CaptureError> {
        self.tx
            .send(CaptureCommand::Error {
                message: message.into(),
            })
            .map_err(|_| CaptureError::Disconnected)
    }

    /// Push one RGBA frame.
    pub fn send_frame(&self, frame: CameraFrame) -> Result<(), CaptureError> {
        self.tx
            .send(CaptureCommand::Frame(frame))
            .map_err(|_| CaptureError::Disconnected)
    }

    /// Decode an encoded image and push it as a frame.
    pub fn send_encoded(&self, bytes: &[u8]) -> Result<(), CaptureError> {
        self.send_frame(CameraFrame::decode(bytes)?)
    }
}

/// Create the capture channel: the sink goes to the capture collaborator,
/// the receiver to [`RulerPanel::new`](crate::app::RulerPanel::new).
pub fn channel() -> (CameraSink, Receiver<CaptureCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (CameraSink { tx }, rx)
}
