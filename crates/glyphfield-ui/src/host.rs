//! egui-backed implementations of the host traits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use egui::{Color32, Painter, Pos2};
use glam::Vec2;
use glyphfield_core::{DrawTarget, Rgba};
use glyphfield_platform::{FrameHandle, FrameScheduler, InputSource, Result};
use tracing::debug;

/// Each request asks egui for a repaint and queues the handle for the next
/// `update`, which plays the role of the animation-frame callback.
pub struct RepaintScheduler {
    context: egui::Context,
    frames: Sender<FrameHandle>,
    next: u64,
}

impl RepaintScheduler {
    pub fn new(context: egui::Context, frames: Sender<FrameHandle>) -> Self {
        Self {
            context,
            frames,
            next: 0,
        }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.frames.send(handle)?;
        self.context.request_repaint();
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> Result<()> {
        // Already queued handles go stale once the runtime stops waiting on them.
        debug!("frame {handle:?} cancelled");
        Ok(())
    }
}

/// Gate for forwarding panel pointer and size changes.
#[derive(Clone, Default)]
pub struct PanelInput {
    listening: Arc<AtomicBool>,
}

impl PanelInput {
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }
}

impl InputSource for PanelInput {
    fn start(&mut self) -> Result<()> {
        self.listening.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.listening.store(false, Ordering::Release);
        Ok(())
    }
}

/// Draws particles through an egui painter, offset to the panel origin.
pub struct PainterTarget<'a> {
    pub painter: &'a Painter,
    pub origin: Pos2,
    pub background: Color32,
}

impl DrawTarget for PainterTarget<'_> {
    fn clear(&mut self) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, self.background);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !center.is_finite() {
            return;
        }
        self.painter.circle_filled(
            self.origin + egui::vec2(center.x, center.y),
            radius,
            Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a),
        );
    }
}
