//! Frame-loop ownership for a particle field.
//!
//! `FieldRuntime` holds the only outstanding animation-frame request and the
//! host listener registration. Both are released by `stop`, which `Drop`
//! also runs, so a dropped runtime never keeps ticking against a detached
//! surface.

use glam::Vec2;
use glyphfield_platform::{FrameHandle, FrameScheduler, HostEvent, InputSource, SurfaceSize};
use tracing::{debug, info, warn};

use crate::compositor::DrawTarget;
use crate::config::FieldConfig;
use crate::error::RuntimeError;
use crate::field::ParticleField;
use crate::glyph::GlyphRasterizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Active,
    TornDown,
}

pub struct FieldRuntime<R> {
    field: ParticleField<R>,
    scheduler: Box<dyn FrameScheduler>,
    input: Box<dyn InputSource>,
    state: Lifecycle,
    pending: Option<FrameHandle>,
    ticks: u64,
}

impl<R: GlyphRasterizer> FieldRuntime<R> {
    pub fn new(
        field: ParticleField<R>,
        scheduler: Box<dyn FrameScheduler>,
        input: Box<dyn InputSource>,
    ) -> Self {
        Self {
            field,
            scheduler,
            input,
            state: Lifecycle::Uninitialized,
            pending: None,
            ticks: 0,
        }
    }

    /// Registers listeners, builds the particle store for `size` and
    /// schedules the first frame.
    pub fn start(&mut self, size: SurfaceSize) -> Result<(), RuntimeError> {
        match self.state {
            Lifecycle::Active => return Ok(()),
            Lifecycle::TornDown => return Err(RuntimeError::TornDown),
            Lifecycle::Uninitialized => {}
        }
        self.input.start().map_err(RuntimeError::Host)?;
        self.field.resize(size);
        match self.scheduler.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => {
                if let Err(stop_err) = self.input.stop() {
                    warn!("failed to unregister input after start failure: {stop_err}");
                }
                return Err(RuntimeError::Host(err));
            }
        }
        self.state = Lifecycle::Active;
        info!("particle field active on {size}");
        Ok(())
    }

    /// Runs one update-and-render pass if `handle` is the frame this runtime
    /// is waiting for, then requests the next one. Returns whether a tick ran.
    pub fn on_frame<T: DrawTarget + ?Sized>(
        &mut self,
        handle: FrameHandle,
        target: &mut T,
    ) -> Result<bool, RuntimeError> {
        if self.state != Lifecycle::Active || self.pending != Some(handle) {
            debug!("ignoring stale frame {handle:?}");
            return Ok(false);
        }
        self.pending = None;
        self.field.tick();
        self.field.render(target);
        self.ticks += 1;
        self.pending = Some(self.scheduler.request_frame().map_err(RuntimeError::Host)?);
        Ok(true)
    }

    /// Applies a host event. Ignored unless the runtime is active.
    pub fn handle_event(&mut self, event: HostEvent) {
        if self.state != Lifecycle::Active {
            return;
        }
        match event {
            HostEvent::PointerMoved { x, y } => self.field.pointer_moved(Vec2::new(x, y)),
            HostEvent::PointerLeft => self.field.pointer_left(),
            HostEvent::Resized(size) => {
                self.field.resize(size);
            }
        }
    }

    /// Swaps in a new configuration. The store is rebuilt right away when
    /// active; before `start` the config is only stored for the first build.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), RuntimeError> {
        match self.state {
            Lifecycle::TornDown => {
                warn!("reconfigure after teardown ignored");
                Ok(())
            }
            Lifecycle::Uninitialized => Ok(self.field.replace_config(config)?),
            Lifecycle::Active => Ok(self.field.set_config(config)?),
        }
    }
}

impl<R> FieldRuntime<R> {
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    /// Ticks run since `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Cancels the pending frame and unregisters listeners. Safe to call twice.
    pub fn stop(&mut self) {
        if self.state == Lifecycle::TornDown {
            return;
        }
        if let Some(handle) = self.pending.take() {
            if let Err(err) = self.scheduler.cancel_frame(handle) {
                warn!("failed to cancel frame {handle:?}: {err}");
            }
        }
        if self.state == Lifecycle::Active {
            if let Err(err) = self.input.stop() {
                warn!("failed to unregister input listeners: {err}");
            }
        }
        self.state = Lifecycle::TornDown;
        info!("particle field torn down after {} ticks", self.ticks);
    }
}

impl<R> Drop for FieldRuntime<R> {
    fn drop(&mut self) {
        self.stop();
    }
}
