//! Windowless host: frames are pulled from a queue and written out as PNGs.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use glam::Vec2;
use glyphfield_core::{FieldConfig, FieldRuntime, ParticleField, PixelSurface, Rgba, SwashRasterizer};
use glyphfield_platform::{FrameHandle, FrameScheduler, HostEvent, InputSource, Result, SurfaceSize};
use tracing::{debug, info};

/// Frame queue shared between the runtime (which requests) and the driver
/// loop (which delivers).
#[derive(Clone, Default)]
pub struct QueueScheduler {
    queue: Arc<Mutex<VecDeque<FrameHandle>>>,
    next: Arc<Mutex<u64>>,
}

impl QueueScheduler {
    /// Oldest queued frame, if any. A poisoned queue is an error, not an
    /// empty one.
    pub fn next_due(&self) -> Result<Option<FrameHandle>> {
        Ok(self.queue.lock().map_err(|e| e.to_string())?.pop_front())
    }
}

impl FrameScheduler for QueueScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        let mut next = self.next.lock().map_err(|e| e.to_string())?;
        *next += 1;
        let handle = FrameHandle(*next);
        self.queue.lock().map_err(|e| e.to_string())?.push_back(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> Result<()> {
        self.queue
            .lock()
            .map_err(|e| e.to_string())?
            .retain(|queued| *queued != handle);
        Ok(())
    }
}

/// Synthetic input has no listeners to register.
pub struct ScriptedInput;

impl InputSource for ScriptedInput {
    fn start(&mut self) -> Result<()> {
        debug!("scripted input start");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("scripted input stop");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub out_dir: PathBuf,
    pub size: SurfaceSize,
    pub frames: u32,
    pub every: u32,
    pub sweep: bool,
    pub background: Rgba,
}

/// Pointer position for frame `index` of a left-to-right pass through the
/// vertical middle; `None` outside the pass.
fn sweep_position(index: u32, frames: u32, size: SurfaceSize) -> Option<Vec2> {
    let start = frames / 3;
    let end = frames * 2 / 3;
    if index < start || index >= end || end <= start {
        return None;
    }
    let t = (index - start) as f32 / (end - start) as f32;
    Some(Vec2::new(t * size.width as f32, size.height as f32 / 2.0))
}

/// Runs the field for `options.frames` ticks and saves every `every`-th frame.
/// Returns the written paths.
pub fn render_frames(
    config: FieldConfig,
    options: &RenderOptions,
) -> std::result::Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(&options.out_dir)?;
    let scheduler = QueueScheduler::default();
    let field = ParticleField::new(config, SwashRasterizer::new())?;
    let mut runtime = FieldRuntime::new(field, Box::new(scheduler.clone()), Box::new(ScriptedInput));
    let mut surface = PixelSurface::new(options.size, options.background);
    runtime.start(options.size)?;
    info!(
        "rendering {} frames of {} particles at {}",
        options.frames,
        runtime.field().particles().len(),
        options.size
    );

    let every = options.every.max(1);
    let mut written = Vec::new();
    let mut pointer_inside = false;
    for index in 0..options.frames {
        if options.sweep {
            match sweep_position(index, options.frames, options.size) {
                Some(pos) => {
                    pointer_inside = true;
                    runtime.handle_event(HostEvent::PointerMoved { x: pos.x, y: pos.y });
                }
                None if pointer_inside => {
                    pointer_inside = false;
                    runtime.handle_event(HostEvent::PointerLeft);
                }
                None => {}
            }
        }
        let Some(handle) = scheduler.next_due()? else {
            break;
        };
        runtime.on_frame(handle, &mut surface)?;
        if index % every == 0 || index + 1 == options.frames {
            let path = frame_path(&options.out_dir, index);
            surface.save_png(&path)?;
            written.push(path);
        }
    }
    runtime.stop();
    info!("wrote {} frames to {}", written.len(), options.out_dir.display());
    Ok(written)
}

fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_scheduler_delivers_in_order_and_cancels() {
        let mut scheduler = QueueScheduler::default();
        let a = scheduler.request_frame().unwrap();
        let b = scheduler.request_frame().unwrap();
        scheduler.cancel_frame(a).unwrap();
        assert_eq!(scheduler.next_due().unwrap(), Some(b));
        assert_eq!(scheduler.next_due().unwrap(), None);
    }

    #[test]
    fn poisoned_queue_is_an_error() {
        let mut scheduler = QueueScheduler::default();
        scheduler.request_frame().unwrap();
        let queue = scheduler.queue.clone();
        let _ = std::thread::spawn(move || {
            let _guard = queue.lock().unwrap();
            panic!("driver thread died holding the queue");
        })
        .join();

        assert!(scheduler.next_due().is_err());
        assert!(scheduler.request_frame().is_err());
    }

    #[test]
    fn sweep_covers_middle_third() {
        let size = SurfaceSize::new(300, 100);
        assert_eq!(sweep_position(0, 90, size), None);
        assert_eq!(sweep_position(30, 90, size), Some(Vec2::new(0.0, 50.0)));
        assert!(sweep_position(59, 90, size).is_some());
        assert_eq!(sweep_position(60, 90, size), None);
        assert_eq!(sweep_position(0, 1, size), None);
    }

    #[test]
    fn renders_requested_frames() {
        let dir = tempfile::tempdir().unwrap();
        let options = RenderOptions {
            out_dir: dir.path().join("frames"),
            size: SurfaceSize::new(160, 60),
            frames: 7,
            every: 3,
            sweep: true,
            background: Rgba::opaque(0, 0, 0),
        };
        let config = FieldConfig {
            text: "Hi".into(),
            font: "32px sans-serif".parse().unwrap(),
            seed: Some(1),
            ..FieldConfig::default()
        };
        let written = render_frames(config, &options).unwrap();
        assert_eq!(
            written,
            vec![
                frame_path(&options.out_dir, 0),
                frame_path(&options.out_dir, 3),
                frame_path(&options.out_dir, 6),
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }
}
