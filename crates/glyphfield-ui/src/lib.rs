mod host;

pub use host::{PainterTarget, PanelInput, RepaintScheduler};

use crossbeam_channel::Receiver;
use egui::Color32;
use glyphfield_core::{FieldConfig, FieldRuntime, Lifecycle, ParticleField, SwashRasterizer};
use glyphfield_platform::{FrameHandle, HostEvent, SurfaceSize};
use tracing::{info, warn};

const WINDOW_TITLE: &str = "Glyphfield";

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub width: f32,
    pub height: f32,
    pub background: [u8; 3],
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            background: [0x0b, 0x0b, 0x12],
        }
    }
}

/// Opens the particle field in a native window and blocks until it closes.
pub fn run_window(
    config: FieldConfig,
    options: WindowOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([options.width, options.height]);

    let field = ParticleField::new(config, SwashRasterizer::new())?;

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |creation_context| {
            let [r, g, b] = options.background;
            Ok(Box::new(GlyphFieldApp::new(
                creation_context.egui_ctx.clone(),
                field,
                Color32::from_rgb(r, g, b),
            )))
        }),
    )
    .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { e.to_string().into() })
}

pub struct GlyphFieldApp {
    runtime: FieldRuntime<SwashRasterizer>,
    frames: Receiver<FrameHandle>,
    input: PanelInput,
    surface: Option<SurfaceSize>,
    hovering: bool,
    background: Color32,
}

impl GlyphFieldApp {
    pub fn new(
        context: egui::Context,
        field: ParticleField<SwashRasterizer>,
        background: Color32,
    ) -> Self {
        let (frame_sender, frame_receiver) = crossbeam_channel::unbounded::<FrameHandle>();
        let scheduler = RepaintScheduler::new(context, frame_sender);
        let input = PanelInput::default();
        let runtime = FieldRuntime::new(field, Box::new(scheduler), Box::new(input.clone()));
        Self {
            runtime,
            frames: frame_receiver,
            input,
            surface: None,
            hovering: false,
            background,
        }
    }

    pub fn runtime(&self) -> &FieldRuntime<SwashRasterizer> {
        &self.runtime
    }

    fn forward_input(&mut self, context: &egui::Context, panel: egui::Rect, size: SurfaceSize) {
        if !self.input.is_listening() {
            return;
        }
        if self.surface != Some(size) {
            self.surface = Some(size);
            self.runtime.handle_event(HostEvent::Resized(size));
        }
        match context.input(|i| i.pointer.hover_pos()) {
            Some(pos) if panel.contains(pos) => {
                let local = pos - panel.min;
                self.hovering = true;
                self.runtime
                    .handle_event(HostEvent::PointerMoved { x: local.x, y: local.y });
            }
            _ if self.hovering => {
                self.hovering = false;
                self.runtime.handle_event(HostEvent::PointerLeft);
            }
            _ => {}
        }
    }
}

impl eframe::App for GlyphFieldApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.background))
            .show(context, |ui| {
                let panel = ui.max_rect();
                let size = SurfaceSize::new(
                    panel.width().max(0.0).round() as u32,
                    panel.height().max(0.0).round() as u32,
                );

                if self.runtime.state() == Lifecycle::Uninitialized {
                    match self.runtime.start(size) {
                        Ok(()) => self.surface = Some(size),
                        Err(err) => warn!("failed to start particle field: {err}"),
                    }
                }
                self.forward_input(context, panel, size);

                let painter = ui.painter_at(panel);
                let mut target = PainterTarget {
                    painter: &painter,
                    origin: panel.min,
                    background: self.background,
                };
                // Only handles queued before this update count as due.
                let due: Vec<FrameHandle> = self.frames.try_iter().collect();
                let mut ticked = false;
                for handle in due {
                    match self.runtime.on_frame(handle, &mut target) {
                        Ok(ran) => ticked |= ran,
                        Err(err) => warn!("frame {handle:?} failed: {err}"),
                    }
                }
                // egui repaints from scratch, so redraw the last state when no tick ran.
                if !ticked {
                    self.runtime.field().render(&mut target);
                }
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("UI: exiting -> tearing down particle field");
        self.runtime.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::App;

    fn app() -> GlyphFieldApp {
        let config = FieldConfig {
            text: "Hi".into(),
            seed: Some(3),
            ..FieldConfig::default()
        };
        let field = ParticleField::new(config, SwashRasterizer::bundled()).unwrap();
        GlyphFieldApp::new(egui::Context::default(), field, Color32::BLACK)
    }

    #[test]
    fn exit_tears_down_a_started_field() {
        let mut app = app();
        app.runtime.start(SurfaceSize::new(200, 80)).unwrap();
        assert_eq!(app.runtime().state(), Lifecycle::Active);
        assert!(app.input.is_listening());
        let pending = app.runtime().pending_frame().unwrap();

        app.on_exit(None);
        assert_eq!(app.runtime().state(), Lifecycle::TornDown);
        assert_eq!(app.runtime().pending_frame(), None);
        assert!(!app.input.is_listening());

        // the handle queued before exit no longer ticks
        let mut surface = glyphfield_core::PixelSurface::new(
            SurfaceSize::new(200, 80),
            glyphfield_core::Rgba::opaque(0, 0, 0),
        );
        assert!(!app.runtime.on_frame(pending, &mut surface).unwrap());
        assert_eq!(app.runtime().ticks(), 0);
    }

    #[test]
    fn exit_before_first_frame_is_harmless() {
        let mut app = app();
        app.on_exit(None);
        assert_eq!(app.runtime().state(), Lifecycle::TornDown);
        assert!(app.frames.try_recv().is_err());
    }
}
