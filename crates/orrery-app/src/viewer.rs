//! Window lifecycle, input routing, and the per-frame loop.

use std::sync::Arc;

use orrery_assets::AssetCatalog;
use orrery_config::Config;
use orrery_render::{
    Camera, OrbitController, Projection, RenderContext, SurfaceError, init_render_context_blocking,
};
use orrery_scene::{QualitySetting, Scene};
use orrery_scene::view::ViewCamera;
use orrery_ui::TweakPanel;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::frame_clock::FrameClock;
use crate::renderer::SceneRenderer;

/// Pointer drag sensitivity in radians per pixel.
const ROTATE_SPEED: f32 = 0.005;
/// Zoom step for one scroll line.
const ZOOM_LINE_STEP: f32 = 0.5;

/// The egui context plus its winit and wgpu glue.
struct EguiLayer {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// The viewer application driven by winit.
pub struct ViewerApp {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    egui: Option<EguiLayer>,
    scene: Scene,
    panel: TweakPanel,
    camera: Camera,
    orbit: OrbitController,
    /// Camera settings as last synced, to detect panel edits.
    last_view: ViewCamera,
    clock: FrameClock,
    /// Exponential moving average of the frame rate.
    fps_smoothed: f32,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

fn quality_setting_from_config(value: &str) -> QualitySetting {
    match value {
        "sd" => QualitySetting::Sd,
        "hd" => QualitySetting::Hd,
        _ => QualitySetting::Default,
    }
}

impl ViewerApp {
    pub fn new(config: Config) -> Self {
        let mut scene = Scene::new();
        scene.renderer.antialias = config.render.antialias;
        scene.shadow.map_size = config.render.shadow_map_size;
        scene.shadow.helper_visible = config.debug.show_shadow_helper;
        scene.set_global_quality(quality_setting_from_config(&config.assets.quality));

        let last_view = scene.camera.clone();
        let orbit = OrbitController::new(scene.camera.position.length());

        Self {
            config,
            window: None,
            gpu: None,
            renderer: None,
            egui: None,
            scene,
            panel: TweakPanel::new(),
            camera: Camera::default(),
            orbit,
            last_view,
            clock: FrameClock::new(),
            fps_smoothed: 0.0,
            dragging: false,
            last_cursor: None,
        }
    }

    /// Push panel-side camera and orbit settings into the live controller.
    fn sync_camera(&mut self) {
        if self.scene.camera != self.last_view {
            if let Projection::Perspective { fov_y, .. } = &mut self.camera.projection {
                *fov_y = self.scene.camera.fov_y_degrees.to_radians();
            }
            self.camera.near = self.scene.camera.near;
            self.camera.far = self.scene.camera.far;
            if self.scene.camera.position != self.last_view.position {
                self.orbit.radius = self.scene.camera.position.length();
            }
            self.last_view = self.scene.camera.clone();
        }

        self.orbit.auto_rotate = self.scene.orbit.auto_rotate;
        self.orbit.auto_rotate_speed = self.scene.orbit.auto_rotate_speed;
        self.orbit.enable_damping = self.scene.orbit.enable_damping;
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(renderer), Some(gpu)) = (&mut self.renderer, &self.gpu) {
            renderer.resize(&gpu.device, gpu.surface_config.width, gpu.surface_config.height);
        }
        info!("Window resized to {width}x{height}");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let dt = self.clock.tick();
        self.scene.animate(dt);

        if dt > 0.0 {
            self.fps_smoothed = 0.9 * self.fps_smoothed + 0.1 / dt;
        }
        self.panel.fps = self.config.debug.show_fps.then_some(self.fps_smoothed);

        // Run the UI before syncing GPU state so edits land this frame.
        let egui_output = self.egui.as_mut().map(|egui| {
            let raw_input = egui.state.take_egui_input(&window);
            let output = egui.ctx.run(raw_input, |ctx| {
                self.panel.show(ctx, &mut self.scene);
            });
            egui.state
                .handle_platform_output(&window, output.platform_output.clone());
            output
        });

        self.sync_camera();
        self.orbit.update(dt, &mut self.camera);
        self.scene.camera.position = self.camera.position;
        self.last_view.position = self.camera.position;

        let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) else {
            return;
        };
        renderer.prepare(gpu, &mut self.scene);

        let frame = match gpu.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost) => {
                let (w, h) = (gpu.surface_config.width, gpu.surface_config.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(w, h);
                }
                return;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return;
            }
        };
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        renderer.render(gpu, &self.scene, &self.camera, &surface_view, &mut encoder);

        let mut egui_cmd_bufs = Vec::new();
        if let (Some(egui), Some(output)) = (&mut self.egui, egui_output) {
            let pixels_per_point = output.pixels_per_point;
            let primitives = egui.ctx.tessellate(output.shapes, pixels_per_point);
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [gpu.surface_config.width, gpu.surface_config.height],
                pixels_per_point,
            };

            for (id, delta) in &output.textures_delta.set {
                egui.renderer
                    .update_texture(&gpu.device, &gpu.queue, *id, delta);
            }
            egui_cmd_bufs = egui.renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &primitives,
                &screen,
            );

            {
                let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &surface_view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                egui.renderer
                    .render(&mut pass.forget_lifetime(), &primitives, &screen);
            }

            for id in &output.textures_delta.free {
                egui.renderer.free_texture(id);
            }
        }

        gpu.queue
            .submit(egui_cmd_bufs.into_iter().chain([encoder.finish()]));
        frame.present();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        if self.config.window.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        self.camera
            .set_aspect_ratio(inner.width as f32, inner.height as f32);

        let catalog = AssetCatalog::new(self.config.assets.base_dir.clone());
        let renderer = match SceneRenderer::new(
            &gpu,
            catalog,
            &mut self.scene,
            self.config.render.msaa_samples,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("Failed to load scene textures: {e}");
                event_loop.exit();
                return;
            }
        };

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: false,
                ..Default::default()
            },
        );
        self.egui = Some(EguiLayer {
            ctx: egui_ctx,
            state: egui_state,
            renderer: egui_renderer,
        });

        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.window = Some(window.clone());
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The panel gets first refusal on pointer and keyboard events.
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            let response = egui.state.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    self.handle_resize(inner.width, inner.height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                    if !self.dragging {
                        self.last_cursor = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging
                    && let Some((last_x, last_y)) = self.last_cursor
                {
                    let dx = (position.x - last_x) as f32;
                    let dy = (position.y - last_y) as f32;
                    self.orbit
                        .rotate(-dx * ROTATE_SPEED, -dy * ROTATE_SPEED);
                }
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.orbit.zoom(lines * ZOOM_LINE_STEP);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer with the given config.
///
/// This function blocks until the window is closed.
pub fn run(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
