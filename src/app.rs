//! Main application state and event handling.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config;
use crate::gallery::{Collection, GalleryState};
use crate::render::{ImageLoader, RenderPipeline, SceneRenderer, TextureSlot};

/// Record the egui paint jobs into a pass that loads the scene underneath.
fn render_egui_pass(
    renderer: &egui_wgpu::Renderer,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    paint_jobs: &[egui::ClippedPrimitive],
    screen_descriptor: &egui_wgpu::ScreenDescriptor,
) {
    let mut render_pass = encoder
        .begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
        .forget_lifetime();

    renderer.render(&mut render_pass, paint_jobs, screen_descriptor);
}

/// Main application state.
pub struct GalleryApp {
    /// Main window
    window: Option<Arc<Window>>,
    /// Surface, device and depth buffer
    render: Option<RenderPipeline>,
    /// Ring and mirror renderer
    scene_renderer: Option<SceneRenderer>,
    /// egui context
    egui_ctx: egui::Context,
    /// egui-winit state
    egui_state: Option<egui_winit::State>,
    /// egui-wgpu renderer
    egui_renderer: Option<egui_wgpu::Renderer>,
    /// Ring, camera, caption and animation state
    state: GalleryState,
    /// Background artwork decoder
    loader: ImageLoader,
    /// Last cursor position in physical pixels
    cursor_position: Option<Vec2>,
    /// Last frame time for the animation step
    last_frame_time: Instant,
}

impl GalleryApp {
    pub fn new(collection: Collection) -> Self {
        let state = GalleryState::new(
            collection,
            config::WINDOW_WIDTH as u32,
            config::WINDOW_HEIGHT as u32,
        );
        Self {
            window: None,
            render: None,
            scene_renderer: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            egui_renderer: None,
            state,
            loader: ImageLoader::new(),
            cursor_position: None,
            last_frame_time: Instant::now(),
        }
    }

    fn initialize_graphics(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("No compatible graphics adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("Failed to create device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let render = RenderPipeline::new(device, queue, surface, config);

        // Initialize egui
        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(render.device(), surface_format, None, 1, false);

        self.state.resize(size.width, size.height);
        let scene_renderer = SceneRenderer::new(render.device(), render.queue(), surface_format, &self.state);

        self.window = Some(window);
        self.scene_renderer = Some(scene_renderer);
        self.render = Some(render);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        self.request_images();
        Ok(())
    }

    /// Queue every artwork and both hotspot icons for background decoding.
    fn request_images(&mut self) {
        let dir = config::asset_dir();
        log::info!("Loading artwork images from {}", dir.display());

        let collection = &self.state.collection;
        for (index, entry) in collection.entries().iter().enumerate() {
            self.loader
                .request(TextureSlot::Artwork(index), dir.join(&entry.image));
        }
        self.loader
            .request(TextureSlot::PreviousIcon, dir.join(collection.previous_icon()));
        self.loader
            .request(TextureSlot::NextIcon, dir.join(collection.next_icon()));
    }

    /// Upload whatever the decoder threads have finished.
    fn upload_loaded_images(&mut self) {
        let (Some(render), Some(scene_renderer)) = (&self.render, &mut self.scene_renderer) else {
            return;
        };

        let finished = self.loader.poll();
        if finished.is_empty() {
            return;
        }

        for loaded in finished {
            match loaded.image {
                Ok(image) => {
                    log::info!(
                        "Loaded {} ({}x{})",
                        loaded.path.display(),
                        image.width,
                        image.height
                    );
                    scene_renderer.set_texture(render.device(), render.queue(), loaded.slot, &image);
                }
                Err(e) => {
                    log::warn!("Keeping placeholder for {:?}: {}", loaded.slot, e);
                }
            }
        }

        if self.loader.pending() == 0 {
            log::info!("All gallery images processed");
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        let width = size.width.max(1);
        let height = size.height.max(1);
        self.state.resize(width, height);
        if let Some(render) = &mut self.render {
            render.resize(width, height);
            if let Some(scene_renderer) = &mut self.scene_renderer {
                scene_renderer.resize(render.device(), width, height);
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyEvent) {
        if key.state == ElementState::Pressed
            && key.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            log::info!("Escape pressed, closing gallery");
            event_loop.exit();
        }
    }

    fn handle_click(&mut self) {
        let Some(position) = self.cursor_position else {
            return;
        };
        let outcome = self.state.click(position);
        log::debug!("Click at {:?}: {:?}", position, outcome);
    }

    fn render_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        // Animation strictly before drawing
        self.state.tick(dt);
        self.upload_loaded_images();

        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else { return };

        // Begin egui frame
        let raw_input = egui_state.take_egui_input(window);
        self.egui_ctx.begin_pass(raw_input);
        crate::ui::draw_caption(&self.egui_ctx, &self.state.display);
        let full_output = self.egui_ctx.end_pass();
        egui_state.handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = self.egui_ctx.pixels_per_point();
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let Some(render) = &self.render else { return };
        let Some(scene_renderer) = &self.scene_renderer else { return };
        let Some(egui_renderer) = &mut self.egui_renderer else { return };

        let output = match render.surface().get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = window.inner_size();
                self.handle_resize(size);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = render.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        scene_renderer.render(
            &mut encoder,
            render.queue(),
            &view,
            render.depth_view(),
            &self.state,
        );

        // egui pass
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [render.config().width, render.config().height],
            pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(render.device(), render.queue(), *id, delta);
        }

        egui_renderer.update_buffers(
            render.device(),
            render.queue(),
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        render_egui_pass(
            egui_renderer,
            &mut encoder,
            &view,
            &clipped_primitives,
            &screen_descriptor,
        );

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        render.queue().submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for GalleryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(config::WINDOW_WIDTH, config::WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.initialize_graphics(window) {
            log::error!("Failed to initialize graphics: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
