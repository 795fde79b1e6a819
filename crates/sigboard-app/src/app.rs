//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use sigboard_core::{Board, BoardConfig, BoardMessage, CanvasSize, PointerEvent};
use sigboard_render::{
    ExportFormat, PdfLayout, RenderContext, Renderer, RendererError, SceneSurface, VelloRenderer,
    export_board,
};
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::match_shortcut;
use crate::ui::{BoardLayout, UiAction, UiState, render_ui};

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
mod file_ops {
    use sigboard_render::{ExportFormat, ExportedFile};

    /// Save an exported file through a native save dialog.
    pub fn save_file(file: &ExportedFile, format: ExportFormat) {
        let dialog = rfd::FileDialog::new()
            .set_title(format!("Save {}", format.description()))
            .set_file_name(&file.file_name)
            .add_filter(format.description(), &[format.extension()]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, &file.bytes) {
                log::error!("Failed to write {}: {}", file.file_name, e);
            } else {
                log::info!("Saved {} to: {:?}", file.file_name, path);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod file_ops {
    use sigboard_render::{ExportFormat, ExportedFile};
    use wasm_bindgen::{JsCast, JsValue};

    /// Offer an exported file as a browser download.
    pub fn save_file(file: &ExportedFile, _format: ExportFormat) {
        match download_binary_file(&file.file_name, &file.bytes, file.mime_type) {
            Ok(()) => log::info!("Downloaded {}", file.file_name),
            Err(e) => log::error!("Failed to download {}: {:?}", file.file_name, e),
        }
    }

    fn download_binary_file(filename: &str, data: &[u8], mime_type: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let uint8_array = js_sys::Uint8Array::from(data);
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&uint8_array);

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;

        let a = document
            .create_element("a")?
            .dyn_into::<web_sys::HtmlAnchorElement>()?;
        a.set_href(&url);
        a.set_download(filename);
        a.click();

        web_sys::Url::revoke_object_url(&url)
    }
}

#[cfg(not(any(feature = "native", target_arch = "wasm32")))]
mod file_ops {
    use sigboard_render::{ExportFormat, ExportedFile};

    pub fn save_file(file: &ExportedFile, _format: ExportFormat) {
        log::warn!(
            "No file sink in this build; dropping {} ({} bytes)",
            file.file_name,
            file.bytes.len()
        );
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Widest the board column gets, in logical pixels (`max-w-5xl`).
    pub max_board_width: f64,
    pub board: BoardConfig,
    pub pdf_layout: PdfLayout,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Whiteboard".to_string(),
            width: 1280,
            height: 900,
            background_color: Color::WHITE,
            max_board_width: 1024.0,
            board: BoardConfig::default(),
            pdf_layout: PdfLayout::default(),
        }
    }
}

/// Failures while bringing up the GPU side of the window.
#[derive(Debug, Error)]
enum InitError {
    #[error("Render context not initialized")]
    NoRenderContext,
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Runtime state for the application.
struct AppState {
    window: Arc<Window>,
    surface: RenderSurface<'static>,
    vello_renderer: vello::Renderer,
    page_renderer: VelloRenderer,
    texture_blitter: vello::wgpu::util::TextureBlitter,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,
    board: Board<SceneSurface>,
    layout: BoardLayout,
    config: AppConfig,
    event_handler: EventHandler,
    modifiers: ModifiersState,
}

impl AppState {
    fn logical_viewport(&self) -> Size {
        let size: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        Size::new(size.width, size.height)
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Point {
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        Point::new(logical.x, logical.y)
    }

    /// Recompute the page layout and resize the board to its new container.
    fn relayout(&mut self) {
        self.layout = BoardLayout::compute(
            self.logical_viewport(),
            self.config.max_board_width,
            self.config.board.height_ratio,
        );
        self.board.update(BoardMessage::Resize {
            container: self.layout.container,
        });
        log::debug!("Layout: canvas {:?}", self.layout.canvas);
    }

    fn dispatch(&mut self, event: Option<PointerEvent>) {
        let Some(event) = event else {
            return;
        };
        let response = self.board.update(BoardMessage::Pointer(event));
        if response.changed {
            self.ui_state.sync(&self.board);
            self.window.request_redraw();
        }
    }

    fn apply_action(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        match action {
            UiAction::SetColor(color) => {
                self.board.update(BoardMessage::SetColor(color.into()));
            }
            UiAction::SetLineWidth(width) => {
                self.board.update(BoardMessage::SetLineWidth(width));
            }
            UiAction::Reset => {
                self.board.update(BoardMessage::Clear);
            }
            UiAction::Undo => {
                self.board.update(BoardMessage::Undo);
            }
            UiAction::DownloadImage => self.export(ExportFormat::Png),
            UiAction::DownloadPdf => self.export(ExportFormat::Pdf),
        }
        self.ui_state.sync(&self.board);
        self.window.request_redraw();
    }

    fn export(&self, format: ExportFormat) {
        match export_board(&self.board, format, &self.config.pdf_layout) {
            Ok(Some(file)) => file_ops::save_file(&file, format),
            Ok(None) => log::warn!("Nothing to export: board not mounted"),
            Err(e) => log::error!("Failed to export {}: {}", format.extension(), e),
        }
    }

    fn handle_key(&mut self, key: &Key) {
        let Key::Character(text) = key else {
            return;
        };
        let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
        if let Some(action) = match_shortcut(text.as_str(), ctrl, self.ui_state.line_width) {
            self.apply_action(action);
        }
    }

    /// Run egui, build the page scene and present a frame.
    fn render(&mut self, render_cx: &vello::util::RenderContext) {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &self.ui_state, &self.layout);
        });
        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = egui_output;
        self.egui_state
            .handle_platform_output(&self.window, platform_output);
        let egui_primitives = self.egui_ctx.tessellate(shapes, pixels_per_point);

        if let Some(action) = action {
            self.apply_action(action);
        }

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let render_ctx =
            RenderContext::new(Size::new(width as f64, height as f64), self.layout.canvas)
                .with_scale_factor(self.window.scale_factor())
                .with_background(self.config.background_color)
                .with_border(Color::BLACK, 1.0);
        if let Some(board_surface) = self.board.surface() {
            self.page_renderer.build_scene(&render_ctx, board_surface);
        }

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        // Vello needs a storage-bound Rgba8Unorm target; the surface may be Bgra8Unorm.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self.page_renderer.render_to_texture(
            &mut self.vello_renderer,
            device,
            queue,
            &render_texture_view,
            CanvasSize::new(width, height),
            self.config.background_color,
        ) {
            log::error!("Failed to render: {}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        self.window.request_redraw();
    }
}

/// Main application.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application event loop.
    pub async fn run() {
        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {}", e);
                return;
            }
        };
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("Event loop error: {}", e);
            }
        }
    }

    /// Finish initialization after the surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> Result<(), InitError> {
        let render_cx = self.render_cx.as_ref().ok_or(InitError::NoRenderContext)?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = VelloRenderer::create_gpu_renderer(device)?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut board = Board::new(self.config.board.clone());
        board.mount(SceneSurface::default().with_background(self.config.background_color));
        let ui_state = UiState::from_board(&board);

        log::info!(
            "Sigboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            page_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            board,
            layout: BoardLayout::compute(
                Size::ZERO,
                self.config.max_board_width,
                self.config.board.height_ratio,
            ),
            config: self.config.clone(),
            event_handler: EventHandler::new(),
            modifiers: ModifiersState::empty(),
        };
        state.relayout();
        self.state = Some(state);
        self.pending_window = None;

        window.request_redraw();
        Ok(())
    }

    fn surface_size(&self, size: PhysicalSize<u32>) -> (u32, u32) {
        if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn web_window_attributes(config: &AppConfig) -> Option<winit::window::WindowAttributes> {
    use wasm_bindgen::JsCast;
    use winit::platform::web::WindowAttributesExtWebSys;

    let web_window = web_sys::window()?;
    let document = web_window.document()?;

    let viewport_width = web_window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(config.width as f64);
    let viewport_height = web_window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(config.height as f64);

    let canvas = document
        .get_element_by_id("sigboard-canvas")
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .or_else(|| {
            let body = document.body()?;
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id("sigboard-canvas");
            body.append_child(&canvas).ok()?;
            canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
        })?;

    let dpr = web_window.device_pixel_ratio();
    let physical_width = (viewport_width * dpr) as u32;
    let physical_height = (viewport_height * dpr) as u32;
    canvas.set_width(physical_width);
    canvas.set_height(physical_height);

    let style = canvas.style();
    let _ = style.set_property("width", "100%");
    let _ = style.set_property("height", "100%");
    let _ = style.set_property("display", "block");
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("left", "0");
    // No touch scrolling or pinch zoom over the page
    let _ = style.set_property("touch-action", "none");

    log::info!(
        "Canvas created: {}x{} (physical: {}x{}, dpr: {})",
        viewport_width,
        viewport_height,
        physical_width,
        physical_height,
        dpr
    );

    Some(
        winit::window::Window::default_attributes()
            .with_title(&config.title)
            .with_canvas(Some(canvas))
            .with_prevent_default(true),
    )
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        let Some(window_attrs) = web_window_attributes(&self.config) else {
            log::error!("Failed to set up the page canvas");
            return;
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Window created, initializing renderer...");

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (width, height) = self.surface_size(window.inner_size());
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);
            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {:?}", e);
                    event_loop.exit();
                    return;
                }
            };

            if let Err(e) = self.finish_init(window, surface) {
                log::error!("Failed to initialize: {}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let (width, height) = self.surface_size(window.inner_size());
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");
                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(
                                window_clone.clone(),
                                width,
                                height,
                                PresentMode::AutoVsync,
                            )
                            .await
                        {
                            Ok(surface) => {
                                log::info!("Surface created successfully");
                                // SAFETY: wasm is single-threaded; the event loop owns the App
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                if let Err(e) = app.finish_init(window_clone, surface) {
                                    log::error!("Failed to initialize: {}", e);
                                }
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_pointer =
            state.egui_ctx.is_pointer_over_area() || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.relayout();
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.relayout();
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.render(render_cx);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = state.to_logical(position);
                let event = state.event_handler.cursor_moved(point, state.layout.canvas);
                state.dispatch(event);
            }

            WindowEvent::CursorLeft { .. } => {
                let event = state.event_handler.cursor_left();
                state.dispatch(event);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let pressed = button_state == ElementState::Pressed;
                // Presses on the controls belong to egui; releases always end a stroke
                if pressed && egui_wants_pointer {
                    return;
                }
                let event = state.event_handler.mouse_button(pressed, state.layout.canvas);
                state.dispatch(event);
            }

            WindowEvent::Touch(touch) => {
                let point = state.to_logical(touch.location);
                let event = state
                    .event_handler
                    .touch(touch.phase, touch.id, point, state.layout.canvas);
                state.dispatch(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_keyboard || event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                state.handle_key(&event.logical_key);
            }

            _ => {}
        }
    }
}
