//! Application event loop.
//!
//! The demo is driven entirely by winit: every `RedrawRequested` advances the
//! renderer by one frame interval and renders once. There is no background
//! thread; asset loading at startup runs to completion on a tokio runtime
//! before the first frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window, the GPU [`Context`] and the [`Renderer`]
//! 2. `Resized` reconfigures the surface and depth buffer
//! 3. `RedrawRequested` calls `Renderer::update` then `Renderer::render`
//! 4. `CloseRequested` exits the loop

use std::sync::Arc;

use anyhow::Context as _;
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::RendererConfig,
    context::Context,
    render::{Gpu, Renderer},
};

/// Frame interval used when the monitor does not report a refresh rate.
pub const DEFAULT_FRAME_INTERVAL: f32 = 1.0 / 60.0;

/// Seconds between two frames on a display refreshing at `millihertz`.
pub fn frame_interval(refresh_rate_millihertz: Option<u32>) -> f32 {
    match refresh_rate_millihertz {
        Some(mhz) if mhz > 0 => 1000.0 / mhz as f32,
        _ => DEFAULT_FRAME_INTERVAL,
    }
}

/// Window, GPU context and renderer; only exists once the app was resumed.
struct AppState {
    ctx: Context,
    renderer: Renderer,
    frame_interval: f32,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &RendererConfig) -> anyhow::Result<Self> {
        let frame_interval = frame_interval(
            window
                .current_monitor()
                .and_then(|monitor| monitor.refresh_rate_millihertz()),
        );
        log::info!("frame interval {:.4}s", frame_interval);

        let mut ctx = Context::new(window).await?;
        let size = ctx.window.inner_size();
        ctx.resize(size.width, size.height);
        let renderer = Renderer::new(Gpu::from(&ctx), config).await?;
        Ok(Self {
            ctx,
            renderer,
            frame_interval,
        })
    }

    fn redraw(&mut self) {
        self.ctx.window.request_redraw();
        self.renderer.update(self.frame_interval, self.ctx.aspect_ratio());
        match self.renderer.render(&self.ctx) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.ctx.window.inner_size();
                self.ctx.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }
}

pub struct App {
    async_runtime: Runtime,
    config: RendererConfig,
    state: Option<AppState>,
    init_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: RendererConfig) -> anyhow::Result<Self> {
        let async_runtime = Runtime::new().context("Could not start the async runtime")?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            init_error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let attributes = Window::default_attributes().with_title(self.config.window_title.clone());
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Could not create the window")?,
        );
        self.async_runtime.block_on(AppState::new(window, &self.config))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Initialization failed: {:#}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::RedrawRequested => state.redraw(),
            _ => {}
        }
    }
}

/// Opens the window and renders until it is closed. Initialization failures
/// (no adapter, missing assets, ...) are returned instead of rendering.
pub fn run(config: RendererConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
