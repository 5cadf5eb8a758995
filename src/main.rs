use anyhow::{Context, Result};
use log::{error, info};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use trigl::{config, context, GlContext, NativeGl, Renderer};
use winit::event::{Event, WindowEvent};

// Renderer first: GPU objects go before the context that owns them
struct App {
    renderer: Renderer<NativeGl>,
    gl: GlContext,
}

impl App {
    fn resize(&self, width: u32, height: u32) {
        self.gl.resize_surface(width, height);
        self.renderer.resize(width, height);
    }

    /// Returns false once the frame can no longer be presented.
    fn redraw(&self) -> bool {
        self.renderer.render_frame();
        match self.gl.swap_buffers() {
            Ok(()) => true,
            Err(e) => {
                error!("{e:#}");
                false
            }
        }
    }
}

fn main() -> Result<()> {
    let config_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => config::default_path()?,
    };
    let config = config::load_or_create(&config_path)?;
    config.validate().context("Invalid configuration")?;

    SimpleLogger::new().with_level(config.level_filter()?).init()?;
    info!("Using config {}", config_path.display());

    let (gl, event_loop) = context::init(&config)?;
    let renderer = Renderer::new(gl.driver(), &config.scene).context("Failed to set up scene")?;
    let app = App { renderer, gl };
    let size = app.gl.window().inner_size();
    app.resize(size.width, size.height);

    let mut app = Some(app);
    event_loop.run(move |event, elwt| {
        let Some(state) = &app else {
            return;
        };

        let keep_running = match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => false,
                WindowEvent::Resized(size) => {
                    state.resize(size.width, size.height);
                    true
                }
                WindowEvent::RedrawRequested => state.redraw(),
                _ => true,
            },
            Event::AboutToWait => {
                state.gl.window().request_redraw();
                true
            }
            _ => true,
        };

        if !keep_running {
            info!("Shutting down");
            app = None;
            elwt.exit();
        }
    })?;

    Ok(())
}
