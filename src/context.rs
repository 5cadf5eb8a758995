use crate::config::{AppConfig, Profile};
use crate::driver::NativeGl;
use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::{
    dpi::LogicalSize,
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

/// Window plus a current GL context and its surface.
///
/// Field order matters: the surface and context are torn down before the window.
pub struct GlContext {
    driver: Rc<NativeGl>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

pub fn init(config: &AppConfig) -> Result<(GlContext, EventLoop<()>)> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .context("Failed to create event loop")?;

    let window_config = &config.window;
    let window_builder = WindowBuilder::new()
        .with_title(&window_config.title)
        .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
        .with_visible(window_config.visible);

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .expect("glutin offered no framebuffer configs")
        })
        .map_err(|e| anyhow!("Failed to create GL display: {e}"))?;
    let window = window.context("Display builder returned no window")?;

    let gl_display = gl_config.display();
    let profile = match config.gl.profile {
        Profile::Core => GlProfile::Core,
        Profile::Compatibility => GlProfile::Compatibility,
    };
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(
            config.gl.major,
            config.gl.minor,
        ))))
        .with_profile(profile)
        .build(Some(window.raw_window_handle()));

    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .with_context(|| {
            format!(
                "Failed to create OpenGL {}.{} context",
                config.gl.major, config.gl.minor
            )
        })?;

    let attrs = window.build_surface_attributes(<_>::default());
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .context("Failed to create GL surface")?;

    let context = not_current
        .make_current(&surface)
        .context("Failed to make context current")?;

    if window_config.vsync {
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!("Could not enable vsync: {e}");
        }
    }

    // The context stays current on this thread for the lifetime of GlContext
    let driver = Rc::new(unsafe { NativeGl::load(|symbol| gl_display.get_proc_address(symbol)) });
    info!("OpenGL {}", driver.version_string());

    Ok((
        GlContext {
            driver,
            surface,
            context,
            window,
        },
        event_loop,
    ))
}

impl GlContext {
    pub fn driver(&self) -> &Rc<NativeGl> {
        &self.driver
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Zero-sized (minimised) windows are ignored.
    pub fn resize_surface(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("Failed to swap buffers")
    }
}
