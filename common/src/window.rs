use std::ffi::{CStr, CString};
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::settings::DisplaySettings;

/// Opens a window, creates a current OpenGL 4.5 context for it and loads
/// the GL function pointers. Every demo starts here.
pub fn init_gl(
    title: &str,
    settings: &DisplaySettings,
) -> Result<(EventLoop<()>, GlWindow, PossiblyCurrentContext), WindowError> {
    let event_loop = EventLoop::new();

    let window_builder = WindowBuilder::new()
        .with_inner_size(Size::Physical(PhysicalSize::new(
            settings.width,
            settings.height,
        )))
        .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
        .with_title(title);

    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let mut template = ConfigTemplateBuilder::new();
    if settings.msaa > 0 {
        template = template.with_multisampling(settings.msaa);
    }

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |mut configs| configs.next().unwrap())
        .map_err(|e| WindowError::Display(e.to_string()))?;

    let window = window.ok_or(WindowError::NoWindow)?;

    let handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attr = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
        .build(Some(handle));

    let gl_window = GlWindow::new(window, &gl_config)?;

    let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
        .make_current(&gl_window.surface)?;

    gl::load_with(|s| {
        gl_display
            .get_proc_address(CString::new(s).unwrap().as_c_str())
            .cast()
    });

    let interval = if settings.vsync {
        SwapInterval::Wait(NonZeroU32::new(1).unwrap())
    } else {
        SwapInterval::DontWait
    };
    gl_window.surface.set_swap_interval(&gl_context, interval)?;

    log_context_info();

    Ok((event_loop, gl_window, gl_context))
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, WindowError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width.max(1)).unwrap(),
            NonZeroU32::new(height.max(1)).unwrap(),
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

fn log_context_info() {
    let mut samples = 0;
    unsafe {
        gl::GetIntegerv(gl::SAMPLES, (&mut samples) as *mut i32);
    }

    log::info!("Vendor: {}", gl_string(gl::VENDOR));
    log::info!("Renderer: {}", gl_string(gl::RENDERER));
    log::info!("GL ver.: {}", gl_string(gl::VERSION));
    log::info!("GLSL ver.: {}", gl_string(gl::SHADING_LANGUAGE_VERSION));
    log::info!("MSAA samples: {samples}");
}

fn gl_string(name: gl::types::GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return String::from("unknown");
        }

        CStr::from_ptr(ptr as *const _).to_string_lossy().to_string()
    }
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("could not create display: {0}")]
    Display(String),
    #[error("display builder returned no window")]
    NoWindow,
    #[error(transparent)]
    Glutin(#[from] glutin::error::Error),
}
