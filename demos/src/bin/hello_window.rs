use std::num::NonZeroU32;

use clap::Parser;

use glutin::surface::GlSurface;

use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use gl_wrapper::renderer::GlRenderer;

use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Opens a window with a live GL context and clears it until closed.
#[derive(Debug, Parser)]
struct Args {}

fn main() {
    env_logger::init();

    let _args = Args::parse();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = DisplaySettings::load_or_default("settings.toml");
    let (event_loop, gl_window, gl_context) = window::init_gl("Hello World", &settings)?;

    let renderer = GlRenderer::new();

    event_loop.run(move |event, _window_target, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::RedrawEventsCleared => {
                if let Err(e) = gl_wrapper::error::check() {
                    log::error!("GL error: {e}");
                    control_flow.set_exit();
                    return;
                }

                gl_window.window.request_redraw();
                if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                    log::error!("could not swap buffers: {e}");
                    control_flow.set_exit();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => {
                    if size.width != 0 && size.height != 0 {
                        gl_window.surface.resize(
                            &gl_context,
                            NonZeroU32::new(size.width).unwrap(),
                            NonZeroU32::new(size.height).unwrap(),
                        );
                        renderer.resize(size.width, size.height);
                    }
                }
                WindowEvent::KeyboardInput { input, .. } => {
                    if let (Some(VirtualKeyCode::Escape), ElementState::Pressed) =
                        (input.virtual_keycode, input.state)
                    {
                        control_flow.set_exit();
                    }
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => (),
            },
            Event::RedrawRequested(_) => {
                renderer.clear_color(0.1, 0.1, 0.1);
            }
            _ => (),
        }
    })
}
