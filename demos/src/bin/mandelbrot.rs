use std::num::NonZeroU32;
use std::time::Instant;

use cgmath::Vector2;

use clap::Parser;

use glutin::surface::GlSurface;

use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::QUAD;

use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Mandelbrot set on a fullscreen quad, iterated in the fragment shader.
/// Drag to pan, scroll to zoom; both keep a little inertia.
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
    let (event_loop, gl_window, gl_context) = window::init_gl("Mandelbrot", &settings)?;

    let mut renderer = GlRenderer::new();

    let quad = GeometryBuilder::new(&QUAD)
        .with_attribute(VertexAttribute::Vec2)
        .build()?;

    let program = ProgramBuilder::new(
        include_str!("../shaders/quad.vert"),
        include_str!("../shaders/mandelbrot.frag"),
    )
    .build()?;

    let mut zoom = 0.0_f32;
    let mut zoom_speed = 0.0_f32;
    let mut offset = Vector2::new(0.0_f32, 0.0_f32);
    let mut offset_speed = Vector2::new(0.0_f32, 0.0_f32);

    let mut last_pos = PhysicalPosition::new(0.0_f64, 0.0_f64);
    let mut lmb_pressed = false;

    let mut last_frame = Instant::now();
    let mut aspect = settings.aspect_ratio();

    event_loop.run(move |event, _window_target, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::RedrawEventsCleared => {
                if let Err(e) = gl_wrapper::error::check() {
                    log::error!("GL error: {e}");
                    control_flow.set_exit();
                    return;
                }

                let dt = last_frame.elapsed().as_secs_f32();
                last_frame = Instant::now();

                offset += offset_speed * dt;
                offset_speed *= 0.95;
                zoom += zoom_speed;
                zoom_speed *= 0.95;

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
                        aspect = size.width as f32 / size.height as f32;
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if lmb_pressed {
                        let dx = (position.x - last_pos.x) as f32;
                        let dy = (position.y - last_pos.y) as f32;
                        offset_speed += Vector2::new(dx * 0.005, -dy * 0.005);
                    }

                    last_pos = position;
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if let MouseButton::Left = button {
                        lmb_pressed = state == ElementState::Pressed;
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                    };
                    zoom_speed += scroll * 0.0005 * (1.0 - zoom);
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
                program.set_uniform("zoom", zoom);
                program.set_uniform("offset", offset);
                program.set_uniform("aspect", aspect);

                renderer.clear_color(1.0, 1.0, 1.0);
                renderer.draw(&quad, &program);
            }
            _ => (),
        }
    })
}
