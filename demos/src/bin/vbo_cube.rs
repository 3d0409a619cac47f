use std::num::NonZeroU32;
use std::time::Instant;

use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector3};

use clap::Parser;

use glutin::surface::GlSurface;

use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;

use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

const RED: [f32; 4] = [1.0, 0.4, 0.4, 1.0];
const GREEN: [f32; 4] = [0.4, 1.0, 0.4, 1.0];
const BLUE: [f32; 4] = [0.4, 0.4, 1.0, 1.0];
const PURPLE: [f32; 4] = [1.0, 0.4, 1.0, 1.0];
const ORANGE: [f32; 4] = [1.0, 1.0, 0.4, 1.0];

#[rustfmt::skip]
const FACES: [([[f32; 3]; 4], [f32; 4]); 6] = [
    // Front
    ([[-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [0.5,  0.5,  0.5], [0.5, -0.5,  0.5]], RED),
    // Back
    ([[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]], GREEN),
    // Bottom
    ([[-0.5, -0.5,  0.5], [0.5, -0.5,  0.5], [0.5, -0.5, -0.5], [-0.5, -0.5, -0.5]], PURPLE),
    // Top
    ([[-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5], [0.5,  0.5, -0.5], [0.5,  0.5,  0.5]], ORANGE),
    // Left
    ([[-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5]], BLUE),
    // Right
    ([[0.5, -0.5,  0.5], [0.5,  0.5,  0.5], [0.5,  0.5, -0.5], [0.5, -0.5, -0.5]], BLUE),
];

#[rustfmt::skip]
const INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0,
    4, 5, 6, 6, 7, 4,
    8, 9, 10, 10, 11, 8,
    12, 13, 14, 14, 15, 12,
    16, 17, 18, 18, 19, 16,
    20, 21, 22, 22, 23, 20,
];

fn cube_vertices() -> Vec<f32> {
    let mut data = Vec::with_capacity(24 * 7);

    for (corners, color) in FACES {
        for corner in corners {
            data.extend_from_slice(&corner);
            data.extend_from_slice(&color);
        }
    }

    data
}

/// Vertex and index buffer setup: a per-face colored cube spinning with
/// elapsed time.
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
    let (event_loop, gl_window, gl_context) = window::init_gl("Vertex Buffer Objects", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();
    renderer.enable_backface_culling();

    let vertices = cube_vertices();
    let cube = GeometryBuilder::new(&vertices)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec4)
        .with_indices(&INDICES)
        .build()?;

    let program = ProgramBuilder::new(
        include_str!("../shaders/simple.vert"),
        include_str!("../shaders/simple.frag"),
    )
    .build()?;

    let start = Instant::now();
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
                let time = start.elapsed().as_secs_f32();

                let model: Matrix4<f32> = Matrix4::identity();
                let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0))
                    * Matrix4::from_angle_x(Rad(time * 2.0))
                    * Matrix4::from_angle_y(Rad(time));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 10.0);

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);

                renderer.clear(0.3, 0.3, 0.3);
                renderer.draw(&cube, &program);
            }
            _ => (),
        }
    })
}
