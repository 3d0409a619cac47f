use std::f32::consts::PI;
use std::num::NonZeroU32;

use cgmath::{Deg, Matrix4, Rad, Vector3};

use clap::{Parser, ValueEnum};

use glutin::surface::GlSurface;

use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;

use glsandbox::sphere;

use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Sphere meshes two ways: latitude/longitude bands, or a cube whose face
/// grid is normalized onto the sphere. Space toggles the wireframe overlay.
#[derive(Debug, Parser)]
struct Args {
    /// Tessellation method
    #[arg(value_enum, default_value_t = ModeArg::LatLong)]
    mode: ModeArg,
    /// Squares per cube face in patched mode
    #[arg(short, long, default_value_t = 5)]
    subdivisions: u32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    LatLong,
    Patched,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = DisplaySettings::load_or_default("settings.toml");
    let (event_loop, gl_window, gl_context) = window::init_gl("Patched Sphere", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();

    let mut mesh = match args.mode {
        ModeArg::LatLong => sphere::lat_long(2.0, PI / 8.0),
        ModeArg::Patched => sphere::patched(args.subdivisions),
    };
    mesh.compute_surface_normals(true);

    log::info!(
        "Generated sphere ({} vertices and {} indices)",
        mesh.positions.len(),
        mesh.indices.len()
    );

    let vertices = mesh.interleaved_pn();
    let geometry = GeometryBuilder::new(&vertices)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_indices(&mesh.indices)
        .build()?;

    let program = ProgramBuilder::new(
        include_str!("../shaders/surface.vert"),
        include_str!("../shaders/surface.frag"),
    )
    .build()?;

    let mut wireframe = true;
    let mut space_down = false;

    let mut last_pos = PhysicalPosition::new(0.0_f64, 0.0_f64);
    let mut lmb_pressed = false;
    let mut rotation_speed_x = 0.0_f32;
    let mut rotation_speed_y = 0.0_f32;
    let mut rotation_x = 0.0_f32;
    let mut rotation_y = 0.0_f32;
    let mut zoom = 0.0_f32;

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

                rotation_speed_x *= 0.95;
                rotation_speed_y *= 0.95;
                rotation_x += rotation_speed_x;
                rotation_y += rotation_speed_y;

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
                        rotation_speed_y += dx * 0.0005;
                        rotation_speed_x += dy * 0.0005;
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
                    zoom += scroll * 0.05;
                }
                WindowEvent::KeyboardInput { input, .. } => match input.virtual_keycode {
                    Some(VirtualKeyCode::Space) => {
                        let pressed = input.state == ElementState::Pressed;
                        if pressed && !space_down {
                            wireframe = !wireframe;
                        }
                        space_down = pressed;
                    }
                    Some(VirtualKeyCode::Escape) => {
                        if input.state == ElementState::Pressed {
                            control_flow.set_exit();
                        }
                    }
                    _ => {}
                },
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => (),
            },
            Event::RedrawRequested(_) => {
                let model =
                    Matrix4::from_angle_x(Rad(-rotation_x)) * Matrix4::from_angle_y(Rad(-rotation_y));
                let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -4.0 + zoom));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 10.0);

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);

                renderer.clear(0.73, 0.73, 0.73);

                program.set_uniform("white", 0.0_f32);
                renderer.draw(&geometry, &program);

                if wireframe {
                    program.set_uniform("white", 1.0_f32);
                    renderer.draw_wireframe(&geometry, &program);
                }
            }
            _ => (),
        }
    })
}
