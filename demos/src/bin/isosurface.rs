use std::num::NonZeroU32;

use cgmath::{Deg, Matrix4, Rad, Vector3};

use clap::{Parser, ValueEnum};

use glutin::surface::GlSurface;

use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;

use glsandbox::isosurface::{Polygonizer, Surface};

use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Triangulates an implicit surface with a brute-force voxel scan and
/// renders the shell with a wireframe overlay. Generation runs on a worker
/// thread so the window stays responsive.
#[derive(Debug, Parser)]
struct Args {
    /// Implicit surface to polygonize
    #[arg(value_enum, default_value_t = SurfaceArg::Nordstrand)]
    surface: SurfaceArg,
    /// Grid resolution per axis
    #[arg(short, long, default_value_t = 128)]
    resolution: u32,
    /// Half-thickness of the solid band around the level set
    #[arg(short, long, default_value_t = 0.3)]
    epsilon: f32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SurfaceArg {
    Nordstrand,
    Quartic,
    Sphere,
    Paraboloid,
    Sextic,
}

impl From<SurfaceArg> for Surface {
    fn from(s: SurfaceArg) -> Self {
        match s {
            SurfaceArg::Nordstrand => Self::Nordstrand,
            SurfaceArg::Quartic => Self::Quartic,
            SurfaceArg::Sphere => Self::Sphere,
            SurfaceArg::Paraboloid => Self::Paraboloid,
            SurfaceArg::Sextic => Self::Sextic,
        }
    }
}

struct GeneratedMesh {
    vertices: Vec<f32>,
    indices: Vec<u32>,
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
    let (event_loop, gl_window, gl_context) = window::init_gl("Isosurface", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();

    let program = ProgramBuilder::new(
        include_str!("../shaders/surface.vert"),
        include_str!("../shaders/surface.frag"),
    )
    .build()?;

    let (tx, rx) = flume::unbounded();

    let polygonizer = Polygonizer {
        resolution: args.resolution,
        epsilon: args.epsilon,
        ..Default::default()
    };
    let surface: Surface = args.surface.into();

    std::thread::spawn(move || {
        let mut mesh = polygonizer.polygonize(surface);
        mesh.compute_surface_normals(true);

        log::info!(
            "Generated isosurface ({} vertices and {} indices)",
            mesh.positions.len(),
            mesh.indices.len()
        );

        let generated = GeneratedMesh {
            vertices: mesh.interleaved_pn(),
            indices: mesh.indices,
        };

        // The receiver is gone if the window closed first.
        let _ = tx.send(generated);
    });

    let mut geometry: Option<Geometry> = None;

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

                if let Some(generated) = rx.try_iter().next() {
                    let built = GeometryBuilder::new(&generated.vertices)
                        .with_attribute(VertexAttribute::Vec3)
                        .with_attribute(VertexAttribute::Vec3)
                        .with_indices(&generated.indices)
                        .build();

                    match built {
                        Ok(g) => geometry = Some(g),
                        Err(e) => {
                            log::error!("could not upload isosurface mesh: {e}");
                            control_flow.set_exit();
                        }
                    }
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
                let model =
                    Matrix4::from_angle_x(Rad(-rotation_x)) * Matrix4::from_angle_y(Rad(-rotation_y));
                let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -4.0 + zoom));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 10.0);

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);

                renderer.clear(1.0, 1.0, 1.0);

                if let Some(geometry) = &geometry {
                    program.set_uniform("white", 0.0_f32);
                    renderer.draw(geometry, &program);

                    program.set_uniform("white", 1.0_f32);
                    renderer.draw_wireframe(geometry, &program);
                }
            }
            _ => (),
        }
    })
}
