use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Instant;

use cgmath::{Deg, Matrix4, Rad, Vector3, Vector4};

use clap::Parser;

use glutin::surface::GlSurface;

use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureFilter, TextureWrap};

use glsandbox::image::ImageData;

use glsandbox_common::lighting::LightRig;
use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

// xyz nnn uv per vertex, four vertices per face.
#[rustfmt::skip]
const CUBE: [f32; 24 * 8] = [
    // Front
    -0.5, -0.5,  0.5, 0.0, 0.0, 1.0, 0.0, 0.0,
    -0.5,  0.5,  0.5, 0.0, 0.0, 1.0, 0.0, 1.0,
     0.5,  0.5,  0.5, 0.0, 0.0, 1.0, 1.0, 1.0,
     0.5, -0.5,  0.5, 0.0, 0.0, 1.0, 1.0, 0.0,

    // Back
    -0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 0.0,
     0.5, -0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 0.0,
     0.5,  0.5, -0.5, 0.0, 0.0, -1.0, 1.0, 1.0,
    -0.5,  0.5, -0.5, 0.0, 0.0, -1.0, 0.0, 1.0,

    // Bottom
    -0.5, -0.5,  0.5, 0.0, -1.0, 0.0, 0.0, 0.0,
     0.5, -0.5,  0.5, 0.0, -1.0, 0.0, 1.0, 0.0,
     0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 1.0, 1.0,
    -0.5, -0.5, -0.5, 0.0, -1.0, 0.0, 0.0, 1.0,

    // Top
    -0.5,  0.5,  0.5, 0.0, 1.0, 0.0, 0.0, 0.0,
    -0.5,  0.5, -0.5, 0.0, 1.0, 0.0, 0.0, 1.0,
     0.5,  0.5, -0.5, 0.0, 1.0, 0.0, 1.0, 1.0,
     0.5,  0.5,  0.5, 0.0, 1.0, 0.0, 1.0, 0.0,

    // Left
    -0.5, -0.5, -0.5, -1.0, 0.0, 0.0, 0.0, 0.0,
    -0.5,  0.5, -0.5, -1.0, 0.0, 0.0, 0.0, 1.0,
    -0.5,  0.5,  0.5, -1.0, 0.0, 0.0, 1.0, 1.0,
    -0.5, -0.5,  0.5, -1.0, 0.0, 0.0, 1.0, 0.0,

    // Right
     0.5, -0.5,  0.5, 1.0, 0.0, 0.0, 0.0, 0.0,
     0.5,  0.5,  0.5, 1.0, 0.0, 0.0, 0.0, 1.0,
     0.5,  0.5, -0.5, 1.0, 0.0, 0.0, 1.0, 1.0,
     0.5, -0.5, -0.5, 1.0, 0.0, 0.0, 1.0, 0.0,
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

/// Diffuse lighting over a checkerboard-textured cube, with the light
/// orbiting the mesh.
#[derive(Debug, Parser)]
struct Args {
    /// JSON5 file overriding the light color and ambient term
    #[arg(short, long)]
    lighting: Option<PathBuf>,
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
    let rig = LightRig::load_or_default(args.lighting.as_deref());

    let (event_loop, gl_window, gl_context) = window::init_gl("Diffuse", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();
    renderer.enable_backface_culling();

    let cube = GeometryBuilder::new(&CUBE)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec2)
        .with_indices(&INDICES)
        .build()?;

    let program = ProgramBuilder::new(
        include_str!("../shaders/diffuse.vert"),
        include_str!("../shaders/diffuse.frag"),
    )
    .build()?;

    let checker = ImageData::checkerboard(4, 4);
    let texture = Texture2D::from_rgba8(
        checker.width,
        checker.height,
        &checker.pixels,
        TextureFilter::Nearest,
        TextureWrap::ClampToEdge,
    )?;

    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0))
        * Matrix4::from_angle_x(Rad(-0.59))
        * Matrix4::from_angle_y(Rad(0.35));

    let light_color = Vector4::from(rig.light_color);
    let ambient = Vector4::from(rig.ambient);

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

                let model = Matrix4::from_angle_x(Rad(time)) * Matrix4::from_angle_y(Rad(time));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 10.0);

                let light_pos = Vector3::new((time * 2.0).sin(), 1.0, (time * 2.0).cos());

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);
                program.set_uniform("lightPos", light_pos);
                program.set_uniform("lightColor", light_color);
                program.set_uniform("ambient", ambient);
                program.set_uniform("texBaseImage", 0);

                renderer.clear(0.55, 0.59, 0.95);
                texture.bind(0);
                renderer.draw(&cube, &program);
            }
            _ => (),
        }
    })
}
