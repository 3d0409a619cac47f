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
use glsandbox::mesh::{compute_tangent_basis, MeshData};

use glsandbox_common::lighting::LightRig;
use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Normal mapping over a two-face slab: a normal map texture perturbs the
/// surface normal per fragment. WASD and Z/X move the light.
#[derive(Debug, Parser)]
struct Args {
    /// PNG normal map; without it a procedural bump map is generated
    #[arg(short, long)]
    normal_map: Option<PathBuf>,
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

// Front face and top face, two triangles each, laid out triangle-by-triangle
// so the tangent pass can walk vertices in triplets.
fn slab() -> MeshData {
    let mut mesh = MeshData::new();

    mesh.add_vertex(-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0);
    mesh.add_vertex(-0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 1.0);
    mesh.add_vertex(0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0);
    mesh.add_triangle(0, 1, 2);

    mesh.add_vertex(0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0);
    mesh.add_vertex(0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0);
    mesh.add_vertex(-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0);
    mesh.add_triangle(3, 4, 5);

    mesh.add_vertex(-0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0);
    mesh.add_vertex(-0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 0.0, 1.0);
    mesh.add_vertex(0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 1.0, 1.0);
    mesh.add_triangle(6, 7, 8);

    mesh.add_vertex(0.5, 0.5, -0.5, 0.0, 1.0, 0.0, 1.0, 1.0);
    mesh.add_vertex(0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 1.0, 0.0);
    mesh.add_vertex(-0.5, 0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0);
    mesh.add_triangle(9, 10, 11);

    mesh
}

#[derive(Debug, Default)]
struct ActiveKeys {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
    z: bool,
    x: bool,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = DisplaySettings::load_or_default("settings.toml");
    let rig = LightRig::load_or_default(args.lighting.as_deref());

    let (event_loop, gl_window, gl_context) = window::init_gl("Normalmapping", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();
    renderer.enable_backface_culling();

    let mesh = slab();
    let basis = compute_tangent_basis(&mesh);
    let vertices = mesh.interleaved_with_tangents(&basis);

    let geometry = GeometryBuilder::new(&vertices)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec2)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_indices(&mesh.indices)
        .build()?;

    let program = ProgramBuilder::new(
        include_str!("../shaders/normalmap.vert"),
        include_str!("../shaders/normalmap.frag"),
    )
    .build()?;

    let marker_vertex = [0.0_f32; 3];
    let marker = GeometryBuilder::new(&marker_vertex)
        .with_attribute(VertexAttribute::Vec3)
        .build()?;

    let marker_program = ProgramBuilder::new(
        include_str!("../shaders/marker.vert"),
        include_str!("../shaders/marker.frag"),
    )
    .build()?;

    let checker = ImageData::checkerboard(4, 4);
    let base_image = Texture2D::from_rgba8(
        checker.width,
        checker.height,
        &checker.pixels,
        TextureFilter::Nearest,
        TextureWrap::ClampToEdge,
    )?;

    let normal_image = match &args.normal_map {
        Some(path) => ImageData::from_png_file(path)?,
        None => ImageData::bump_normal_map(256, 0),
    };
    let normal_map = Texture2D::from_rgba8(
        normal_image.width,
        normal_image.height,
        &normal_image.pixels,
        TextureFilter::Linear,
        TextureWrap::ClampToEdge,
    )?;

    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0))
        * Matrix4::from_angle_x(Rad(-0.6));

    let light_color = Vector4::from(rig.light_color);
    let ambient = Vector4::from(rig.ambient);
    let mut light_pos = Vector3::from(rig.light_pos);

    let mut keys = ActiveKeys::default();

    let start = Instant::now();
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

                if keys.a {
                    light_pos.x -= 2.0 * dt;
                } else if keys.d {
                    light_pos.x += 2.0 * dt;
                }
                if keys.w {
                    light_pos.z -= 2.0 * dt;
                } else if keys.s {
                    light_pos.z += 2.0 * dt;
                }
                if keys.z {
                    light_pos.y -= 2.0 * dt;
                } else if keys.x {
                    light_pos.y += 2.0 * dt;
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
                    let pressed = input.state == ElementState::Pressed;

                    match input.virtual_keycode {
                        Some(VirtualKeyCode::W) => keys.w = pressed,
                        Some(VirtualKeyCode::A) => keys.a = pressed,
                        Some(VirtualKeyCode::S) => keys.s = pressed,
                        Some(VirtualKeyCode::D) => keys.d = pressed,
                        Some(VirtualKeyCode::Z) => keys.z = pressed,
                        Some(VirtualKeyCode::X) => keys.x = pressed,
                        Some(VirtualKeyCode::Escape) if pressed => control_flow.set_exit(),
                        _ => {}
                    }
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => (),
            },
            Event::RedrawRequested(_) => {
                let time = start.elapsed().as_secs_f32();

                let model = Matrix4::from_angle_y(Rad((time * 0.5).sin()));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 10.0);

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);
                program.set_uniform("lightPos", light_pos);
                program.set_uniform("lightColor", light_color);
                program.set_uniform("ambient", ambient);
                program.set_uniform("texBaseImage", 0);
                program.set_uniform("texNormalMap", 1);

                renderer.clear(0.55, 0.59, 0.95);

                base_image.bind(0);
                normal_map.bind(1);
                renderer.draw(&geometry, &program);

                marker_program.set_uniform("view", view);
                marker_program.set_uniform("projection", projection);
                marker_program.set_uniform("lightPos", light_pos);
                renderer.draw_points(&marker, &marker_program, 10.0);
            }
            _ => (),
        }
    })
}
