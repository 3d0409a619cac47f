use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Instant;

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3, Vector4};

use clap::Parser;

use glutin::surface::GlSurface;

use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use gl_wrapper::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::ProgramBuilder;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureFilter, TextureWrap};

use glsandbox::camera::OrbitCamera;
use glsandbox::image::ImageData;
use glsandbox::model::{DrawBatch, Model};

use glsandbox_common::lighting::LightRig;
use glsandbox_common::settings::DisplaySettings;
use glsandbox_common::window;

/// Loads a text-format model with its PNG textures and renders it with the
/// diffuse shader, one draw call per texture batch. Drop another model file
/// onto the window to swap it in. Arrow keys orbit, Z/X zoom, WASD/QE move
/// the light.
#[derive(Debug, Parser)]
struct Args {
    /// Path to the model file
    model: PathBuf,
    /// JSON5 file overriding the light color and ambient term
    #[arg(short, long)]
    lighting: Option<PathBuf>,
}

struct LoadedModel {
    geometry: Geometry,
    textures: Vec<Texture2D>,
    batches: Vec<DrawBatch>,
}

fn load_model(path: &Path) -> Result<LoadedModel, Box<dyn std::error::Error>> {
    let model = Model::from_path(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut textures = Vec::with_capacity(model.textures.len());
    for name in &model.textures {
        let image = ImageData::from_png_file(base.join(name))?;
        let texture = Texture2D::from_rgba8(
            image.width,
            image.height,
            &image.pixels,
            TextureFilter::Linear,
            TextureWrap::ClampToEdge,
        )?;

        log::info!("loaded {name}");
        textures.push(texture);
    }

    let geometry = GeometryBuilder::new(&model.vertices)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec3)
        .with_attribute(VertexAttribute::Vec2)
        .with_indices(&model.indices)
        .build()?;

    log::info!(
        "loaded model with {} vertices in {} batches",
        model.vertex_count(),
        model.batches.len()
    );

    Ok(LoadedModel {
        geometry,
        textures,
        batches: model.batches,
    })
}

#[derive(Debug, Default)]
struct ActiveKeys {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
    q: bool,
    e: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    z: bool,
    x: bool,
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

    let (event_loop, gl_window, gl_context) = window::init_gl("Model viewer", &settings)?;

    let mut renderer = GlRenderer::new();
    renderer.enable_depth_test();

    let program = ProgramBuilder::new(
        include_str!("../shaders/diffuse.vert"),
        include_str!("../shaders/diffuse.frag"),
    )
    .build()?;

    let mut loaded = load_model(&args.model)?;

    let mut camera = OrbitCamera::new();
    camera.set_vertical_angle(0.45);
    let mut radius = 5.0_f32;

    let light_color = Vector4::from(rig.light_color);
    let ambient = Vector4::from(rig.ambient);
    let mut light_pos = Vector3::from(rig.light_pos);

    let mut keys = ActiveKeys::default();

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

                const MOVE_SPEED: f32 = 10.0;
                const ORBIT_SPEED: f32 = 1.5;

                if keys.a {
                    light_pos.x -= MOVE_SPEED * dt;
                } else if keys.d {
                    light_pos.x += MOVE_SPEED * dt;
                }
                if keys.w {
                    light_pos.z -= MOVE_SPEED * dt;
                } else if keys.s {
                    light_pos.z += MOVE_SPEED * dt;
                }
                if keys.q {
                    light_pos.y -= MOVE_SPEED * dt;
                } else if keys.e {
                    light_pos.y += MOVE_SPEED * dt;
                }

                if keys.left {
                    camera.rotate_left(ORBIT_SPEED * dt);
                } else if keys.right {
                    camera.rotate_right(ORBIT_SPEED * dt);
                }
                if keys.up {
                    camera.rotate_up(ORBIT_SPEED * dt);
                } else if keys.down {
                    camera.rotate_down(ORBIT_SPEED * dt);
                }
                if keys.z {
                    radius = (radius - MOVE_SPEED * dt).max(0.5);
                } else if keys.x {
                    radius += MOVE_SPEED * dt;
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
                WindowEvent::DroppedFile(path) => match load_model(&path) {
                    Ok(model) => {
                        log::info!("read model from {:?}", path);
                        loaded = model;
                    }
                    Err(e) => log::error!("could not read model: {e}"),
                },
                WindowEvent::KeyboardInput { input, .. } => {
                    let pressed = input.state == ElementState::Pressed;

                    match input.virtual_keycode {
                        Some(VirtualKeyCode::W) => keys.w = pressed,
                        Some(VirtualKeyCode::A) => keys.a = pressed,
                        Some(VirtualKeyCode::S) => keys.s = pressed,
                        Some(VirtualKeyCode::D) => keys.d = pressed,
                        Some(VirtualKeyCode::Q) => keys.q = pressed,
                        Some(VirtualKeyCode::E) => keys.e = pressed,
                        Some(VirtualKeyCode::Left) => keys.left = pressed,
                        Some(VirtualKeyCode::Right) => keys.right = pressed,
                        Some(VirtualKeyCode::Up) => keys.up = pressed,
                        Some(VirtualKeyCode::Down) => keys.down = pressed,
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
                let model: Matrix4<f32> = Matrix4::identity();
                let view = camera.view_matrix_focus(radius, Vector3::new(0.0, 0.0, 0.0));
                let projection = cgmath::perspective(Deg(45.0), aspect, 0.1, 15.0);

                program.set_uniform("model", model);
                program.set_uniform("view", view);
                program.set_uniform("projection", projection);
                program.set_uniform("lightPos", light_pos);
                program.set_uniform("lightColor", light_color);
                program.set_uniform("ambient", ambient);
                program.set_uniform("texBaseImage", 0);

                renderer.clear(0.3, 0.3, 0.3);

                for batch in &loaded.batches {
                    loaded.textures[batch.texture].bind(0);
                    renderer.draw_range(&loaded.geometry, &program, batch.start, batch.count);
                }
            }
            _ => (),
        }
    })
}
