use std::ffi::c_void;

use crate::geometry::Geometry;
use crate::program::Program;

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        self.bind_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());

            if geometry.indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    geometry.elements() as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32);
            }
        }
    }

    /// Draws a sub-range of an indexed geometry, `start`/`count` in elements.
    pub fn draw_range(
        &mut self,
        geometry: &Geometry,
        program: &Program,
        start: usize,
        count: usize,
    ) {
        self.bind_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawElements(
                gl::TRIANGLES,
                count as i32,
                gl::UNSIGNED_INT,
                (start * std::mem::size_of::<u32>()) as *const c_void,
            );
        }
    }

    /// Re-issues the geometry as a line-mode overlay pass.
    pub fn draw_wireframe(&mut self, geometry: &Geometry, program: &Program) {
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::LINE);
        }

        self.draw(geometry, program);

        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::FILL);
        }
    }

    pub fn draw_points(&mut self, geometry: &Geometry, program: &Program, size: f32) {
        self.bind_program(program);

        unsafe {
            gl::PointSize(size);
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(gl::POINTS, 0, geometry.vertices() as i32);
        }
    }

    fn bind_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    pub fn enable_depth_test(&self) {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthMask(gl::TRUE);
            gl::DepthFunc(gl::LEQUAL);
            gl::DepthRange(0.0, 1.0);
            gl::ClearDepth(1.0);
        }
    }

    pub fn enable_backface_culling(&self) {
        unsafe {
            gl::Enable(gl::CULL_FACE);
            gl::FrontFace(gl::CW);
            gl::CullFace(gl::BACK);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
