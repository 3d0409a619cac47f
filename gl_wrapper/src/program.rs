use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_char, CString};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use gl::types::{GLenum, GLuint};
use thiserror::Error;

pub struct ProgramBuilder {
    vert: String,
    frag: String,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: vert_src.to_string(),
            frag: frag_src.to_string(),
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = compile_stage(gl::VERTEX_SHADER, &self.vert)?;
        let frag = compile_stage(gl::FRAGMENT_SHADER, &self.frag)?;

        let mut success: i32 = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                let buf = [0_u8; 1024];

                gl::GetProgramInfoLog(
                    program,
                    1024,
                    std::ptr::null_mut(),
                    (&buf).as_ptr() as *mut c_char,
                );

                return Err(PBError::Linking(log_to_string(&buf)));
            }

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            Ok(Program {
                id: program,
                locations: RefCell::new(HashMap::new()),
            })
        }
    }
}

fn compile_stage(kind: GLenum, src: &str) -> Result<GLuint, PBError> {
    let src = CString::new(src).map_err(|_| PBError::InvalidSource)?;

    let mut success: i32 = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            let buf = [0_u8; 1024];

            gl::GetShaderInfoLog(
                shader,
                1024,
                std::ptr::null_mut(),
                (&buf).as_ptr() as *mut c_char,
            );

            return Err(PBError::Compilation(log_to_string(&buf)));
        }

        Ok(shader)
    }
}

fn log_to_string(buf: &[u8]) -> String {
    let data = if buf.contains(&0) {
        buf.split(|a| *a == 0).next().unwrap()
    } else {
        buf
    };

    String::from_utf8_lossy(data).to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("shader source contains an interior NUL byte")]
    InvalidSource,
    #[error("{0}")]
    Compilation(String),
    #[error("{0}")]
    Linking(String),
}

pub struct Program {
    id: GLuint,
    locations: RefCell<HashMap<String, i32>>,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// Uploads a uniform by name. Unknown names resolve to location -1,
    /// which GL ignores.
    pub fn set_uniform<U: UniformValue>(&self, name: &str, value: U) {
        let location = self.location(name);

        unsafe { value.upload(self.id, location) }
    }

    fn location(&self, name: &str) -> i32 {
        if let Some(location) = self.locations.borrow().get(name) {
            return *location;
        }

        let c_name = CString::new(name).unwrap();
        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        self.locations.borrow_mut().insert(name.to_string(), location);

        location
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

pub trait UniformValue {
    /// # Safety
    ///
    /// Requires a live GL context on the current thread.
    unsafe fn upload(&self, program: GLuint, location: i32);
}

impl UniformValue for f32 {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        gl::ProgramUniform1f(program, location, *self);
    }
}

impl UniformValue for i32 {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        gl::ProgramUniform1i(program, location, *self);
    }
}

impl UniformValue for Vector2<f32> {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        gl::ProgramUniform2f(program, location, self.x, self.y);
    }
}

impl UniformValue for Vector3<f32> {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        gl::ProgramUniform3f(program, location, self.x, self.y, self.z);
    }
}

impl UniformValue for Vector4<f32> {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        gl::ProgramUniform4f(program, location, self.x, self.y, self.z, self.w);
    }
}

impl UniformValue for Matrix4<f32> {
    unsafe fn upload(&self, program: GLuint, location: i32) {
        let values: [[f32; 4]; 4] = (*self).into();

        gl::ProgramUniformMatrix4fv(
            program,
            location,
            1,
            gl::FALSE,
            values.as_ptr() as *const f32,
        );
    }
}
