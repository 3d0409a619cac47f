use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    pub fn from_rgba8(
        width: u32,
        height: u32,
        data: &[u8],
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<Self, TextureError> {
        if (width as usize * height as usize * 4) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let id = unsafe {
            Self::alloc(
                width,
                height,
                data.as_ptr() as *const c_void,
                gl::RGBA8,
                gl::UNSIGNED_BYTE,
                filter,
                wrap,
            )
        };

        Ok(Self { id })
    }

    pub fn from_rgba_f32(
        width: u32,
        height: u32,
        data: &[f32],
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<Self, TextureError> {
        if (width as usize * height as usize * 4) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let id = unsafe {
            Self::alloc(
                width,
                height,
                data.as_ptr() as *const c_void,
                gl::RGBA32F,
                gl::FLOAT,
                filter,
                wrap,
            )
        };

        Ok(Self { id })
    }

    unsafe fn alloc(
        width: u32,
        height: u32,
        data: *const c_void,
        internal: u32,
        data_type: u32,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> u32 {
        let mut id = 0;

        gl::GenTextures(1, (&mut id) as *mut u32);
        gl::BindTexture(gl::TEXTURE_2D, id);

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap.gl_value() as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap.gl_value() as i32);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            filter.gl_value() as i32,
        );
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MAG_FILTER,
            filter.gl_value() as i32,
        );

        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            internal as i32,
            width as i32,
            height as i32,
            0,
            gl::RGBA,
            data_type,
            data,
        );
        gl::GenerateMipmap(gl::TEXTURE_2D);

        gl::BindTexture(gl::TEXTURE_2D, 0);

        id
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
}

#[derive(Copy, Clone)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    fn gl_value(&self) -> u32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

#[derive(Copy, Clone)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
}

impl TextureWrap {
    fn gl_value(&self) -> u32 {
        match self {
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
            TextureWrap::Repeat => gl::REPEAT,
        }
    }
}
