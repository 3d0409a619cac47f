use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum GlError {
    #[error("INVALID_ENUM")]
    InvalidEnum,
    #[error("INVALID_VALUE")]
    InvalidValue,
    #[error("INVALID_OPERATION")]
    InvalidOperation,
    #[error("STACK_OVERFLOW")]
    StackOverflow,
    #[error("STACK_UNDERFLOW")]
    StackUnderflow,
    #[error("OUT_OF_MEMORY")]
    OutOfMemory,
    #[error("INVALID_FRAMEBUFFER_OPERATION")]
    InvalidFramebufferOperation,
    #[error("unknown GL error {0:#06x}")]
    Unknown(u32),
}

/// Drains one error from the GL error queue. Demos call this once per frame.
pub fn check() -> Result<(), GlError> {
    let code = unsafe { gl::GetError() };

    match code {
        gl::NO_ERROR => Ok(()),
        gl::INVALID_ENUM => Err(GlError::InvalidEnum),
        gl::INVALID_VALUE => Err(GlError::InvalidValue),
        gl::INVALID_OPERATION => Err(GlError::InvalidOperation),
        gl::STACK_OVERFLOW => Err(GlError::StackOverflow),
        gl::STACK_UNDERFLOW => Err(GlError::StackUnderflow),
        gl::OUT_OF_MEMORY => Err(GlError::OutOfMemory),
        gl::INVALID_FRAMEBUFFER_OPERATION => Err(GlError::InvalidFramebufferOperation),
        other => Err(GlError::Unknown(other)),
    }
}
