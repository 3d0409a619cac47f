pub mod lighting;
pub mod settings;
pub mod window;
