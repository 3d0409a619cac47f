use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Light parameters shared by the lit demos, overridable from a JSON5 file:
///
/// ```json5
/// {
///     // positions in world units
///     light_pos: [0, 2, 3],
///     light_color: [0.9, 0.95, 1.0, 1.0],
///     ambient: [0.2, 0.2, 0.38, 1.0],
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightRig {
    pub light_pos: [f32; 3],
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            light_pos: [0.0, 0.0, 3.0],
            light_color: [0.9, 0.95, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.38, 1.0],
        }
    }
}

impl LightRig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LightRigError> {
        let src = std::fs::read_to_string(path)?;

        Ok(json5::from_str(&src)?)
    }

    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::from_path(path) {
            Ok(rig) => rig,
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LightRigError {
    #[error("could not read lighting file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse lighting file: {0}")]
    Format(#[from] json5::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json5_with_comments() {
        let src = "{\n// warm key light\nlight_color: [1.0, 0.8, 0.6, 1.0],\n}";
        let rig: LightRig = json5::from_str(src).unwrap();

        assert_eq!(rig.light_color, [1.0, 0.8, 0.6, 1.0]);
        assert_eq!(rig.light_pos, LightRig::default().light_pos);
    }

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(LightRig::load_or_default(None), LightRig::default());
    }
}
