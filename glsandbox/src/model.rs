use std::path::Path;

use thiserror::Error;

/// Number of floats per vertex in the interleaved stream: `xyz nnn uv`.
pub const VERTEX_STRIDE: usize = 8;

/// A run of consecutive indices sharing one texture. `start` and `count`
/// are in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub texture: usize,
    pub start: usize,
    pub count: usize,
}

/// A mesh in the line-oriented text format of the model demo:
///
/// ```text
/// t albedo.png
/// v x y z nx ny nz u v
/// i textureIndex vertexIndex
/// ```
///
/// Unknown prefixes are skipped, so the files can carry comments.
#[derive(Debug, Default)]
pub struct Model {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub textures: Vec<String>,
    pub batches: Vec<DrawBatch>,
}

impl Model {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let src = std::fs::read_to_string(path)?;

        Self::parse(&src)
    }

    pub fn parse(src: &str) -> Result<Self, ModelError> {
        let mut model = Model::default();

        for (i, line) in src.lines().enumerate() {
            let line_no = i + 1;
            let mut fields = line.split_whitespace();

            match fields.next() {
                Some("v") => {
                    for _ in 0..VERTEX_STRIDE {
                        let value = fields
                            .next()
                            .and_then(|f| f.parse::<f32>().ok())
                            .ok_or(ModelError::Vertex { line: line_no })?;
                        model.vertices.push(value);
                    }
                }
                Some("i") => {
                    let texture = fields
                        .next()
                        .and_then(|f| f.parse::<usize>().ok())
                        .ok_or(ModelError::Index { line: line_no })?;
                    let vertex = fields
                        .next()
                        .and_then(|f| f.parse::<u32>().ok())
                        .ok_or(ModelError::Index { line: line_no })?;

                    let element = model.indices.len();
                    model.indices.push(vertex);

                    match model.batches.last_mut() {
                        Some(batch) if batch.texture == texture => batch.count += 1,
                        _ => model.batches.push(DrawBatch {
                            texture,
                            start: element,
                            count: 1,
                        }),
                    }
                }
                Some("t") => {
                    let name = fields.next().ok_or(ModelError::Texture { line: line_no })?;
                    model.textures.push(name.to_string());
                }
                _ => {}
            }
        }

        let vertex_count = model.vertex_count() as u32;
        if let Some(index) = model.indices.iter().find(|i| **i >= vertex_count) {
            return Err(ModelError::VertexIndexRange { index: *index });
        }

        for batch in &model.batches {
            if batch.texture >= model.textures.len() {
                return Err(ModelError::TextureIndexRange {
                    index: batch.texture,
                });
            }
        }

        Ok(model)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed vertex")]
    Vertex { line: usize },
    #[error("line {line}: malformed index")]
    Index { line: usize },
    #[error("line {line}: missing texture name")]
    Texture { line: usize },
    #[error("vertex index {index} out of range")]
    VertexIndexRange { index: u32 },
    #[error("texture index {index} out of range")]
    TextureIndexRange { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TRIANGLES: &str = "\
t base.png
t detail.png
v 0.0 0.0 0.0 0.0 0.0 1.0 0.0 0.0
v 1.0 0.0 0.0 0.0 0.0 1.0 1.0 0.0
v 1.0 1.0 0.0 0.0 0.0 1.0 1.0 1.0
v 0.0 1.0 0.0 0.0 0.0 1.0 0.0 1.0
i 0 0
i 0 1
i 0 2
i 1 2
i 1 3
i 1 0
";

    #[test]
    fn parses_vertices_indices_and_textures() {
        let model = Model::parse(TWO_TRIANGLES).unwrap();

        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.vertices.len(), 4 * VERTEX_STRIDE);
        assert_eq!(model.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(model.textures, vec!["base.png", "detail.png"]);
    }

    #[test]
    fn batches_are_contiguous_runs() {
        let model = Model::parse(TWO_TRIANGLES).unwrap();

        assert_eq!(
            model.batches,
            vec![
                DrawBatch {
                    texture: 0,
                    start: 0,
                    count: 3
                },
                DrawBatch {
                    texture: 1,
                    start: 3,
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn interleaved_texture_indices_split_batches() {
        let src = "\
t a.png
v 0 0 0 0 0 1 0 0
i 0 0
i 0 0
";
        let alternating = "\
t a.png
t b.png
v 0 0 0 0 0 1 0 0
i 0 0
i 1 0
i 0 0
";

        assert_eq!(Model::parse(src).unwrap().batches.len(), 1);
        assert_eq!(Model::parse(alternating).unwrap().batches.len(), 3);
    }

    #[test]
    fn skips_unknown_prefixes() {
        let src = "\
# a comment
t a.png
v 0 0 0 0 0 1 0 0
i 0 0
";
        let model = Model::parse(src).unwrap();

        assert_eq!(model.vertex_count(), 1);
        assert_eq!(model.indices.len(), 1);
    }

    #[test]
    fn malformed_vertex_reports_line() {
        let src = "t a.png\nv 0.0 bogus\n";

        match Model::parse(src) {
            Err(ModelError::Vertex { line }) => assert_eq!(line, 2),
            other => panic!("expected vertex error, got {:?}", other),
        }
    }

    #[test]
    fn out_of_range_texture_index_is_rejected() {
        let src = "v 0 0 0 0 0 1 0 0\ni 3 0\n";

        assert!(matches!(
            Model::parse(src),
            Err(ModelError::TextureIndexRange { index: 3 })
        ));
    }

    #[test]
    fn out_of_range_vertex_index_is_rejected() {
        let src = "t a.png\nv 0 0 0 0 0 1 0 0\ni 0 7\n";

        assert!(matches!(
            Model::parse(src),
            Err(ModelError::VertexIndexRange { index: 7 })
        ));
    }
}
