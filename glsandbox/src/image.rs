use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;

/// CPU-side RGBA8 pixel buffer, row-major from the top-left.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Black/white checkerboard. All four channels carry the cell value.
    pub fn checkerboard(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);

        for y in 0..height {
            for x in 0..width {
                let s = if (x + y) % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[s, s, s, s]);
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Tangent-space normal map derived from a seeded value-noise height
    /// field, so the normal-map demo works without any texture files.
    pub fn bump_normal_map(size: u32, seed: u64) -> Self {
        const CELLS: u32 = 8;
        const STRENGTH: f32 = 3.0;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let lattice: Vec<f32> = (0..(CELLS + 1) * (CELLS + 1))
            .map(|_| rng.gen_range(0.0..1.0))
            .collect();

        let height_at = |px: i64, py: i64| -> f32 {
            let px = px.rem_euclid(size as i64) as f32;
            let py = py.rem_euclid(size as i64) as f32;

            let fx = px / size as f32 * CELLS as f32;
            let fy = py / size as f32 * CELLS as f32;

            let cx = fx.floor() as u32;
            let cy = fy.floor() as u32;

            let tx = smoothstep(fx - cx as f32);
            let ty = smoothstep(fy - cy as f32);

            let at = |x: u32, y: u32| lattice[(y * (CELLS + 1) + x) as usize];

            let top = at(cx, cy) * (1.0 - tx) + at(cx + 1, cy) * tx;
            let bottom = at(cx, cy + 1) * (1.0 - tx) + at(cx + 1, cy + 1) * tx;

            top * (1.0 - ty) + bottom * ty
        };

        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size as i64 {
            for x in 0..size as i64 {
                let dx = (height_at(x + 1, y) - height_at(x - 1, y)) * STRENGTH;
                let dy = (height_at(x, y + 1) - height_at(x, y - 1)) * STRENGTH;

                let len = (dx * dx + dy * dy + 1.0).sqrt();
                let n = [-dx / len, -dy / len, 1.0 / len];

                pixels.push(((n[0] * 0.5 + 0.5) * 255.0) as u8);
                pixels.push(((n[1] * 0.5 + 0.5) * 255.0) as u8);
                pixels.push(((n[2] * 0.5 + 0.5) * 255.0) as u8);
                pixels.push(255);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        Self::decode_png(File::open(path)?)
    }

    /// Decodes an 8-bit PNG, expanding grayscale and RGB inputs to RGBA.
    pub fn decode_png<R: Read>(source: R) -> Result<Self, ImageError> {
        let decoder = png::Decoder::new(source);
        let mut reader = decoder.read_info()?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(ImageError::UnsupportedFormat);
        }

        let pixels = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            png::ColorType::Grayscale => {
                buf.iter().flat_map(|g| [*g, *g, *g, 255]).collect()
            }
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Indexed => return Err(ImageError::UnsupportedFormat),
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            pixels,
        })
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("could not read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported pixel format")]
    UnsupportedFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }

        out
    }

    #[test]
    fn checkerboard_alternates() {
        let img = ImageData::checkerboard(4, 4);

        assert_eq!(img.pixels.len(), 4 * 4 * 4);
        assert_eq!(&img.pixels[0..4], &[0, 0, 0, 0]);
        assert_eq!(&img.pixels[4..8], &[255, 255, 255, 255]);
        // Second row starts on the opposite cell.
        assert_eq!(&img.pixels[16..20], &[255, 255, 255, 255]);
    }

    #[test]
    fn bump_normal_map_is_unit_and_outward() {
        let img = ImageData::bump_normal_map(64, 0);

        assert_eq!(img.pixels.len(), 64 * 64 * 4);

        for p in img.pixels.chunks_exact(4) {
            let n = [
                p[0] as f32 / 255.0 * 2.0 - 1.0,
                p[1] as f32 / 255.0 * 2.0 - 1.0,
                p[2] as f32 / 255.0 * 2.0 - 1.0,
            ];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();

            assert!(n[2] > 0.0);
            assert!((len - 1.0).abs() < 0.05);
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn bump_normal_map_is_deterministic() {
        let a = ImageData::bump_normal_map(32, 7);
        let b = ImageData::bump_normal_map(32, 7);

        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn decodes_rgb_to_rgba() {
        let data = encode_png(2, 1, png::ColorType::Rgb, &[10, 20, 30, 40, 50, 60]);
        let img = ImageData::decode_png(Cursor::new(data)).unwrap();

        assert_eq!(img.width, 2);
        assert_eq!(img.height, 1);
        assert_eq!(img.pixels, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn decodes_grayscale_to_rgba() {
        let data = encode_png(2, 1, png::ColorType::Grayscale, &[7, 200]);
        let img = ImageData::decode_png(Cursor::new(data)).unwrap();

        assert_eq!(img.pixels, vec![7, 7, 7, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn rgba_passes_through() {
        let data = encode_png(1, 1, png::ColorType::Rgba, &[1, 2, 3, 4]);
        let img = ImageData::decode_png(Cursor::new(data)).unwrap();

        assert_eq!(img.pixels, vec![1, 2, 3, 4]);
    }
}
