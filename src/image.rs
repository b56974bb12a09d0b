use crate::error::TgaError;
use anyhow::Result;
use std::path::Path;

pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

impl Image {
    pub fn new(width: usize, height: usize) -> Result<Self, TgaError> {
        let size = width * height * 4;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(size)?;
        pixels.resize(size, 0);
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        let p = (y * self.width + x) * 4;
        [
            self.pixels[p],
            self.pixels[p + 1],
            self.pixels[p + 2],
            self.pixels[p + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        let p = (y * self.width + x) * 4;
        self.pixels[p..p + 4].copy_from_slice(&rgba);
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0xff)
    }

    pub fn export_png<F: AsRef<Path> + ?Sized>(&self, filename: &F) -> Result<()> {
        let f = std::fs::File::create(filename)?;
        let f = std::io::BufWriter::new(f);
        let opaque = self.is_opaque();
        let mut encoder = png::Encoder::new(f, self.width as u32, self.height as u32);
        encoder.set_color(if opaque {
            png::ColorType::Rgb
        } else {
            png::ColorType::Rgba
        });
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        if opaque {
            writer.write_image_data(&Self::rgba_to_rgb(&self.pixels))?;
        } else {
            writer.write_image_data(&self.pixels)?;
        }
        Ok(())
    }

    pub fn import_png<F: AsRef<Path> + ?Sized>(filename: &F) -> Result<Self> {
        let f = std::fs::File::open(filename)?;
        let mut decoder = png::Decoder::new(f);
        let info = decoder.read_header_info()?;
        if info.bit_depth != png::BitDepth::Eight {
            return Err(anyhow::anyhow!(
                "Image bit depth mismatch: expected 8, got {:?}",
                info.bit_depth
            ));
        }
        if info.color_type != png::ColorType::Rgb && info.color_type != png::ColorType::Rgba {
            return Err(anyhow::anyhow!(
                "Image color type mismatch: expected RGB or RGBA, got {:?}",
                info.color_type
            ));
        }
        let ct = info.color_type;
        let width = info.width as usize;
        let height = info.height as usize;
        let mut reader = decoder.read_info()?;
        let size = width * height * if ct == png::ColorType::Rgb { 3 } else { 4 };
        let mut data = Vec::with_capacity(size);
        data.resize(size, 0);
        reader.next_frame(&mut data)?;
        let mut image = Image::new(width, height)?;
        if ct == png::ColorType::Rgb {
            image.pixels.copy_from_slice(&Self::rgb_to_rgba(&data));
        } else {
            image.pixels.copy_from_slice(&data);
        }
        Ok(image)
    }

    fn rgba_to_rgb(src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::with_capacity(src.len() / 4 * 3);
        for chunk in src.chunks(4) {
            if chunk.len() == 4 {
                dst.push(chunk[0]); // R
                dst.push(chunk[1]); // G
                dst.push(chunk[2]); // B
            }
        }
        dst
    }

    fn rgb_to_rgba(src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::with_capacity(src.len() / 3 * 4);
        for chunk in src.chunks(3) {
            if chunk.len() == 3 {
                dst.push(chunk[0]); // R
                dst.push(chunk[1]); // G
                dst.push(chunk[2]); // B
                dst.push(0xff); // A
            }
        }
        dst
    }
}
