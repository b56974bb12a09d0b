use crate::error::TgaError;
use crate::ext::{ExtReader, ExtWriter};
use crate::image::Image;
use std::io::{Read, Write};
use std::path::Path;

const HEADER_LEN: usize = 18;
const PACKET_REPEAT_FLAG: u8 = 0x80;
const PACKET_LEN_MASK: u8 = 0x7f;
const MAX_PACKET_RUN: usize = 128;
const FOOTER_SIGNATURE: &[u8; 18] = b"TRUEVISION-XFILE.\0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TgaImageType {
    NoData = 0,
    UncompressedColormapped = 1,
    UncompressedTruecolor = 2,
    UncompressedBlackAndWhite = 3,
    RleColormapped = 9,
    RleTruecolor = 10,
    RleBlackAndWhite = 11,
    CompressedColormapped = 32,
    CompressedColormapped4Pass = 33,
}

impl TryFrom<u8> for TgaImageType {
    type Error = TgaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::NoData,
            1 => Self::UncompressedColormapped,
            2 => Self::UncompressedTruecolor,
            3 => Self::UncompressedBlackAndWhite,
            9 => Self::RleColormapped,
            10 => Self::RleTruecolor,
            11 => Self::RleBlackAndWhite,
            32 => Self::CompressedColormapped,
            33 => Self::CompressedColormapped4Pass,
            n => return Err(TgaError::UnsupportedImageFormat(n)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id_len: u8,
    pub colormap_type: u8,
    pub image_type: u8,
    pub colormap_offset: u16,
    pub colormap_length: u16,
    pub colormap_depth: u8,
    pub image_x: u16,
    pub image_y: u16,
    pub width: u16,
    pub height: u16,
    pub depth: u8,
    pub descriptor: u8,
}

impl Header {
    pub fn truecolor(image_type: TgaImageType, width: u16, height: u16, depth: u8) -> Self {
        Header {
            id_len: 0,
            colormap_type: 0,
            image_type: image_type as u8,
            colormap_offset: 0,
            colormap_length: 0,
            colormap_depth: 0,
            image_x: 0,
            image_y: 0,
            width,
            height,
            depth,
            descriptor: 0,
        }
    }

    pub fn parse(raw: &[u8; HEADER_LEN]) -> Self {
        Header {
            id_len: raw[0],
            colormap_type: raw[1],
            image_type: raw[2],
            colormap_offset: u16::from_le_bytes([raw[3], raw[4]]),
            colormap_length: u16::from_le_bytes([raw[5], raw[6]]),
            colormap_depth: raw[7],
            image_x: u16::from_le_bytes([raw[8], raw[9]]),
            image_y: u16::from_le_bytes([raw[10], raw[11]]),
            width: u16::from_le_bytes([raw[12], raw[13]]),
            height: u16::from_le_bytes([raw[14], raw[15]]),
            depth: raw[16],
            descriptor: raw[17],
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut raw = [0u8; HEADER_LEN];
        raw[0] = self.id_len;
        raw[1] = self.colormap_type;
        raw[2] = self.image_type;
        raw[3..5].copy_from_slice(&self.colormap_offset.to_le_bytes());
        raw[5..7].copy_from_slice(&self.colormap_length.to_le_bytes());
        raw[7] = self.colormap_depth;
        raw[8..10].copy_from_slice(&self.image_x.to_le_bytes());
        raw[10..12].copy_from_slice(&self.image_y.to_le_bytes());
        raw[12..14].copy_from_slice(&self.width.to_le_bytes());
        raw[14..16].copy_from_slice(&self.height.to_le_bytes());
        raw[16] = self.depth;
        raw[17] = self.descriptor;
        raw
    }
}

impl Image {
    pub fn read_from_file<F: AsRef<Path> + ?Sized>(filename: &F) -> Result<Self, TgaError> {
        let file = std::fs::File::open(filename)?;
        let mut file = std::io::BufReader::new(file);
        Self::read_from(&mut file)
    }

    pub fn read_from_memory(data: &[u8]) -> Result<Self, TgaError> {
        Self::read_from(&mut &data[..])
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, TgaError> {
        let header = read_header(reader)?;
        if header.depth != 16 && header.depth != 24 && header.depth != 32 {
            return Err(TgaError::UnsupportedBitdepth(header.depth));
        }
        // Image ID field, plus the color-map table when one is present.
        let skip = header.id_len as u64
            + header.colormap_type as u64
                * header.colormap_length as u64
                * (header.colormap_depth as u64 / 8);
        reader.skip(skip).map_err(pixel_data_error)?;
        let mut image = Image::new(header.width as usize, header.height as usize)?;
        let bytes_per_pixel = header.depth as usize / 8;
        match TgaImageType::try_from(header.image_type)? {
            TgaImageType::NoData => {}
            TgaImageType::UncompressedTruecolor => {
                decode_raw(reader, image.pixels_mut(), bytes_per_pixel)?;
            }
            TgaImageType::RleTruecolor => {
                decode_rle(reader, image.pixels_mut(), bytes_per_pixel)?;
            }
            other => return Err(TgaError::UnsupportedImageFormat(other as u8)),
        }
        Ok(image)
    }

    pub fn write_to_file<F: AsRef<Path> + ?Sized>(
        &self,
        filename: &F,
        compress: bool,
    ) -> Result<(), TgaError> {
        let f = std::fs::File::create(filename)?;
        let mut f = std::io::BufWriter::new(f);
        self.write_to(&mut f, compress)?;
        f.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, compress: bool) -> Result<(), TgaError> {
        let width = u16::try_from(self.width())
            .map_err(|_| TgaError::DimensionsTooLarge(self.width(), self.height()))?;
        let height = u16::try_from(self.height())
            .map_err(|_| TgaError::DimensionsTooLarge(self.width(), self.height()))?;
        let depth = if self.is_opaque() { 24 } else { 32 };
        let image_type = if compress {
            TgaImageType::RleTruecolor
        } else {
            TgaImageType::UncompressedTruecolor
        };
        let header = Header::truecolor(image_type, width, height, depth);
        writer.write_all(&header.to_bytes())?;
        let bytes_per_pixel = depth as usize / 8;
        if compress {
            encode_rle(writer, self.pixels(), self.width(), bytes_per_pixel)?;
        } else {
            encode_raw(writer, self.pixels(), bytes_per_pixel)?;
        }
        // TGA 2.0 footer: zero extension and developer area offsets.
        writer.write_u32(0)?;
        writer.write_u32(0)?;
        writer.write_all(FOOTER_SIGNATURE)?;
        Ok(())
    }
}

fn read_header<R: Read>(reader: &mut R) -> Result<Header, TgaError> {
    let mut raw = [0u8; HEADER_LEN];
    reader.read_exact(&mut raw).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => TgaError::MissingHeader,
        _ => TgaError::Io(e),
    })?;
    Ok(Header::parse(&raw))
}

fn pixel_data_error(e: std::io::Error) -> TgaError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        TgaError::UnexpectedEof
    } else {
        TgaError::Io(e)
    }
}

fn unpack_pixel(src: &[u8], dst: &mut [u8]) {
    match src.len() {
        2 => {
            // 5-5-5-1 BGR; the attribute bit maps to 0x00 or 0x80, never 0xff.
            dst[0] = (src[1] & 0x7c) << 1;
            dst[1] = ((src[1] & 0x03) << 6) | ((src[0] & 0xe0) >> 2);
            dst[2] = (src[0] & 0x1f) << 3;
            dst[3] = src[1] & 0x80;
        }
        3 => {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = 0xff;
        }
        4 => {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = src[3];
        }
        _ => {}
    }
}

fn pack_pixel(rgba: &[u8], dst: &mut [u8]) {
    match dst.len() {
        3 => {
            dst[0] = rgba[2];
            dst[1] = rgba[1];
            dst[2] = rgba[0];
        }
        4 => {
            dst[0] = rgba[2];
            dst[1] = rgba[1];
            dst[2] = rgba[0];
            dst[3] = rgba[3];
        }
        _ => {}
    }
}

fn decode_raw<R: Read>(
    reader: &mut R,
    pixels: &mut [u8],
    bytes_per_pixel: usize,
) -> Result<(), TgaError> {
    let mut src = [0u8; 4];
    for dst in pixels.chunks_exact_mut(4) {
        reader
            .read_exact(&mut src[..bytes_per_pixel])
            .map_err(pixel_data_error)?;
        unpack_pixel(&src[..bytes_per_pixel], dst);
    }
    Ok(())
}

fn decode_rle<R: Read>(
    reader: &mut R,
    pixels: &mut [u8],
    bytes_per_pixel: usize,
) -> Result<(), TgaError> {
    let total = pixels.len() / 4;
    let mut src = [0u8; 4];
    let mut rgba = [0u8; 4];
    let mut filled = 0;
    // Packets run over the flat pixel sequence; a run may straddle rows.
    while filled < total {
        let packet = reader.read_u8().map_err(pixel_data_error)?;
        let run_len = ((packet & PACKET_LEN_MASK) as usize + 1).min(total - filled);
        if packet & PACKET_REPEAT_FLAG != 0 {
            reader
                .read_exact(&mut src[..bytes_per_pixel])
                .map_err(pixel_data_error)?;
            unpack_pixel(&src[..bytes_per_pixel], &mut rgba);
            for dst in pixels[filled * 4..(filled + run_len) * 4].chunks_exact_mut(4) {
                dst.copy_from_slice(&rgba);
            }
        } else {
            for dst in pixels[filled * 4..(filled + run_len) * 4].chunks_exact_mut(4) {
                reader
                    .read_exact(&mut src[..bytes_per_pixel])
                    .map_err(pixel_data_error)?;
                unpack_pixel(&src[..bytes_per_pixel], dst);
            }
        }
        filled += run_len;
    }
    Ok(())
}

fn encode_raw<W: Write>(
    writer: &mut W,
    pixels: &[u8],
    bytes_per_pixel: usize,
) -> Result<(), TgaError> {
    let mut packed = [0u8; 4];
    for px in pixels.chunks_exact(4) {
        pack_pixel(px, &mut packed[..bytes_per_pixel]);
        writer.write_all(&packed[..bytes_per_pixel])?;
    }
    Ok(())
}

fn run_length(pixels: &[u8], start: usize, total: usize, max_run: usize) -> usize {
    let first = &pixels[start * 4..start * 4 + 4];
    let mut len = 1;
    while len < max_run
        && start + len < total
        && &pixels[(start + len) * 4..(start + len) * 4 + 4] == first
    {
        len += 1;
    }
    len
}

fn encode_rle<W: Write>(
    writer: &mut W,
    pixels: &[u8],
    width: usize,
    bytes_per_pixel: usize,
) -> Result<(), TgaError> {
    let total = pixels.len() / 4;
    let max_run = width.min(MAX_PACKET_RUN);
    let mut packed = [0u8; 4];
    let mut i = 0;
    // The run scan ignores row boundaries, so a packet may straddle rows.
    while i < total {
        let run = run_length(pixels, i, total, max_run);
        if run == 0 {
            return Err(TgaError::ZeroRunLength);
        }
        if run >= 2 {
            writer.write_all(&[PACKET_REPEAT_FLAG | (run as u8 - 1)])?;
            pack_pixel(&pixels[i * 4..i * 4 + 4], &mut packed[..bytes_per_pixel]);
            writer.write_all(&packed[..bytes_per_pixel])?;
            i += run;
        } else {
            // Batch isolated pixels into one raw packet instead of emitting a
            // repeat packet per pixel.
            let mut count = 1;
            while count < max_run
                && i + count < total
                && run_length(pixels, i + count, total, max_run) == 1
            {
                count += 1;
            }
            writer.write_all(&[count as u8 - 1])?;
            for j in i..i + count {
                pack_pixel(&pixels[j * 4..j * 4 + 4], &mut packed[..bytes_per_pixel]);
                writer.write_all(&packed[..bytes_per_pixel])?;
            }
            i += count;
        }
    }
    Ok(())
}
