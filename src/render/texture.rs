use gl::types::*;
use image::DynamicImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::context::GlContext;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Failed to load image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl TextureWrap {
    fn gl_enum(self) -> GLenum {
        match self {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::MirroredRepeat => gl::MIRRORED_REPEAT,
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

impl TextureFilter {
    fn gl_enum(self) -> GLenum {
        match self {
            TextureFilter::Nearest => gl::NEAREST,
            TextureFilter::Linear => gl::LINEAR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureOptions {
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub flip_vertically: bool,
    pub generate_mipmaps: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            wrap: TextureWrap::Repeat,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            flip_vertically: true,
            generate_mipmaps: true,
        }
    }
}

fn pixel_bytes(width: u32, height: u32, channels: u8) -> usize {
    width as usize * height as usize * channels as usize
}

/// Decoded pixels ready for upload, rows stored bottom-up when flipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl ImageData {
    pub fn open<P: AsRef<Path>>(path: P, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let img = if flip_vertically { img.flipv() } else { img };
        Ok(Self::from_image(img))
    }

    /// Keeps 8-bit grey, grey-alpha, RGB and RGBA as they are; anything else
    /// is converted to RGBA8.
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (pixels, channels) = match img {
            DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
            DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
            DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
            DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
            other => (other.to_rgba8().into_raw(), 4),
        };
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }

    /// Two-color RGB checkerboard, used when an image cannot be loaded.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(pixel_bytes(size, size, 3));
        for y in 0..size {
            for x in 0..size {
                let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&color);
            }
        }
        Self {
            pixels,
            width: size,
            height: size,
            channels: 3,
        }
    }

    /// Rejects images that have no pixels or a channel count GL cannot take.
    pub fn validate(&self) -> Result<GLenum, TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        self.gl_format()
    }

    /// Pixel format matching the channel count.
    pub fn gl_format(&self) -> Result<GLenum, TextureError> {
        match self.channels {
            1 => Ok(gl::RED),
            2 => Ok(gl::RG),
            3 => Ok(gl::RGB),
            4 => Ok(gl::RGBA),
            n => Err(TextureError::UnsupportedChannels(n)),
        }
    }
}

/// A 2D texture object. Deleted on drop.
pub struct Texture {
    _ctx: GlContext,
    id: u32,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes `path` and uploads it.
    pub fn from_file<P: AsRef<Path>>(
        ctx: &GlContext,
        path: P,
        options: &TextureOptions,
    ) -> Result<Self, TextureError> {
        let data = ImageData::open(path.as_ref(), options.flip_vertically)?;
        let texture = Self::upload(ctx, &data, options)?;
        let (width, height) = texture.size();
        debug!(
            "Loaded {:?} as texture {}: {}x{} with {} channels",
            path.as_ref(),
            texture.id(),
            width,
            height,
            data.channels
        );
        Ok(texture)
    }

    pub fn upload(
        ctx: &GlContext,
        data: &ImageData,
        options: &TextureOptions,
    ) -> Result<Self, TextureError> {
        let format = data.validate()?;

        let min_filter = match (options.generate_mipmaps, options.min_filter) {
            (true, TextureFilter::Linear) => gl::LINEAR_MIPMAP_LINEAR,
            (true, TextureFilter::Nearest) => gl::NEAREST_MIPMAP_NEAREST,
            (false, filter) => filter.gl_enum(),
        };

        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, options.wrap.gl_enum() as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, options.wrap.gl_enum() as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as i32);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                options.mag_filter.gl_enum() as i32,
            );

            // Rows of 1-3 channel images are not 4-byte aligned in general.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as i32,
                data.width as i32,
                data.height as i32,
                0,
                format,
                gl::UNSIGNED_BYTE,
                data.pixels.as_ptr() as *const _,
            );
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 4);

            if options.generate_mipmaps {
                gl::GenerateMipmap(gl::TEXTURE_2D);
            }

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        if let Some(code) = ctx.error() {
            warn!("GL error 0x{:x} while uploading texture {}", code, id);
        }

        Ok(Self {
            _ctx: *ctx,
            id,
            width: data.width,
            height: data.height,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}
