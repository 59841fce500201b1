use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::path::{ Path, PathBuf };
use std::rc::Rc;
use std::str::FromStr;

use image::{ DynamicImage, ImageBuffer, Rgba, RgbaImage };

use crate::engine::backend::GlBackend;

/// Role of a texture in a mesh material. Decides the sampler uniform it is
/// bound to (`material.texture_diffuse1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
    /// Any other tag, used verbatim as the sampler stem.
    Other(String),
}

impl TextureKind {
    pub fn stem(&self) -> &str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
            TextureKind::Other(tag) => tag,
        }
    }
}

impl FromStr for TextureKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "texture_diffuse" | "diffuse" => TextureKind::Diffuse,
            "texture_specular" | "specular" => TextureKind::Specular,
            "texture_normal" | "normal" => TextureKind::Normal,
            "texture_height" | "height" => TextureKind::Height,
            other => TextureKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Sampler uniform names for textures in bind order: `material.<stem><n>`,
/// where `n` counts from 1 separately for every stem.
pub fn sampler_names<'a>(kinds: impl IntoIterator<Item = &'a TextureKind>) -> Vec<String> {
    let mut counters: HashMap<&str, u32> = HashMap::new();
    kinds
        .into_iter()
        .map(|kind| {
            let n = counters.entry(kind.stem()).or_insert(0);
            *n += 1;
            format!("material.{}{}", kind.stem(), n)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    /// Flip rows so image row 0 ends up at texture coordinate v = 0.
    pub flip_vertically: bool,
    pub generate_mipmaps: bool,
    pub wrap: u32,
    pub min_filter: u32,
    pub mag_filter: u32,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_vertically: true,
            generate_mipmaps: true,
            wrap: glow::REPEAT,
            min_filter: glow::LINEAR_MIPMAP_LINEAR,
            mag_filter: glow::LINEAR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{len} bytes is not a {width}x{height} RGBA8 image")]
    InvalidDimensions {
        width: u32,
        height: u32,
        len: usize,
    },
    #[error("driver refused to create a texture: {0}")]
    ObjectCreation(String),
}

/// An owned 2D texture object holding RGBA8 pixels.
pub struct Texture2D<G: GlBackend = glow::Context> {
    gl: Rc<G>,
    texture: G::Texture,
    width: u32,
    height: u32,
}

impl<G: GlBackend> Texture2D<G> {
    pub fn from_rgba8(
        gl: Rc<G>,
        width: u32,
        height: u32,
        pixels: &[u8],
        options: &TextureOptions
    ) -> Result<Self, TextureError> {
        let expected = (width as usize).checked_mul(height as usize).and_then(|n| n.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(pixels.len()) {
            return Err(TextureError::InvalidDimensions { width, height, len: pixels.len() });
        }

        let texture = unsafe {
            let texture = gl.create_texture().map_err(TextureError::ObjectCreation)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, options.wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, options.wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, options.min_filter as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, options.mag_filter as i32);

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels)
            );
            if options.generate_mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }

            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        log::info!("uploaded {}x{} texture {:?}", width, height, texture);
        Ok(Self { gl, texture, width, height })
    }

    pub fn from_image(gl: Rc<G>, image: &DynamicImage, options: &TextureOptions) -> Result<Self, TextureError> {
        let mut rgba = image.to_rgba8();
        if options.flip_vertically {
            rgba = image::imageops::flip_vertical(&rgba);
        }
        Self::from_rgba8(gl, rgba.width(), rgba.height(), rgba.as_raw(), options)
    }

    pub fn load(gl: Rc<G>, path: impl AsRef<Path>, options: &TextureOptions) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("decoded {} ({}x{})", path.display(), image.width(), image.height());
        Self::from_image(gl, &image, options)
    }

    pub fn handle(&self) -> G::Texture {
        self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl<G: GlBackend> fmt::Debug for Texture2D<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture2D")
            .field("texture", &self.texture)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl<G: GlBackend> Drop for Texture2D<G> {
    fn drop(&mut self) {
        log::debug!("deleting texture {:?}", self.texture);
        unsafe {
            self.gl.delete_texture(self.texture);
        }
    }
}

/// A texture together with the role it plays when its mesh is drawn.
pub struct MeshTexture<G: GlBackend = glow::Context> {
    pub texture: Texture2D<G>,
    pub kind: TextureKind,
}

impl<G: GlBackend> MeshTexture<G> {
    pub fn new(texture: Texture2D<G>, kind: TextureKind) -> Self {
        Self { texture, kind }
    }
}

impl<G: GlBackend> fmt::Debug for MeshTexture<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshTexture").field("texture", &self.texture).field("kind", &self.kind).finish()
    }
}

/// Square checkerboard of `cells` x `cells` squares alternating `a` and `b`.
pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    ImageBuffer::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { Rgba(a) } else { Rgba(b) }
    })
}
