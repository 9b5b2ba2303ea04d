use anyhow::Result;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage, SubImage};

/// A decoded RGB picture handed to the classifier. Never mutated by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PixelImage {
    pub image: RgbImage,
}

impl std::ops::Deref for PixelImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for PixelImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl From<GrayImage> for PixelImage {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<RgbImage> for PixelImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for PixelImage {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl<I> From<SubImage<I>> for PixelImage
where
    I: std::ops::Deref,
    I::Target: image::GenericImageView<Pixel = image::Rgb<u8>> + 'static,
{
    fn from(sub_image: SubImage<I>) -> Self {
        Self {
            image: sub_image.to_image(),
        }
    }
}

impl From<PixelImage> for RgbImage {
    fn from(image: PixelImage) -> Self {
        image.image
    }
}

impl PixelImage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Wraps an interleaved `R,G,B` byte buffer of `width * height * 3` bytes.
    pub fn from_rgb_bytes(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        let got = rgb.len();
        match RgbImage::from_raw(width, height, rgb) {
            Some(image) if got == expected => Ok(Self { image }),
            _ => anyhow::bail!(
                "RGB buffer of {} bytes does not match a {}x{} image ({} bytes)",
                got, width, height, expected
            ),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// `[r, g, b]` at column `x`, row `y`. Panics when out of bounds, like [`RgbImage::get_pixel`].
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_dyn(&self) -> DynamicImage {
        DynamicImage::from(self.image.clone())
    }

    pub fn into_rgb8(self) -> RgbImage {
        self.image
    }
}
