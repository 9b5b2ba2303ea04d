//! Functions to preprocess images.

use anyhow::{bail, Result};
use fast_image_resize::{
    images::Image as FirImage,
    pixels::PixelType,
    FilterType, ResizeAlg, ResizeOptions, Resizer,
};
use image::RgbImage;
use rayon::prelude::*;
use crate::common::PixelImage;
use crate::data::{InputShape, X};
use crate::error::ClassifierError;

/// Stretches (no letterboxing) and encodes `image` into a `[1, h, w, 3]` tensor in `[0, 1]`.
pub fn encode(image: &PixelImage, shape: InputShape) -> Result<X, ClassifierError> {
    if image.is_empty() {
        return Err(ClassifierError::Encoding(format!(
            "image has no pixels ({}x{})", image.width(), image.height()
        )));
    }
    if shape.is_empty() {
        return Err(ClassifierError::Encoding(format!("model input {} has no elements", shape)));
    }
    if shape.channels != 3 {
        return Err(ClassifierError::Encoding(format!(
            "model expects {} channels, images are RGB", shape.channels
        )));
    }

    let encoded = resize_exact(image, shape.width, shape.height)
        .and_then(|resized| nhwc_normalize_flat(resized.as_raw(), shape.width, shape.height))
        .and_then(|data| X::from_shape_vec(&shape.nhwc(), data));

    encoded.map_err(|err| ClassifierError::Encoding(format!("{err:#}")))
}

pub fn to_fir_image<'a>(image: &PixelImage) -> Result<FirImage<'a>> {
    let (width, height) = image.dimensions();
    Ok(FirImage::from_vec_u8(width, height, image.as_raw().to_vec(), PixelType::U8x3)?)
}

/// Bilinear resize to exactly `target_w` x `target_h`, ignoring aspect ratio.
pub fn resize_exact(image: &PixelImage, target_w: u32, target_h: u32) -> Result<RgbImage> {
    if image.dimensions() == (target_w, target_h) {
        return Ok(image.image.clone());
    }

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let resized = to_fir_image(image).and_then(|src| {
        let mut dst = FirImage::new(target_w, target_h, PixelType::U8x3);
        Resizer::new().resize(&src, &mut dst, &options)?;
        Ok(dst)
    });

    match resized {
        Ok(dst) => match RgbImage::from_raw(target_w, target_h, dst.buffer().to_vec()) {
            Some(out) => Ok(out),
            None => bail!("Resized buffer does not match {}x{}", target_w, target_h),
        },
        Err(err) => {
            log::warn!("Failed to use `fast_image_resize`: {err}. Falling back.");
            Ok(image::imageops::resize(
                &image.image,
                target_w,
                target_h,
                image::imageops::FilterType::Triangle,
            ))
        }
    }
}

/// Interleaved `RGBRGB...` bytes to floats in `[0, 1]`, keeping pixel and channel order.
pub fn nhwc_normalize_flat(buf: &[u8], w: u32, h: u32) -> Result<Vec<f32>> {
    let expected = w as usize * h as usize * 3;
    if buf.len() != expected {
        bail!("Unexpected buffer size: got {}, expected {}", buf.len(), expected);
    }

    Ok(buf.par_iter().map(|&v| v as f32 / 255.0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn encode_interleaves_normalized_rgb() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 51]));
        img.put_pixel(1, 0, Rgb([0, 255, 102]));
        let x = encode(&PixelImage::from(img), InputShape::new(1, 2, 3)).unwrap();

        assert_eq!(x.shape(), &[1, 1, 2, 3]);
        let v = x.to_flat_vec();
        let expected = [1.0, 0.0, 0.2, 0.0, 1.0, 0.4];
        for (got, want) in v.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
    }

    #[test]
    fn encode_stretches_to_model_size() {
        let img = RgbImage::from_pixel(640, 120, Rgb([128, 64, 32]));
        let x = encode(&PixelImage::from(img), InputShape::default()).unwrap();
        assert_eq!(x.shape(), &[1, 224, 224, 3]);

        // A flat colour survives bilinear resampling.
        let v = x.to_flat_vec();
        assert!((v[0] - 128. / 255.).abs() < 1. / 255. + 1e-6);
        assert!((v[1] - 64. / 255.).abs() < 1. / 255. + 1e-6);
        assert!((v[2] - 32. / 255.).abs() < 1. / 255. + 1e-6);
        assert!(v.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn encode_rejects_empty_images_and_odd_channels() {
        let empty = PixelImage::default();
        assert!(matches!(encode(&empty, InputShape::default()), Err(ClassifierError::Encoding(_))));

        let img = PixelImage::from(RgbImage::new(4, 4));
        assert!(matches!(encode(&img, InputShape::new(4, 4, 1)), Err(ClassifierError::Encoding(_))));
    }

    #[test]
    fn resize_exact_keeps_matching_sizes() {
        let img = PixelImage::from(RgbImage::from_pixel(3, 5, Rgb([1, 2, 3])));
        let out = resize_exact(&img, 3, 5).unwrap();
        assert_eq!(out.as_raw(), img.as_raw());

        let out = resize_exact(&img, 10, 2).unwrap();
        assert_eq!(out.dimensions(), (10, 2));
    }

    #[test]
    fn normalize_checks_buffer_size() {
        assert!(nhwc_normalize_flat(&[0; 5], 1, 2).is_err());
        assert_eq!(nhwc_normalize_flat(&[0, 255, 0], 1, 1).unwrap(), vec![0.0, 1.0, 0.0]);
    }
}
