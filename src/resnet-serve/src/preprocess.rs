//! Image-to-tensor preprocessing for the ResNet50 input contract.

use image::imageops::FilterType;
use image::DynamicImage;

/// Side of the intermediate bilinear resize.
pub const RESIZE_DIM: u32 = 256;

/// Side of the square center crop fed to the network.
pub const INPUT_DIM: u32 = 224;

/// Color channels fed to the network.
pub const CHANNELS: usize = 3;

/// Total number of floats in the input tensor (C * H * W).
pub const TENSOR_LEN: usize = CHANNELS * (INPUT_DIM as usize) * (INPUT_DIM as usize);

/// Per-channel training-set means, RGB order.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel training-set standard deviations, RGB order.
const STDDEV: [f32; 3] = [0.229, 0.224, 0.225];

/// Turn a decoded image into the flat channel-major float tensor the
/// network expects.
///
/// The image is resized to 256x256 with bilinear filtering, center-cropped
/// to 224x224, forced to RGB, scaled to [0, 1] and normalized per channel.
/// The result is (C, H, W) order: all red values first, then green, then
/// blue. Normalized values are not bounded to [0, 1].
pub fn image_to_tensor(image: &DynamicImage) -> Vec<f32> {
    let border = (RESIZE_DIM - INPUT_DIM) / 2;

    let resized = image.resize_exact(RESIZE_DIM, RESIZE_DIM, FilterType::Triangle);
    let rgb = resized.crop_imm(border, border, INPUT_DIM, INPUT_DIM).to_rgb8();

    let mut tensor = Vec::with_capacity(TENSOR_LEN);
    for c in 0..CHANNELS {
        for pixel in rgb.pixels() {
            let v = pixel.0[c] as f32 / 255.0;
            tensor.push((v - MEAN[c]) / STDDEV[c]);
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn tensor_length_is_fixed_for_any_input_size() {
        for (w, h) in &[(100, 100), (1000, 800), (256, 256)] {
            assert_eq!(image_to_tensor(&gradient(*w, *h)).len(), TENSOR_LEN);
        }
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let img = gradient(640, 480);

        assert_eq!(image_to_tensor(&img), image_to_tensor(&img));
    }

    #[test]
    fn gray_image_normalizes_per_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, Rgb([128, 128, 128])));
        let tensor = image_to_tensor(&img);

        let plane = (INPUT_DIM * INPUT_DIM) as usize;
        for (c, &value) in [tensor[0], tensor[plane], tensor[2 * plane]].iter().enumerate() {
            let expected = (128.0 / 255.0 - MEAN[c]) / STDDEV[c];
            assert!(
                (value - expected).abs() < 1e-6,
                "channel {}: {} != {}",
                c,
                value,
                expected
            );
        }
    }

    #[test]
    fn border_pixels_are_cropped_away() {
        // White 16-pixel frame around a black center. The frame sits exactly
        // on the crop border and must never reach the tensor.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(256, 256, |x, y| {
            if x < 16 || y < 16 || x >= 240 || y >= 240 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }));
        let tensor = image_to_tensor(&img);

        let plane = (INPUT_DIM * INPUT_DIM) as usize;
        for c in 0..CHANNELS {
            let expected = (0.0 - MEAN[c]) / STDDEV[c];
            for &value in &tensor[c * plane..(c + 1) * plane] {
                assert!((value - expected).abs() < 0.05);
            }
        }
    }
}
