use image::RgbImage;
use ndarray::ArrayView2;

/// ITU-R 601 luma weights; the pico cascades were trained on this conversion.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Single-channel grayscale image: one byte per pixel, row-major.
///
/// Immutable once built; detection reads it through shared references only.
#[derive(Clone, Debug)]
pub struct PixelGrid {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelGrid {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decodes any raster format the `image` crate recognises and converts it
    /// to grayscale.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_rgb(&decoded.to_rgb8()))
    }

    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let data = rgb
            .pixels()
            .map(|p| {
                let luma = LUMA_WEIGHTS[0] * p[0] as f32
                    + LUMA_WEIGHTS[1] * p[1] as f32
                    + LUMA_WEIGHTS[2] * p[2] as f32;
                luma.round().min(255.0) as u8
            })
            .collect();
        Self::new(data, rgb.width(), rgb.height())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Height as a signed row count, for window arithmetic that may go negative.
    pub fn rows(&self) -> i32 {
        self.height as i32
    }

    /// Width as a signed column count.
    pub fn cols(&self) -> i32 {
        self.width as i32
    }

    pub fn as_ndarray(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data)
            .expect("PixelGrid data length must match dimensions")
    }
}
