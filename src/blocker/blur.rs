use image::RgbaImage;

pub trait BlurFilter {
    fn blur(&self, image: &RgbaImage) -> RgbaImage;
}

/// Gaussian blur with a fixed radius, used as the standard deviation of the
/// kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    radius: f32,
}

impl GaussianBlur {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl BlurFilter for GaussianBlur {
    fn blur(&self, image: &RgbaImage) -> RgbaImage {
        if self.radius <= f32::EPSILON || image.width() == 0 || image.height() == 0 {
            return image.clone();
        }
        image::imageops::blur(image, self.radius)
    }
}
