use crate::common::{DEFAULT_INPUT_CHANNELS, DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};

/// The model's declared image input, channels-last (`[1, height, width, channels]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl Default for InputShape {
    fn default() -> Self {
        Self {
            height: DEFAULT_INPUT_HEIGHT,
            width: DEFAULT_INPUT_WIDTH,
            channels: DEFAULT_INPUT_CHANNELS,
        }
    }
}

impl InputShape {
    pub fn new(height: u32, width: u32, channels: u32) -> Self {
        Self { height, width, channels }
    }

    /// Reads `[n, h, w, (c)]` from declared dims. Fewer than 3 dims keeps `fallback`
    /// entirely; dynamic (`-1`/`0`) dims keep the fallback for that axis only.
    pub fn from_dims(dims: &[i64], fallback: InputShape) -> Self {
        if dims.len() < 3 {
            log::warn!("Model input has {} dims, using default input size {}", dims.len(), fallback);
            return fallback;
        }

        let axis = |i: usize, default: u32, name: &str| -> u32 {
            match dims.get(i) {
                Some(&d) if d > 0 && d <= u32::MAX as i64 => d as u32,
                Some(&d) => {
                    log::warn!("Dynamic {} dimension ({}) in model input, using {}", name, d, default);
                    default
                }
                None => default,
            }
        };

        Self {
            height: axis(1, fallback.height, "height"),
            width: axis(2, fallback.width, "width"),
            channels: axis(3, fallback.channels, "channel"),
        }
    }

    /// Number of floats in one encoded image.
    pub fn len(&self) -> usize {
        self.height as usize * self.width as usize * self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nhwc(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, self.channels as usize]
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nhwc_dims_are_read() {
        let shape = InputShape::from_dims(&[1, 192, 256, 3], InputShape::default());
        assert_eq!(shape, InputShape::new(192, 256, 3));
        assert_eq!(shape.len(), 192 * 256 * 3);
    }

    #[test]
    fn three_dims_keep_default_channels() {
        let shape = InputShape::from_dims(&[1, 160, 160], InputShape::default());
        assert_eq!(shape, InputShape::new(160, 160, 3));
    }

    #[test]
    fn short_shapes_fall_back() {
        assert_eq!(InputShape::from_dims(&[1, 1000], InputShape::default()), InputShape::default());
        assert_eq!(InputShape::from_dims(&[], InputShape::default()), InputShape::default());
    }

    #[test]
    fn dynamic_axes_fall_back_per_axis() {
        let shape = InputShape::from_dims(&[-1, -1, 300, 3], InputShape::default());
        assert_eq!(shape, InputShape::new(224, 300, 3));
    }
}
