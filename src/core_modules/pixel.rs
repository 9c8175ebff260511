// THEORY:
// The `Pixel` module is the most fundamental unit of the card finder. It is a
// "dumb" data container for a single RGBA sample taken out of a frame buffer.
//
// Key architectural principles:
// 1.  **Data Purity**: It holds the raw `u8` channel values without interpretation.
//     Deciding what color family a pixel belongs to is the job of the
//     `color_classifier`, not of the pixel itself.
// 2.  **Single-Pixel Scope**: Every method here reads only this pixel's channels. It
//     knows nothing about its neighbors or its position in the frame; the scanner
//     carries the (x, y) coordinate alongside it.
// 3.  **Buffer Layout**: Frames arrive as row-major byte sequences with four samples
//     per pixel (R, G, B and one channel that is ignored for classification).

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;

    /// Number of bytes a single pixel occupies in a frame buffer.
    pub const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The fourth sample. Carried through but never used for classification.
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Builds an opaque pixel from its color channels.
        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, Channel::MAX)
        }

        /// Widened channels, so threshold arithmetic cannot wrap.
        #[inline]
        pub fn widened(&self) -> (i16, i16, i16) {
            (self.red as i16, self.green as i16, self.blue as i16)
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn decodes_channels_in_buffer_order() {
        let pixel = Pixel::from([10u8, 20, 30, 40]);
        assert_eq!(pixel, Pixel::new(10, 20, 30, 40));
        assert_eq!(pixel.widened(), (10, 20, 30));
    }

    #[test]
    fn converts_back_to_bytes() {
        let bytes: [u8; CHANNELS] = Pixel::rgb(1, 2, 3).into();
        assert_eq!(bytes, [1, 2, 3, 255]);
    }
}
