// THEORY:
// The `color_classifier` is the first analytical layer of the card finder. It looks
// at one `Pixel` at a time and decides which color family, if any, it belongs to.
//
// Key architectural principles:
// 1.  **Fixed Thresholds**: Each `Category` owns one predicate over the raw RGB
//     channels. The constants are reproduced exactly so detections stay compatible
//     with thresholds already tuned against real card footage.
// 2.  **Explicit Precedence**: Rules are evaluated in the declaration order of
//     `Category::ALL`. The Blue and Red predicates can never both hold (Blue implies
//     `blue > red + 8`, Red implies `blue < red - 80`), but the order is still the
//     tie-break if a future category overlaps an existing one.
// 3.  **Purity**: Classification has no side effects and no memory. It is safe to
//     call from any number of frames concurrently.
//
// Adding a category means adding a variant, listing it in `ALL`, and giving it a
// branch in `matches`.

use crate::core_modules::pixel::pixel::Pixel;
use std::fmt;

/// The color families the scanner sorts pixels into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Blue,
    Red,
}

impl Category {
    /// Every category, in classification precedence order.
    pub const ALL: [Category; 2] = [Category::Blue, Category::Red];

    /// Whether `pixel` satisfies this category's threshold rule.
    ///
    /// - Blue: `red < 150 && red + 4 < green && green + 4 < blue`
    /// - Red: `red > 140 && red - 80 > green && red - 80 > blue`
    pub fn matches(&self, pixel: &Pixel) -> bool {
        let (red, green, blue) = pixel.widened();
        match self {
            Category::Blue => red < 150 && red + 4 < green && green + 4 < blue,
            Category::Red => red > 140 && red - 80 > green && red - 80 > blue,
        }
    }

    /// The color used when drawing this category's boxes, as RGBA.
    pub fn draw_color(&self) -> [u8; 4] {
        match self {
            Category::Blue => [0, 0, 255, 255],
            Category::Red => [255, 0, 0, 255],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Blue => write!(f, "blue"),
            Category::Red => write!(f, "red"),
        }
    }
}

/// Returns the first category (in precedence order) whose rule accepts `pixel`,
/// or `None` when the pixel is unclassified.
pub fn classify(pixel: &Pixel) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|category| category.matches(pixel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_blue_card_pixel() {
        assert_eq!(classify(&Pixel::rgb(100, 150, 200)), Some(Category::Blue));
    }

    #[test]
    fn classifies_red_card_pixel() {
        assert_eq!(classify(&Pixel::rgb(200, 50, 50)), Some(Category::Red));
    }

    #[test]
    fn white_and_black_are_unclassified() {
        assert_eq!(classify(&Pixel::rgb(255, 255, 255)), None);
        assert_eq!(classify(&Pixel::rgb(0, 0, 0)), None);
    }

    #[test]
    fn blue_thresholds_are_strict() {
        // red + 4 == green
        assert_eq!(classify(&Pixel::rgb(100, 104, 200)), None);
        // green + 4 == blue
        assert_eq!(classify(&Pixel::rgb(100, 150, 154)), None);
        // red at the limit
        assert_eq!(classify(&Pixel::rgb(150, 200, 250)), None);
        assert_eq!(classify(&Pixel::rgb(149, 200, 250)), Some(Category::Blue));
    }

    #[test]
    fn red_thresholds_are_strict() {
        assert_eq!(classify(&Pixel::rgb(140, 0, 0)), None);
        assert_eq!(classify(&Pixel::rgb(141, 0, 0)), Some(Category::Red));
        // red - 80 == green
        assert_eq!(classify(&Pixel::rgb(200, 120, 0)), None);
        // red - 80 == blue
        assert_eq!(classify(&Pixel::rgb(200, 0, 120)), None);
    }

    #[test]
    fn saturated_green_does_not_wrap() {
        // green + 4 would overflow a u8
        assert_eq!(classify(&Pixel::rgb(10, 253, 255)), None);
        assert_eq!(classify(&Pixel::rgb(10, 250, 255)), Some(Category::Blue));
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(
            classify(&Pixel::new(100, 150, 200, 0)),
            classify(&Pixel::new(100, 150, 200, 255))
        );
    }

    #[test]
    fn blue_and_red_rules_are_disjoint() {
        for red in 0..=255u8 {
            for green in (0..=255u8).step_by(3) {
                for blue in (0..=255u8).step_by(3) {
                    let pixel = Pixel::rgb(red, green, blue);
                    assert!(
                        !(Category::Blue.matches(&pixel) && Category::Red.matches(&pixel)),
                        "{:?} matched both categories",
                        pixel
                    );
                }
            }
        }
    }
}
