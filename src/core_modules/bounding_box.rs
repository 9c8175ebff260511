// THEORY:
// The `BoundingBox` is the geometric primitive of the spatial grouping layer. It is
// an axis-aligned rectangle in pixel coordinates that starts as a single point and
// grows as the area builder feeds it more pixels.
//
// Key architectural principles:
// 1.  **Grow-Only**: A box is created from one seed coordinate and is only ever
//     extended, either point by point (`add_point`) or by absorbing another box
//     (`combine`). It never shrinks, so `top_left <= bottom_right` holds on both
//     axes after every mutation.
// 2.  **Inclusive Corners**: Both corners are part of the box. A box seeded at
//     (3, 4) covers exactly that pixel and has zero width and height.
// 3.  **Exclusive Ownership**: Boxes are plain values. The builder owns the boxes it
//     is growing and hands them to the caller by value once clustering is done.

/// A simple struct to represent a pixel coordinate in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// A mutable axis-aligned rectangle with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// The corner with the smallest x and y.
    pub top_left: Point,
    /// The corner with the largest x and y.
    pub bottom_right: Point,
    /// How many coordinates have been absorbed into this box.
    pub points_count: usize,
}

impl BoundingBox {
    /// Creates a zero-sized box covering only `point`.
    pub fn of_point(point: Point) -> Self {
        Self {
            top_left: point,
            bottom_right: point,
            points_count: 1,
        }
    }

    /// Creates a box spanning two corners. The corners may be given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let mut bbox = Self::of_point(a);
        bbox.add_point(b);
        bbox
    }

    pub fn width(&self) -> u32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> u32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Number of pixels covered, counting both inclusive edges.
    pub fn area(&self) -> u64 {
        (self.width() as u64 + 1) * (self.height() as u64 + 1)
    }

    /// The midpoint of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.top_left.x as f64 + self.bottom_right.x as f64) / 2.0,
            (self.top_left.y as f64 + self.bottom_right.y as f64) / 2.0,
        )
    }

    /// Squared distance from `point` to the nearest edge of the rectangle.
    ///
    /// Per axis, `d = max(|p - center| - half_extent, 0)`, so any point inside or on
    /// the rectangle is at distance 0.
    pub fn sq_distance(&self, point: Point) -> f64 {
        let (center_x, center_y) = self.center();
        let half_width = self.width() as f64 / 2.0;
        let half_height = self.height() as f64 / 2.0;
        let dx = ((point.x as f64 - center_x).abs() - half_width).max(0.0);
        let dy = ((point.y as f64 - center_y).abs() - half_height).max(0.0);
        dx * dx + dy * dy
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.top_left.x..=self.bottom_right.x).contains(&point.x)
            && (self.top_left.y..=self.bottom_right.y).contains(&point.y)
    }

    /// Grows the box minimally so it covers `point`. Each axis extends independently.
    pub fn add_point(&mut self, point: Point) {
        self.top_left.x = self.top_left.x.min(point.x);
        self.top_left.y = self.top_left.y.min(point.y);
        self.bottom_right.x = self.bottom_right.x.max(point.x);
        self.bottom_right.y = self.bottom_right.y.max(point.y);
        self.points_count += 1;
    }

    /// Separating-axis test. Boxes that share an edge intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        // one rectangle is left of the other
        if self.bottom_right.x < other.top_left.x || self.top_left.x > other.bottom_right.x {
            return false;
        }
        // one rectangle is above the other
        if self.bottom_right.y < other.top_left.y || self.top_left.y > other.bottom_right.y {
            return false;
        }
        true
    }

    /// Grows this box to cover `other` entirely and takes over its point count.
    pub fn combine(&mut self, other: &BoundingBox) {
        let count = self.points_count + other.points_count;
        self.add_point(other.top_left);
        self.add_point(other.bottom_right);
        self.points_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x0: u32, y0: u32, x1: u32, y1: u32) -> BoundingBox {
        BoundingBox::from_corners(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn seed_box_is_a_single_point() {
        let b = BoundingBox::of_point(Point::new(3, 4));
        assert_eq!(b.top_left, Point::new(3, 4));
        assert_eq!(b.bottom_right, Point::new(3, 4));
        assert_eq!(b.area(), 1);
        assert_eq!(b.center(), (3.0, 4.0));
    }

    #[test]
    fn distance_inside_is_zero() {
        let b = bbox(5, 5, 10, 10);
        assert_eq!(b.sq_distance(Point::new(6, 9)), 0.0);
        assert_eq!(b.sq_distance(Point::new(10, 5)), 0.0);
    }

    #[test]
    fn distance_to_corner() {
        assert_eq!(bbox(5, 5, 10, 10).sq_distance(Point::new(3, 3)), 8.0);
    }

    #[test]
    fn distance_to_edge() {
        assert_eq!(bbox(5, 5, 10, 10).sq_distance(Point::new(11, 5)), 1.0);
        assert_eq!(bbox(5, 5, 10, 10).sq_distance(Point::new(7, 12)), 4.0);
    }

    #[test]
    fn distance_uses_real_center_on_odd_extent() {
        // center 0.5, half width 0.5: the gap to (3, 0) is exactly 2
        let b = bbox(0, 0, 1, 0);
        assert_eq!(b.center(), (0.5, 0.0));
        assert_eq!(b.sq_distance(Point::new(3, 0)), 4.0);
        assert_eq!(b.sq_distance(Point::new(2, 0)), 1.0);
    }

    #[test]
    fn add_point_extends_each_axis_independently() {
        let mut b = BoundingBox::of_point(Point::new(5, 5));
        // low side on x, high side on y
        b.add_point(Point::new(2, 9));
        assert_eq!(b.top_left, Point::new(2, 5));
        assert_eq!(b.bottom_right, Point::new(5, 9));
        assert_eq!(b.points_count, 2);

        // a point inside changes nothing but the count
        b.add_point(Point::new(3, 6));
        assert_eq!(b, BoundingBox { points_count: 3, ..bbox(2, 5, 5, 9) });
    }

    #[test]
    fn intersects_on_overlap_and_shared_edge() {
        assert!(bbox(0, 0, 5, 5).intersects(&bbox(4, 4, 9, 9)));
        assert!(bbox(0, 0, 5, 5).intersects(&bbox(5, 0, 9, 5)));
        assert!(bbox(0, 0, 9, 9).intersects(&bbox(3, 3, 4, 4)));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        assert!(!bbox(0, 0, 5, 5).intersects(&bbox(6, 0, 9, 5)));
        assert!(!bbox(0, 0, 5, 5).intersects(&bbox(0, 6, 5, 9)));
        // overlapping on x only
        assert!(!bbox(0, 0, 5, 5).intersects(&bbox(2, 10, 3, 12)));
    }

    #[test]
    fn intersects_is_symmetric() {
        let boxes = [
            bbox(0, 0, 5, 5),
            bbox(4, 4, 9, 9),
            bbox(6, 0, 9, 2),
            bbox(0, 7, 2, 9),
            bbox(2, 10, 3, 12),
            bbox(3, 3, 3, 3),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn combine_covers_both_boxes() {
        let mut a = bbox(0, 0, 5, 5);
        let b = bbox(4, 4, 9, 9);
        a.combine(&b);
        assert_eq!(a.top_left, Point::new(0, 0));
        assert_eq!(a.bottom_right, Point::new(9, 9));
        assert_eq!(a.points_count, 4);
    }
}
