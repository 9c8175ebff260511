// THEORY:
// The `ContiguousAreaBuilder` is the engine of the spatial grouping layer. It takes
// the coordinate list the scanner produced for one category and turns it into a
// short list of `BoundingBox`es, one per card-sized patch of that color.
//
// It is a greedy, incremental heuristic rather than exact connected-component
// labeling. The result depends on the order the coordinates arrive in: an early
// coordinate can claim a box that a later, closer coordinate would have suited
// better. That order dependence is accepted behavior.
//
// Algorithm steps:
// 1.  **Clustering (Pass 1)**: The first coordinate seeds a box. Every later
//     coordinate joins the *first* box, in creation order, whose squared distance to
//     it is below the threshold. If no box is close enough it seeds a new one.
// 2.  **Filtering**: Optionally, boxes that absorbed too few coordinates are dropped
//     as noise before merging.
// 3.  **Merging (Pass 2)**: The first surviving box seeds the output. Every later box
//     is combined into the *first* output box it intersects, or appended if it
//     intersects none. Growth in Pass 1 can make separate clusters touch; this pass
//     collapses them. With `MergeStrategy::UntilStable` the sweep repeats until no
//     merge happens, so the returned boxes are pairwise disjoint.
// 4.  **Stateless Utility**: Like the scanner, the builder keeps nothing between
//     calls. Boxes live in a plain `Vec` arena owned by the call and are returned by
//     value.

use crate::core_modules::bounding_box::{BoundingBox, Point};

/// Squared distance below which a coordinate joins an existing box.
pub const DEFAULT_SQ_DISTANCE_THRESHOLD: f64 = 6.0;

/// How the merge pass is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// One sweep over the clustered boxes.
    SinglePass,
    /// Sweep again until a sweep merges nothing.
    #[default]
    UntilStable,
}

/// Tunables for the two clustering passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    /// A coordinate joins a box when `sq_distance` is strictly below this value.
    pub sq_distance_threshold: f64,
    /// Boxes that absorbed this many coordinates or fewer are dropped before merging.
    /// Zero keeps every box.
    pub min_points: usize,
    pub merge_strategy: MergeStrategy,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            sq_distance_threshold: DEFAULT_SQ_DISTANCE_THRESHOLD,
            min_points: 0,
            merge_strategy: MergeStrategy::default(),
        }
    }
}

pub mod area_builder {
    use super::*;
    use tracing::debug;

    /// Groups `points` into bounding boxes. Returns an empty list for empty input.
    pub fn find_contiguous_areas(points: &[Point], config: &ClusterConfig) -> Vec<BoundingBox> {
        let clustered = cluster(points, config.sq_distance_threshold);
        let clustered_count = clustered.len();

        let kept: Vec<BoundingBox> = if config.min_points > 0 {
            clustered
                .into_iter()
                .filter(|area| area.points_count > config.min_points)
                .collect()
        } else {
            clustered
        };

        let mut areas = merge(kept);
        if config.merge_strategy == MergeStrategy::UntilStable {
            loop {
                let before = areas.len();
                areas = merge(areas);
                if areas.len() == before {
                    break;
                }
            }
        }

        debug!(
            points = points.len(),
            clustered = clustered_count,
            merged = areas.len(),
            "found contiguous areas"
        );
        areas
    }

    /// Pass 1: greedy first-fit assignment of coordinates to boxes.
    pub fn cluster(points: &[Point], sq_distance_threshold: f64) -> Vec<BoundingBox> {
        let mut iter = points.iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };

        let mut areas = vec![BoundingBox::of_point(*first)];
        for point in iter {
            match areas
                .iter_mut()
                .find(|area| area.sq_distance(*point) < sq_distance_threshold)
            {
                Some(area) => area.add_point(*point),
                None => areas.push(BoundingBox::of_point(*point)),
            }
        }
        areas
    }

    /// Pass 2: each box folds into the first output box it intersects.
    pub fn merge(areas: Vec<BoundingBox>) -> Vec<BoundingBox> {
        let mut iter = areas.into_iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };

        let mut merged = vec![first];
        for area in iter {
            match merged.iter_mut().find(|existing| existing.intersects(&area)) {
                Some(existing) => existing.combine(&area),
                None => merged.push(area),
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::area_builder::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn points(coords: &[(u32, u32)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    fn corners(area: &BoundingBox) -> ((u32, u32), (u32, u32)) {
        (
            (area.top_left.x, area.top_left.y),
            (area.bottom_right.x, area.bottom_right.y),
        )
    }

    fn random_points(rng: &mut StdRng, count: usize, extent: u32) -> Vec<Point> {
        (0..count)
            .map(|_| Point::new(rng.random_range(0..extent), rng.random_range(0..extent)))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_areas() {
        assert!(find_contiguous_areas(&[], &ClusterConfig::default()).is_empty());
        assert!(cluster(&[], DEFAULT_SQ_DISTANCE_THRESHOLD).is_empty());
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn nearby_points_share_a_box_and_far_points_do_not() {
        let areas = find_contiguous_areas(
            &points(&[(0, 0), (1, 0), (0, 1), (50, 50)]),
            &ClusterConfig::default(),
        );
        assert_eq!(areas.len(), 2);
        assert_eq!(corners(&areas[0]), ((0, 0), (1, 1)));
        assert_eq!(corners(&areas[1]), ((50, 50), (50, 50)));
        assert_eq!(areas[0].points_count, 3);
        assert_eq!(areas[1].points_count, 1);
    }

    #[test]
    fn threshold_is_strict() {
        // (2, 1) from a box at (0, 0): 4 + 1 = 5 < 6
        assert_eq!(cluster(&points(&[(0, 0), (2, 1)]), 6.0).len(), 1);
        // (2, 2) from a box at (0, 0): 4 + 4 = 8
        assert_eq!(cluster(&points(&[(0, 0), (2, 2)]), 6.0).len(), 2);
        // exactly at the threshold
        assert_eq!(cluster(&points(&[(0, 0), (2, 1)]), 5.0).len(), 2);
    }

    #[test]
    fn first_matching_box_wins() {
        // (3, 0) is within reach of both seeds; the earlier box claims it.
        let areas = cluster(&points(&[(0, 0), (6, 0), (3, 0)]), 10.0);
        assert_eq!(areas.len(), 2);
        assert_eq!(corners(&areas[0]), ((0, 0), (3, 0)));
        assert_eq!(corners(&areas[1]), ((6, 0), (6, 0)));
    }

    #[test]
    fn merge_combines_overlapping_boxes() {
        let a = BoundingBox::from_corners(Point::new(0, 0), Point::new(5, 5));
        let b = BoundingBox::from_corners(Point::new(4, 4), Point::new(9, 9));
        let merged = merge(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(corners(&merged[0]), ((0, 0), (9, 9)));
    }

    #[test]
    fn merge_keeps_disjoint_boxes_in_order() {
        let a = BoundingBox::from_corners(Point::new(0, 0), Point::new(2, 2));
        let b = BoundingBox::from_corners(Point::new(10, 10), Point::new(12, 12));
        assert_eq!(merge(vec![a, b]), vec![a, b]);
    }

    #[test]
    fn single_pass_can_leave_overlaps_that_until_stable_resolves() {
        // B is appended standalone, then C grows A until A overlaps B.
        let a = BoundingBox::from_corners(Point::new(0, 0), Point::new(2, 2));
        let b = BoundingBox::from_corners(Point::new(6, 0), Point::new(8, 2));
        let c = BoundingBox::from_corners(Point::new(1, 1), Point::new(7, 1));

        let single = merge(vec![a, b, c]);
        assert_eq!(single.len(), 2);
        assert!(single[0].intersects(&single[1]));

        let stable = merge(single);
        assert_eq!(stable.len(), 1);
        assert_eq!(corners(&stable[0]), ((0, 0), (8, 2)));
    }

    #[test]
    fn identical_points_land_in_the_same_box() {
        let areas = find_contiguous_areas(
            &points(&[(7, 7), (30, 30), (7, 7)]),
            &ClusterConfig::default(),
        );
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].points_count, 2);
    }

    #[test]
    fn min_points_drops_sparse_areas() {
        let mut coords: Vec<(u32, u32)> = (0..5).flat_map(|x| (0..5).map(move |y| (x, y))).collect();
        coords.push((100, 100));
        let config = ClusterConfig {
            min_points: 20,
            ..ClusterConfig::default()
        };
        let areas = find_contiguous_areas(&points(&coords), &config);
        assert_eq!(areas.len(), 1);
        assert_eq!(corners(&areas[0]), ((0, 0), (4, 4)));
        assert_eq!(areas[0].points_count, 25);
    }

    #[test]
    fn min_points_can_filter_everything() {
        let config = ClusterConfig {
            min_points: 20,
            ..ClusterConfig::default()
        };
        assert!(find_contiguous_areas(&points(&[(1, 1), (2, 2)]), &config).is_empty());
    }

    #[test]
    fn order_changes_the_partition() {
        // Accepted heuristic behavior: the same set, visited differently, clusters
        // differently. Starting in the middle lets one box reach both ends.
        let forward = cluster(&points(&[(0, 0), (4, 0), (2, 0)]), 6.0);
        let middle_first = cluster(&points(&[(2, 0), (0, 0), (4, 0)]), 6.0);
        assert_eq!(forward.len(), 2);
        assert_eq!(middle_first.len(), 1);
    }

    #[test]
    fn random_inputs_respect_box_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let count = rng.random_range(1..200);
            let coords = random_points(&mut rng, count, 60);
            let areas = find_contiguous_areas(&coords, &ClusterConfig::default());

            for area in &areas {
                assert!(area.top_left.x <= area.bottom_right.x);
                assert!(area.top_left.y <= area.bottom_right.y);
            }
            for (i, a) in areas.iter().enumerate() {
                for b in &areas[i + 1..] {
                    assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
                }
            }
            for point in &coords {
                let holders = areas.iter().filter(|area| area.contains(*point)).count();
                assert_eq!(holders, 1, "{:?} is covered by {} areas", point, holders);
            }
            let absorbed: usize = areas.iter().map(|area| area.points_count).sum();
            assert_eq!(absorbed, coords.len());
        }
    }
}
