//! Bounding Volume Hierarchy (BVH) over indexed items.
//!
//! The tree stores item indices only; callers keep the items and test them
//! through a closure. Splits use the surface area heuristic evaluated over a
//! fixed number of centroid buckets, falling back to a median split when the
//! heuristic cannot separate the items.

use crate::shapes::ShapeHit;
use ember_math::{Aabb, Interval, Ray};

/// Leaves never grow beyond this many items.
const LEAF_MAX_SIZE: usize = 4;

/// Centroid buckets evaluated per split.
const SAH_BUCKETS: usize = 12;

/// Cost of one node traversal relative to one item intersection.
const TRAVERSAL_COST: f32 = 0.125;

/// BVH node - either a branch with two children or a leaf with item indices.
#[derive(Debug, Clone)]
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        items: Vec<usize>,
        bbox: Aabb,
    },
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct BuildItem {
    index: usize,
    bbox: Aabb,
    centroid: [f32; 3],
}

#[derive(Clone, Copy)]
struct Bucket {
    count: usize,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a tree over items with the given bounds; item `i` has `bounds[i]`.
    pub fn new(bounds: &[Aabb]) -> Self {
        if bounds.is_empty() {
            return BvhNode::Empty;
        }

        let items = bounds
            .iter()
            .enumerate()
            .map(|(index, bbox)| BuildItem {
                index,
                bbox: *bbox,
                centroid: bbox.centroid().to_array(),
            })
            .collect();

        let root = Self::build(items);
        log::debug!(
            "Built BVH over {} items: {} nodes, depth {}",
            bounds.len(),
            root.node_count(),
            root.depth()
        );
        root
    }

    fn build(mut items: Vec<BuildItem>) -> Self {
        let n = items.len();
        let bbox = items
            .iter()
            .fold(Aabb::EMPTY, |acc, it| Aabb::surrounding(&acc, &it.bbox));

        if n <= LEAF_MAX_SIZE {
            return Self::leaf(items, bbox);
        }

        let centroid_bounds = items.iter().fold(Aabb::EMPTY, |acc, it| {
            acc.include_point(ember_math::Vec3::from_array(it.centroid))
        });
        let axis = centroid_bounds.longest_axis();
        let extent = centroid_bounds.axis_interval(axis);

        // All centroids coincide; nothing to split on
        if extent.size() <= 0.0 {
            return Self::median_split(items, axis, bbox);
        }

        let bucket_of = |it: &BuildItem| -> usize {
            let offset = (it.centroid[axis] - extent.min) / extent.size();
            ((offset * SAH_BUCKETS as f32) as usize).min(SAH_BUCKETS - 1)
        };

        let mut buckets = [Bucket {
            count: 0,
            bbox: Aabb::EMPTY,
        }; SAH_BUCKETS];
        for it in &items {
            let b = &mut buckets[bucket_of(it)];
            b.count += 1;
            b.bbox = Aabb::surrounding(&b.bbox, &it.bbox);
        }

        let parent_area = bbox.surface_area().max(f32::EPSILON);
        let mut best: Option<(usize, f32)> = None;
        for split in 0..SAH_BUCKETS - 1 {
            let (below, above) = buckets.split_at(split + 1);
            let (count_l, box_l) = merge(below);
            let (count_r, box_r) = merge(above);
            if count_l == 0 || count_r == 0 {
                continue;
            }
            let cost = TRAVERSAL_COST
                + (count_l as f32 * box_l.surface_area() + count_r as f32 * box_r.surface_area())
                    / parent_area;
            if best.map_or(true, |(_, c)| cost < c) {
                best = Some((split, cost));
            }
        }

        match best {
            Some((split, _)) => {
                let (left, right): (Vec<_>, Vec<_>) =
                    items.drain(..).partition(|it| bucket_of(it) <= split);
                BvhNode::Branch {
                    left: Box::new(Self::build(left)),
                    right: Box::new(Self::build(right)),
                    bbox,
                }
            }
            None => Self::median_split(items, axis, bbox),
        }
    }

    fn leaf(items: Vec<BuildItem>, bbox: Aabb) -> Self {
        BvhNode::Leaf {
            items: items.into_iter().map(|it| it.index).collect(),
            bbox,
        }
    }

    /// Sort by centroid on `axis` and split the list in half.
    fn median_split(mut items: Vec<BuildItem>, axis: usize, bbox: Aabb) -> Self {
        items.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = items.len() / 2;
        let right = items.split_off(mid);
        BvhNode::Branch {
            left: Box::new(Self::build(items)),
            right: Box::new(Self::build(right)),
            bbox,
        }
    }

    /// Closest hit among the items, testing each candidate with `hit_item`.
    ///
    /// `hit_item` receives the item index and the interval still open for
    /// hits, and must only return hits inside that interval.
    pub fn closest_hit<F>(&self, ray: &Ray, ray_t: Interval, hit_item: &mut F) -> Option<ShapeHit>
    where
        F: FnMut(usize, Interval) -> Option<ShapeHit>,
    {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { items, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<ShapeHit> = None;
                for &index in items {
                    let max = closest.map_or(ray_t.max, |h| h.t);
                    if let Some(hit) = hit_item(index, ray_t.with_max(max)) {
                        closest = Some(hit);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.closest_hit(ray, ray_t, hit_item);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |h| h.t);
                let hit_right = right.closest_hit(ray, ray_t.with_max(right_max), hit_item);

                hit_right.or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

fn merge(buckets: &[Bucket]) -> (usize, Aabb) {
    buckets.iter().fold((0, Aabb::EMPTY), |(count, bbox), b| {
        (count + b.count, Aabb::surrounding(&bbox, &b.bbox))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    fn unit_boxes_along_x(n: usize) -> Vec<Aabb> {
        (0..n)
            .map(|i| {
                let c = Vec3::new(i as f32 * 2.0, 0.0, -5.0);
                Aabb::from_points(c - Vec3::splat(0.5), c + Vec3::splat(0.5))
            })
            .collect()
    }

    /// Slab test against a box, reporting its entry distance.
    fn box_hit(bbox: &Aabb, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        if !bbox.hit(ray, ray_t) {
            return None;
        }
        let t = (bbox.max().z - ray.origin.z) / ray.direction.z;
        ray_t.surrounds(t).then(|| ShapeHit::at(t))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(&[]);
        assert!(matches!(bvh, BvhNode::Empty));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh
            .closest_hit(&ray, Interval::UNIVERSE, &mut |_, _| None)
            .is_none());
    }

    #[test]
    fn test_bvh_small_is_leaf() {
        let bvh = BvhNode::new(&unit_boxes_along_x(3));
        assert!(matches!(bvh, BvhNode::Leaf { .. }));
    }

    #[test]
    fn test_bvh_finds_each_item() {
        let boxes = unit_boxes_along_x(40);
        let bvh = BvhNode::new(&boxes);
        assert!(matches!(bvh, BvhNode::Branch { .. }));
        assert!(bvh.depth() < 40);

        for (i, bbox) in boxes.iter().enumerate() {
            let ray = Ray::new(Vec3::new(bbox.centroid().x, 0.0, 0.0), Vec3::NEG_Z);
            let mut tested = Vec::new();
            let hit = bvh.closest_hit(&ray, Interval::new(1e-4, f32::INFINITY), &mut |idx, t| {
                tested.push(idx);
                box_hit(&boxes[idx], &ray, t).map(|h| ShapeHit { face: idx, ..h })
            });

            let hit = hit.unwrap();
            assert_eq!(hit.face, i);
            assert!((hit.t - 4.5).abs() < 1e-5);
            // Traversal should prune most of the tree
            assert!(tested.len() < boxes.len());
        }
    }

    #[test]
    fn test_bvh_keeps_closest() {
        // Two stacked boxes along the ray; the nearer one must win
        let boxes = vec![
            Aabb::from_points(Vec3::new(-1.0, -1.0, -10.0), Vec3::new(1.0, 1.0, -9.0)),
            Aabb::from_points(Vec3::new(-1.0, -1.0, -4.0), Vec3::new(1.0, 1.0, -3.0)),
        ];
        let mut all = boxes.clone();
        all.extend(unit_boxes_along_x(10).into_iter().map(|b| {
            Aabb::from_points(b.min() + Vec3::new(5.0, 0.0, 0.0), b.max() + Vec3::new(5.0, 0.0, 0.0))
        }));

        let bvh = BvhNode::new(&all);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = bvh
            .closest_hit(&ray, Interval::new(1e-4, f32::INFINITY), &mut |idx, t| {
                box_hit(&all[idx], &ray, t).map(|h| ShapeHit { face: idx, ..h })
            })
            .unwrap();
        assert_eq!(hit.face, 1);
        assert!((hit.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_coincident_centroids() {
        let boxes = vec![Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0)); 9];
        let bvh = BvhNode::new(&boxes);
        assert!(bvh.node_count() > 1);
    }
}
