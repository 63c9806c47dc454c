//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over a fixed set of shapes, built once per scene. Nodes
//! live in a flat arena and refer to their children by index, so the whole
//! tree is released with a single deallocation.
//!
//! Construction picks a random split axis at every level and partitions
//! the shapes around the median of their bounding-box minima on that axis.

use std::fmt;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};

use crate::error::{SceneError, SceneResult};
use crate::random;
use crate::shape::{HitRecord, Shape};

/// Node in the arena.
#[derive(Debug, Clone, Copy)]
enum BvhNode {
    /// Single shape, by index into `Bvh::shapes`.
    Leaf { shape: usize, bbox: Aabb },
    /// Internal node. `left == right` when the node covers one shape.
    Branch { left: usize, right: usize, bbox: Aabb },
}

impl BvhNode {
    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Bounding volume hierarchy over shared shapes.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    shapes: Vec<Arc<dyn Shape>>,
    root: usize,
}

impl Bvh {
    /// Build a hierarchy over `shapes`.
    ///
    /// Fails if the list is empty or if any shape has no bounding box.
    pub fn build(shapes: Vec<Arc<dyn Shape>>) -> SceneResult<Self> {
        if shapes.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let mut items = shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| {
                shape
                    .bounding_box()
                    .map(|bbox| (index, bbox))
                    .ok_or(SceneError::MissingBoundingBox { index })
            })
            .collect::<SceneResult<Vec<_>>>()?;

        let mut nodes = Vec::with_capacity(2 * items.len());
        let root = Self::build_subtree(&mut nodes, &mut items);

        log::debug!(
            "Built BVH: {} shapes, {} nodes",
            shapes.len(),
            nodes.len()
        );

        Ok(Self {
            nodes,
            shapes,
            root,
        })
    }

    /// Recursive construction over `items`. Returns the index of the new node.
    fn build_subtree(nodes: &mut Vec<BvhNode>, items: &mut [(usize, Aabb)]) -> usize {
        let axis = random::gen_index(3);
        let key = |item: &(usize, Aabb)| item.1.axis_interval(axis).min;

        let (left, right) = match items.len() {
            1 => {
                let leaf = Self::push_leaf(nodes, items[0]);
                (leaf, leaf)
            }
            2 => {
                if key(&items[1]) < key(&items[0]) {
                    items.swap(0, 1);
                }
                (
                    Self::push_leaf(nodes, items[0]),
                    Self::push_leaf(nodes, items[1]),
                )
            }
            n => {
                // Partition only; neither half needs to be sorted.
                let mid = n / 2;
                items.select_nth_unstable_by(mid, |a, b| key(a).total_cmp(&key(b)));

                let (lower, upper) = items.split_at_mut(mid);
                (
                    Self::build_subtree(nodes, lower),
                    Self::build_subtree(nodes, upper),
                )
            }
        };

        let bbox = Aabb::surrounding(&nodes[left].bbox(), &nodes[right].bbox());
        nodes.push(BvhNode::Branch { left, right, bbox });
        nodes.len() - 1
    }

    fn push_leaf(nodes: &mut Vec<BvhNode>, (shape, bbox): (usize, Aabb)) -> usize {
        nodes.push(BvhNode::Leaf { shape, bbox });
        nodes.len() - 1
    }

    /// Number of shapes in the hierarchy.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of nodes in the arena (leaves and branches).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn hit_node<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
    ) -> bool {
        match self.nodes[index] {
            BvhNode::Leaf { shape, bbox } => {
                bbox.hit(ray, ray_t) && self.shapes[shape].hit(ray, ray_t, rec)
            }
            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = self.hit_node(left, ray, ray_t, rec);
                if left == right {
                    return hit_left;
                }

                // Only check right up to closest hit
                let right_t = if hit_left { ray_t.with_max(rec.t) } else { ray_t };
                let hit_right = self.hit_node(right, ray, right_t, rec);

                hit_left || hit_right
            }
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, index: usize, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        match self.nodes[index] {
            BvhNode::Leaf { shape, bbox } => writeln!(
                f,
                "{:indent$}leaf shape={} bbox=[{} .. {}]",
                "",
                shape,
                bbox.min(),
                bbox.max()
            ),
            BvhNode::Branch { left, right, bbox } => {
                writeln!(
                    f,
                    "{:indent$}branch bbox=[{} .. {}]",
                    "",
                    bbox.min(),
                    bbox.max()
                )?;
                self.fmt_node(f, left, depth + 1)?;
                if right != left {
                    self.fmt_node(f, right, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl Shape for Bvh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.hit_node(self.root, ray, ray_t, rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.nodes[self.root].bbox())
    }
}

/// Indented dump of the tree, one node per line.
impl fmt::Display for Bvh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::shape::ShapeList;
    use crate::sphere::Sphere;
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Shape with no bounds.
    struct Plane;

    impl Shape for Plane {
        fn hit<'a>(&'a self, _ray: &Ray, _ray_t: Interval, _rec: &mut HitRecord<'a>) -> bool {
            false
        }

        fn bounding_box(&self) -> Option<Aabb> {
            None
        }
    }

    fn material_addr(material: &dyn Material) -> *const () {
        material as *const dyn Material as *const ()
    }

    fn random_spheres(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Shape>> {
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let albedo = Vec3::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Sphere::new(
                    center,
                    rng.gen_range(0.2..1.5),
                    Arc::new(Lambertian::from_color(albedo)),
                )) as Arc<dyn Shape>
            })
            .collect()
    }

    fn unit_sphere_at(center: Vec3) -> Arc<dyn Shape> {
        Arc::new(Sphere::new(
            center,
            1.0,
            Arc::new(Lambertian::from_color(Vec3::splat(0.5))),
        ))
    }

    #[test]
    fn test_bvh_empty_is_error() {
        assert!(matches!(Bvh::build(vec![]), Err(SceneError::EmptyScene)));
    }

    #[test]
    fn test_bvh_missing_bbox_is_error() {
        let shapes: Vec<Arc<dyn Shape>> = vec![unit_sphere_at(Vec3::ZERO), Arc::new(Plane)];
        assert!(matches!(
            Bvh::build(shapes),
            Err(SceneError::MissingBoundingBox { index: 1 })
        ));
    }

    #[test]
    fn test_bvh_single_shape() {
        let bvh = Bvh::build(vec![unit_sphere_at(Vec3::new(0.0, 0.0, -3.0))]).unwrap();
        assert_eq!(bvh.len(), 1);
        assert_eq!(bvh.node_count(), 2);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_two_shapes_ordered_by_box_min() {
        // Apart on every axis, so the order holds whichever axis is drawn
        for seed in 0..8 {
            random::reseed(seed);
            let shapes = vec![
                unit_sphere_at(Vec3::splat(5.0)),
                unit_sphere_at(Vec3::splat(-5.0)),
            ];
            let bvh = Bvh::build(shapes).unwrap();

            let BvhNode::Branch { left, right, .. } = bvh.nodes[bvh.root] else {
                panic!("root of a two-shape BVH must be a branch");
            };
            assert!(matches!(bvh.nodes[left], BvhNode::Leaf { shape: 1, .. }));
            assert!(matches!(bvh.nodes[right], BvhNode::Leaf { shape: 0, .. }));
            assert!(bvh.nodes[left].bbox().max().cmplt(bvh.nodes[right].bbox().min()).all());
        }
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        random::reseed(42);

        let shapes = random_spheres(&mut rng, 57);
        let list = ShapeList::from(shapes.clone());
        let bvh = Bvh::build(shapes).unwrap();

        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let target = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let ray = Ray::new(origin, target - origin);
            let range = Interval::new(0.001, f32::INFINITY);

            let mut expected = HitRecord::default();
            let mut actual = HitRecord::default();
            let hit_expected = list.hit(&ray, range, &mut expected);
            let hit_actual = bvh.hit(&ray, range, &mut actual);

            assert_eq!(hit_expected, hit_actual);
            if hit_expected {
                assert!((expected.t - actual.t).abs() < 1e-5);
                assert_eq!(
                    material_addr(expected.material),
                    material_addr(actual.material)
                );
            }
        }
    }

    #[test]
    fn test_bvh_node_boxes_contain_children() {
        let mut rng = StdRng::seed_from_u64(7);
        random::reseed(7);

        let bvh = Bvh::build(random_spheres(&mut rng, 33)).unwrap();

        for node in &bvh.nodes {
            if let BvhNode::Branch { left, right, bbox } = node {
                for child in [bvh.nodes[*left].bbox(), bvh.nodes[*right].bbox()] {
                    assert!(bbox.min().cmple(child.min()).all());
                    assert!(bbox.max().cmpge(child.max()).all());
                }
            }
        }
    }

    #[test]
    fn test_bvh_bbox_covers_all_shapes() {
        let shapes = vec![
            unit_sphere_at(Vec3::new(-5.0, 0.0, 0.0)),
            unit_sphere_at(Vec3::new(5.0, 2.0, 0.0)),
            unit_sphere_at(Vec3::new(0.0, -4.0, 3.0)),
        ];
        let bvh = Bvh::build(shapes).unwrap();
        let bbox = bvh.bounding_box().unwrap();

        assert_eq!(bbox.min(), Vec3::new(-6.0, -5.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(6.0, 3.0, 4.0));
    }

    #[test]
    fn test_bvh_display() {
        let shapes = vec![
            unit_sphere_at(Vec3::new(-5.0, 0.0, 0.0)),
            unit_sphere_at(Vec3::new(5.0, 0.0, 0.0)),
        ];
        let dump = Bvh::build(shapes).unwrap().to_string();

        assert!(dump.starts_with("branch"));
        assert_eq!(dump.matches("leaf").count(), 2);
    }
}
