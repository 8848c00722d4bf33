//! Two-dimensional k-d tree over seed positions
//!
//! Built once per seed configuration and queried for every mask pixel.
//! Equidistant points resolve to the lower input index.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct KdNode {
    /// Index into the point list
    point: usize,
    left: Option<usize>,
    right: Option<usize>,
    /// Split axis (0 = x, 1 = y)
    axis: usize,
}

/// Balanced k-d tree built by median splits
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    points: Vec<[f64; 2]>,
    root: Option<usize>,
}

impl KdTree {
    /// Build a tree over the given points
    ///
    /// Query results are indices into `points`.
    pub fn build(points: &[[f64; 2]]) -> Self {
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build_recursive(points, &mut indices, 0, &mut nodes);

        Self {
            nodes,
            points: points.to_vec(),
            root,
        }
    }

    fn build_recursive(
        points: &[[f64; 2]],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<KdNode>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let axis = depth % 2;
        // Stable sort keeps equal coordinates in input order
        indices.sort_by(|&a, &b| {
            coordinate(points, a, axis).total_cmp(&coordinate(points, b, axis))
        });

        let median = indices.len() / 2;
        let (left_indices, rest) = indices.split_at_mut(median);
        let (&mut point, right_indices) = rest.split_first_mut()?;

        let node_index = nodes.len();
        nodes.push(KdNode {
            point,
            left: None,
            right: None,
            axis,
        });

        let left = Self::build_recursive(points, left_indices, depth + 1, nodes);
        let right = Self::build_recursive(points, right_indices, depth + 1, nodes);

        if let Some(node) = nodes.get_mut(node_index) {
            node.left = left;
            node.right = right;
        }

        Some(node_index)
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Test if the tree holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of an indexed point
    pub fn point(&self, index: usize) -> Option<[f64; 2]> {
        self.points.get(index).copied()
    }

    /// Index of the point closest to `query`
    ///
    /// Returns `None` only for an empty tree.
    pub fn nearest(&self, query: [f64; 2]) -> Option<usize> {
        let mut best = None;
        if let Some(root) = self.root {
            self.nearest_recursive(root, query, &mut best);
        }
        best.map(|(index, _)| index)
    }

    fn nearest_recursive(
        &self,
        node_index: usize,
        query: [f64; 2],
        best: &mut Option<(usize, f64)>,
    ) {
        let Some(node) = self.nodes.get(node_index) else {
            return;
        };
        let Some(&point) = self.points.get(node.point) else {
            return;
        };

        let distance = distance_squared(query, point);
        let improves = best.is_none_or(|(index, best_distance)| {
            closer((node.point, distance), (index, best_distance))
        });
        if improves {
            *best = Some((node.point, distance));
        }

        let diff = axis_value(query, node.axis) - axis_value(point, node.axis);
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.nearest_recursive(near, query, best);
        }

        // Equal distance may still hide a lower-index tie on the far side
        let bound = best.map_or(f64::INFINITY, |(_, d)| d);
        if let Some(far) = far
            && diff * diff <= bound
        {
            self.nearest_recursive(far, query, best);
        }
    }

    /// Indices of the `k` closest points, nearest first
    ///
    /// Returns fewer than `k` indices when the tree is smaller than `k`.
    pub fn k_nearest(&self, query: [f64; 2], k: usize) -> Vec<usize> {
        if k == 0 {
            return Vec::new();
        }

        let mut found = Vec::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.k_nearest_recursive(root, query, k, &mut found);
        }
        found.into_iter().map(|(index, _)| index).collect()
    }

    fn k_nearest_recursive(
        &self,
        node_index: usize,
        query: [f64; 2],
        k: usize,
        found: &mut Vec<(usize, f64)>,
    ) {
        let Some(node) = self.nodes.get(node_index) else {
            return;
        };
        let Some(&point) = self.points.get(node.point) else {
            return;
        };

        let candidate = (node.point, distance_squared(query, point));
        let position = found.partition_point(|&entry| closer(entry, candidate));
        if position < k {
            found.insert(position, candidate);
            found.truncate(k);
        }

        let diff = axis_value(query, node.axis) - axis_value(point, node.axis);
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.k_nearest_recursive(near, query, k, found);
        }

        let bound = if found.len() < k {
            f64::INFINITY
        } else {
            found.last().map_or(f64::INFINITY, |&(_, d)| d)
        };
        if let Some(far) = far
            && diff * diff <= bound
        {
            self.k_nearest_recursive(far, query, k, found);
        }
    }
}

/// Order by distance, then by index
fn closer(a: (usize, f64), b: (usize, f64)) -> bool {
    match a.1.total_cmp(&b.1) {
        Ordering::Less => true,
        Ordering::Equal => a.0 < b.0,
        Ordering::Greater => false,
    }
}

fn coordinate(points: &[[f64; 2]], index: usize, axis: usize) -> f64 {
    points.get(index).map_or(0.0, |&p| axis_value(p, axis))
}

const fn axis_value(point: [f64; 2], axis: usize) -> f64 {
    if axis == 0 { point[0] } else { point[1] }
}

/// Squared Euclidean distance between two points
pub fn distance_squared(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.mul_add(dx, dy * dy)
}
