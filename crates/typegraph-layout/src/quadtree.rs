//! Barnes-Hut quadtree for O(n log n) force approximation.
//!
//! The quadtree recursively subdivides space and computes the weighted
//! centroid of each cell. Distant cells can be approximated as single points,
//! reducing the O(n²) pairwise force calculation to O(n log n).
//!
//! Cells live in a flat arena. Every cell owns a contiguous run of the point
//! order, so the points under any cell (leaf or not) are a single slice.

/// One square cell of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub y0: f64,
    /// Side length (cells are square).
    pub width: f64,
    /// Centroid, weighted by absolute point weight.
    pub cx: f64,
    pub cy: f64,
    /// Sum of point weights (signed).
    pub weight: f64,
    /// Number of points under this cell.
    pub count: usize,
    /// Child cells by quadrant: top-left, top-right, bottom-left, bottom-right.
    pub children: [Option<usize>; 4],
    start: usize,
    end: usize,
}

impl Cell {
    pub fn x1(&self) -> f64 {
        self.x0 + self.width
    }

    pub fn y1(&self) -> f64 {
        self.y0 + self.width
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A Barnes-Hut quadtree over a fixed set of points.
#[derive(Debug, Clone, Default)]
pub struct QuadTree {
    cells: Vec<Cell>,
    /// Point indices, grouped so each cell covers `order[start..end]`.
    order: Vec<usize>,
    /// Position of each point within `order`.
    slot: Vec<usize>,
    points: Vec<(f64, f64)>,
}

impl QuadTree {
    /// Depth cap used by the built-in forces.
    pub const DEFAULT_MAX_DEPTH: usize = 16;

    /// Build a quadtree where every point weighs 1.
    ///
    /// # Arguments
    /// * `points` - Point positions
    /// * `max_depth` - Maximum tree depth; coincident points share a leaf there
    pub fn build(points: &[(f64, f64)], max_depth: usize) -> Self {
        Self::build_weighted(points, &[], max_depth)
    }

    /// Build a quadtree with per-point weights. Missing weights count as 1.
    pub fn build_weighted(points: &[(f64, f64)], weights: &[f64], max_depth: usize) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        // Find bounding box with some padding
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let padding = ((max_x - min_x).max(max_y - min_y) * 0.1).max(1.0);
        min_x -= padding;
        min_y -= padding;
        max_x += padding;
        max_y += padding;

        // Make it square
        let width = (max_x - min_x).max(max_y - min_y);
        let center_x = (min_x + max_x) / 2.0;
        let center_y = (min_y + max_y) / 2.0;

        let mut tree = Self {
            cells: Vec::with_capacity(points.len() * 2),
            order: (0..points.len()).collect(),
            slot: vec![0; points.len()],
            points: points.to_vec(),
        };

        let mut builder = TreeBuilder {
            tree: &mut tree,
            weights,
            max_depth,
        };
        builder.build_cell(
            0,
            points.len(),
            center_x - width / 2.0,
            center_y - width / 2.0,
            width,
            0,
        );

        for (slot, &point) in tree.order.iter().enumerate() {
            tree.slot[point] = slot;
        }
        tree
    }

    /// The cell covering every point, if there are any.
    pub fn root(&self) -> Option<&Cell> {
        self.cells.first()
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> (f64, f64) {
        self.points[index]
    }

    /// Indices of the points under `cell`.
    pub fn points(&self, cell: &Cell) -> &[usize] {
        &self.order[cell.start..cell.end]
    }

    /// Check if point `index` lies under `cell`.
    pub fn contains_point(&self, cell: &Cell, index: usize) -> bool {
        self.slot
            .get(index)
            .is_some_and(|&slot| (cell.start..cell.end).contains(&slot))
    }

    /// Visit cells in pre-order. Children of a cell are visited only when
    /// `f` returns `true` for it.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&Cell) -> bool,
    {
        let mut stack = Vec::with_capacity(32);
        if !self.cells.is_empty() {
            stack.push(0);
        }
        while let Some(index) = stack.pop() {
            let cell = &self.cells[index];
            if f(cell) {
                stack.extend(cell.children.iter().rev().flatten());
            }
        }
    }
}

struct TreeBuilder<'a> {
    tree: &'a mut QuadTree,
    weights: &'a [f64],
    max_depth: usize,
}

impl TreeBuilder<'_> {
    fn weight(&self, point: usize) -> f64 {
        self.weights.get(point).copied().unwrap_or(1.0)
    }

    fn build_cell(&mut self, start: usize, end: usize, x: f64, y: f64, width: f64, depth: usize) -> usize {
        let cell_idx = self.tree.cells.len();

        // Compute weighted centroid
        let mut weight = 0.0;
        let mut abs_weight = 0.0;
        let (mut wx, mut wy) = (0.0, 0.0);
        let (mut sx, mut sy) = (0.0, 0.0);
        for &i in &self.tree.order[start..end] {
            let (px, py) = self.tree.points[i];
            let w = self.weight(i);
            weight += w;
            abs_weight += w.abs();
            wx += w.abs() * px;
            wy += w.abs() * py;
            sx += px;
            sy += py;
        }
        let count = end - start;
        let (cx, cy) = if abs_weight > 0.0 {
            (wx / abs_weight, wy / abs_weight)
        } else {
            (sx / count as f64, sy / count as f64)
        };

        self.tree.cells.push(Cell {
            x0: x,
            y0: y,
            width,
            cx,
            cy,
            weight,
            count,
            children: [None; 4],
            start,
            end,
        });

        // If leaf (single point or max depth), store as leaf
        if count == 1 || depth >= self.max_depth {
            return cell_idx;
        }

        // Subdivide into quadrants
        let half = width / 2.0;
        let mid_x = x + half;
        let mid_y = y + half;

        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for &i in &self.tree.order[start..end] {
            let (px, py) = self.tree.points[i];
            let q = usize::from(px >= mid_x) | (usize::from(py >= mid_y) << 1);
            quadrants[q].push(i);
        }

        // Rewrite this cell's run so each quadrant is contiguous
        let mut offset = start;
        let mut ranges = [(0, 0); 4];
        for (q, members) in quadrants.iter().enumerate() {
            self.tree.order[offset..offset + members.len()].copy_from_slice(members);
            ranges[q] = (offset, offset + members.len());
            offset += members.len();
        }

        // Recursively build children
        let mut children = [None; 4];
        for (q, &(s, e)) in ranges.iter().enumerate() {
            if s == e {
                continue;
            }
            let child_x = if q & 1 == 1 { mid_x } else { x };
            let child_y = if q & 2 == 2 { mid_y } else { y };
            children[q] = Some(self.build_cell(s, e, child_x, child_y, half, depth + 1));
        }
        self.tree.cells[cell_idx].children = children;

        cell_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]
    }

    #[test]
    fn test_empty_tree() {
        let tree = QuadTree::build(&[], 10);
        assert!(tree.root().is_none());
        let mut visited = 0;
        tree.visit(|_| {
            visited += 1;
            true
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_single_node() {
        let tree = QuadTree::build(&[(3.0, 4.0)], 10);
        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.count, 1);
        assert_eq!((root.cx, root.cy), (3.0, 4.0));
    }

    #[test]
    fn test_multiple_nodes_one_per_quadrant() {
        let tree = QuadTree::build(&corners(), 10);
        let root = tree.root().unwrap();
        assert_eq!(root.count, 4);
        assert_eq!(root.weight, 4.0);
        assert!((root.cx - 50.0).abs() < 1e-9 && (root.cy - 50.0).abs() < 1e-9);

        // (0,0) top-left, (100,0) top-right, (0,100) bottom-left, (100,100) bottom-right
        for (q, expected) in corners().into_iter().enumerate() {
            let child = tree.cell(root.children[q].unwrap()).unwrap();
            assert!(child.is_leaf());
            assert_eq!(tree.point(tree.points(child)[0]), expected);
        }
    }

    #[test]
    fn test_points_stay_inside_cells() {
        let points: Vec<(f64, f64)> = (0..50)
            .map(|i| {
                let t = i as f64 * 0.7;
                (t.cos() * i as f64, t.sin() * i as f64)
            })
            .collect();
        let tree = QuadTree::build(&points, QuadTree::DEFAULT_MAX_DEPTH);
        tree.visit(|cell| {
            for &p in tree.points(cell) {
                let (x, y) = tree.point(p);
                assert!(x >= cell.x0 && x <= cell.x1() && y >= cell.y0 && y <= cell.y1());
            }
            true
        });
        assert_eq!(tree.root().unwrap().count, 50);
    }

    #[test]
    fn test_coincident_points_share_leaf() {
        let tree = QuadTree::build(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)], 8);
        let mut leaves = Vec::new();
        tree.visit(|cell| {
            if cell.is_leaf() {
                leaves.push(cell.count);
            }
            true
        });
        assert_eq!(leaves, vec![3]);
    }

    #[test]
    fn test_weighted_centroid() {
        let tree = QuadTree::build_weighted(&[(0.0, 0.0), (10.0, 0.0)], &[-3.0, -1.0], 10);
        let root = tree.root().unwrap();
        assert_eq!(root.weight, -4.0);
        assert!((root.cx - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_visit_prunes_children() {
        let tree = QuadTree::build(&corners(), 10);
        let mut visited = 0;
        tree.visit(|_| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
        assert!(tree.contains_point(tree.root().unwrap(), 3));
    }

    #[test]
    fn test_theta_approximation_matches_brute_force() {
        // inverse-distance field at a point just outside a sunflower disk
        let points: Vec<(f64, f64)> = (0..200)
            .map(|i| {
                let t = i as f64 * 2.399_963;
                let r = (i as f64).sqrt() * 3.0;
                (r * t.cos(), r * t.sin())
            })
            .collect();
        let tree = QuadTree::build(&points, QuadTree::DEFAULT_MAX_DEPTH);
        let sample = (60.0, 10.0);
        let theta2 = 0.9 * 0.9;

        let field = |x: f64, y: f64, w: f64| {
            let (dx, dy) = (x - sample.0, y - sample.1);
            let l = dx * dx + dy * dy;
            (dx * w / l, dy * w / l)
        };

        let (mut ax, mut ay) = (0.0, 0.0);
        let mut approximated = 0;
        tree.visit(|cell| {
            let (dx, dy) = (cell.cx - sample.0, cell.cy - sample.1);
            if cell.width * cell.width / theta2 < dx * dx + dy * dy {
                let (fx, fy) = field(cell.cx, cell.cy, cell.weight);
                ax += fx;
                ay += fy;
                approximated += 1;
                return false;
            }
            if cell.is_leaf() {
                for &p in tree.points(cell) {
                    let (fx, fy) = field(tree.point(p).0, tree.point(p).1, 1.0);
                    ax += fx;
                    ay += fy;
                }
            }
            true
        });

        let (bx, by) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(x, y)| {
                let (fx, fy) = field(x, y, 1.0);
                (sx + fx, sy + fy)
            });

        assert!(approximated > 1);
        let error = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
        let magnitude = (bx * bx + by * by).sqrt();
        assert!(error / magnitude < 0.1, "relative error {}", error / magnitude);
    }
}
