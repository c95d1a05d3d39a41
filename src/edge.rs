//! Compiling a multipolygon into scan edges.
//!
//! Every non-horizontal pair of ring-consecutive vertices becomes a
//! [`ScanEdge`]: a monotonic-in-y segment with its y extent snapped to the
//! subpixel grid, the x coordinates of both endpoints kept exact, and the
//! data a scanline sweep needs to classify crossings without looking back
//! at the ring. The interesting part is the endpoint bookkeeping: when a
//! sweep line passes exactly through a vertex, how many crossings that
//! vertex produces depends on the two incident edges (and, across a
//! horizontal run, on the edges bounding the run). That topology is encoded
//! once here, into per-edge `emit0`/`emit1` counters, so the scanner's
//! inner loop never re-derives it.

use crate::geom::Point;
use crate::multipolygon::{Multipolygon, Ring};

/// An index into a [`ScanEdgeCollection`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EdgeIdx(pub(crate) u32);

impl std::fmt::Debug for EdgeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e_{}", self.0)
    }
}

/// What a single crossing contributes under the non-zero rule.
///
/// `Corner` marks the paired emissions of a touching vertex; the pair nets
/// zero winding. `Up` and `Down` follow the edge's ring direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CrossingKind {
    /// Half of a same-x pair that cancels in the winding sum.
    Corner,
    /// The boundary heads toward smaller y here.
    Up,
    /// The boundary heads toward larger y here.
    Down,
}

/// A compiled monotonic scan edge. `y0 < y1` always holds; exactly
/// horizontal segments never become scan edges.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanEdge {
    y0: f32,
    y1: f32,
    x0: f32,
    x1: f32,
    slope_inv: f32,
    edge_up: bool,
    emit0: u8,
    emit1: u8,
}

impl ScanEdge {
    /// The snapped sweep-start height.
    pub(crate) fn y0(&self) -> f32 {
        self.y0
    }

    /// The snapped sweep-end height.
    pub(crate) fn y1(&self) -> f32 {
        self.y1
    }

    /// The exact x coordinate at `y0`.
    pub(crate) fn x0(&self) -> f32 {
        self.x0
    }

    /// The exact x coordinate at `y1`.
    pub(crate) fn x1(&self) -> f32 {
        self.x1
    }

    /// True iff the ring traverses this edge from `y1` up to `y0`.
    pub(crate) fn edge_up(&self) -> bool {
        self.edge_up
    }

    /// Crossings to emit when the sweep line sits exactly on `y0`.
    pub(crate) fn emit0(&self) -> u8 {
        self.emit0
    }

    /// Crossings to emit when the sweep line sits exactly on `y1`.
    pub(crate) fn emit1(&self) -> u8 {
        self.emit1
    }

    /// The interpolated x at a sweep height strictly inside `(y0, y1)`.
    pub(crate) fn x_at(&self, y: f32) -> f32 {
        self.x0 + self.slope_inv * (y - self.y0)
    }

    pub(crate) fn kind(&self) -> CrossingKind {
        if self.edge_up {
            CrossingKind::Up
        } else {
            CrossingKind::Down
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EdgeCategory {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy)]
struct RingEdge {
    a: Point,
    b: Point,
    ya: f32,
    yb: f32,
    category: EdgeCategory,
    /// Index of the compiled edge, for the non-horizontal categories.
    scan: Option<usize>,
}

/// The compiled edges of a multipolygon.
#[derive(Debug, Default)]
pub(crate) struct ScanEdgeCollection {
    edges: Vec<ScanEdge>,
}

impl ScanEdgeCollection {
    /// Compiles every ring of `poly`, snapping y coordinates to the grid of
    /// `subsampling` lines per pixel row.
    pub(crate) fn from_multipolygon(poly: &Multipolygon, subsampling: i32) -> Self {
        let snap_factor = subsampling as f32;
        let mut edges = Vec::with_capacity(poly.total_vertex_count());
        for ring in poly.rings() {
            compile_ring(ring, snap_factor, &mut edges);
        }
        ScanEdgeCollection { edges }
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn edges(&self) -> &[ScanEdge] {
        &self.edges
    }
}

impl std::ops::Index<EdgeIdx> for ScanEdgeCollection {
    type Output = ScanEdge;

    fn index(&self, index: EdgeIdx) -> &Self::Output {
        &self.edges[index.0 as usize]
    }
}

fn snap(y: f32, snap_factor: f32) -> f32 {
    (y * snap_factor).round() / snap_factor
}

fn compile_ring(ring: &Ring, snap_factor: f32, edges: &mut Vec<ScanEdge>) {
    let points = ring.points();
    let snapped: Vec<f32> = points.iter().map(|p| snap(p.y, snap_factor)).collect();

    let mut raw: Vec<RingEdge> = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let (a, b) = (points[i], points[j]);
        let (ya, yb) = (snapped[i], snapped[j]);
        let category = if ya == yb {
            if a.x == b.x {
                // Collapsed to a point by snapping; the neighbors become
                // ring-adjacent.
                continue;
            } else if b.x > a.x {
                EdgeCategory::Right
            } else {
                EdgeCategory::Left
            }
        } else if ya > yb {
            EdgeCategory::Up
        } else {
            EdgeCategory::Down
        };
        raw.push(RingEdge {
            a,
            b,
            ya,
            yb,
            category,
            scan: None,
        });
    }

    // Rotate to start on a vertical edge so horizontal runs never wrap,
    // then collapse every maximal horizontal run into one edge directed by
    // its net displacement. A zigzag run that returns to its starting x
    // disappears entirely, making its vertical neighbors ring-adjacent.
    // Without this, a run like right-then-left between two downward edges
    // would be classified as two separate turns and break the crossing
    // parity of its scan line.
    let Some(start) = raw
        .iter()
        .position(|e| matches!(e.category, EdgeCategory::Up | EdgeCategory::Down))
    else {
        return;
    };
    let mut ring_edges: Vec<RingEdge> = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let e = raw[(start + i) % raw.len()];
        if matches!(e.category, EdgeCategory::Up | EdgeCategory::Down) {
            ring_edges.push(e);
            i += 1;
            continue;
        }
        let mut last = e;
        while i + 1 < raw.len() {
            let next = raw[(start + i + 1) % raw.len()];
            if matches!(next.category, EdgeCategory::Up | EdgeCategory::Down) {
                break;
            }
            last = next;
            i += 1;
        }
        i += 1;
        if last.b.x != e.a.x {
            ring_edges.push(RingEdge {
                a: e.a,
                b: last.b,
                ya: e.ya,
                yb: e.ya,
                category: if last.b.x > e.a.x {
                    EdgeCategory::Right
                } else {
                    EdgeCategory::Left
                },
                scan: None,
            });
        }
    }

    for ring_edge in &mut ring_edges {
        // Sweep order: y0 is the smaller snapped endpoint. The x values
        // stay exact; only y is snapped.
        let (y0, x0, y1, x1, edge_up) = match ring_edge.category {
            EdgeCategory::Down => (ring_edge.ya, ring_edge.a.x, ring_edge.yb, ring_edge.b.x, false),
            EdgeCategory::Up => (ring_edge.yb, ring_edge.b.x, ring_edge.ya, ring_edge.a.x, true),
            EdgeCategory::Left | EdgeCategory::Right => continue,
        };
        ring_edge.scan = Some(edges.len());
        edges.push(ScanEdge {
            y0,
            y1,
            x0,
            x1,
            slope_inv: (x1 - x0) / (y1 - y0),
            edge_up,
            emit0: 0,
            emit1: 0,
        });
    }

    apply_vertex_categories(&ring_edges, edges);
}

/// Sets the endpoint emit counters from the category pair at each vertex.
///
/// For a vertex between ring-consecutive edges `f` (incoming) and `t`
/// (outgoing), the total emitted when a sweep line passes exactly through
/// it must be: 1 where the boundary pierces monotonically, 2 where it
/// touches and turns back, and across a horizontal run an odd total
/// exactly when the run is a staircase step. Slots not assigned stay 0;
/// every slot has exactly one governing vertex, so the assignments below
/// never collide.
fn apply_vertex_categories(ring_edges: &[RingEdge], edges: &mut Vec<ScanEdge>) {
    use EdgeCategory::*;

    for i in 0..ring_edges.len() {
        let f = &ring_edges[i];
        let t = &ring_edges[(i + 1) % ring_edges.len()];
        // unwrap: a vertical category always has a compiled edge.
        match (f.category, t.category) {
            (Up, Up) => edges[f.scan.unwrap()].emit0 = 1,
            (Down, Down) => edges[t.scan.unwrap()].emit0 = 1,
            (Up, Down) => edges[f.scan.unwrap()].emit0 = 2,
            (Down, Up) => edges[f.scan.unwrap()].emit1 = 2,
            (Up, Left) => edges[f.scan.unwrap()].emit0 = 2,
            (Up, Right) => edges[f.scan.unwrap()].emit0 = 1,
            (Down, Left) => edges[f.scan.unwrap()].emit1 = 1,
            (Down, Right) => edges[f.scan.unwrap()].emit1 = 2,
            (Left, Up) => edges[t.scan.unwrap()].emit1 = 1,
            (Left, Down) => edges[t.scan.unwrap()].emit0 = 2,
            (Right, Up) => edges[t.scan.unwrap()].emit1 = 2,
            (Right, Down) => edges[t.scan.unwrap()].emit0 = 1,
            (Left | Right, Left | Right) => {}
        }
    }
}
