//! The active edge list: the set of edges intersecting the sweep line.

use ordered_float::OrderedFloat;

use crate::edge::{CrossingKind, EdgeIdx, ScanEdge};
use crate::Error;

/// One crossing of the sweep line, before fill-rule resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Crossing {
    pub(crate) x: f32,
    pub(crate) kind: CrossingKind,
}

#[derive(Clone, Copy, Debug)]
struct ActiveEdge {
    idx: EdgeIdx,
    /// Set on the scan line where the edge entered; the edge emits its
    /// `emit0` copies there instead of an interpolated crossing.
    entering: bool,
    /// Set on the scan line matching the edge's `y1`; the edge emits its
    /// `emit1` copies there and is removed at the next compaction.
    leaving: bool,
}

/// An unordered buffer of the edges currently intersecting the sweep line.
///
/// Entering is an append; leaving is a mark plus a deferred compaction, so
/// a marked edge still participates in the scan of the line it leaves on.
#[derive(Clone, Debug, Default)]
pub(crate) struct ActiveEdgeList {
    entries: Vec<ActiveEdge>,
}

impl ActiveEdgeList {
    /// Reserves room for `n` concurrent edges up front, so entering never
    /// allocates mid-sweep.
    pub(crate) fn with_capacity(n: usize) -> Result<Self, Error> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(n).map_err(|_| Error::Allocation)?;
        Ok(ActiveEdgeList { entries })
    }

    pub(crate) fn enter(&mut self, idx: EdgeIdx) {
        self.entries.push(ActiveEdge {
            idx,
            entering: true,
            leaving: false,
        });
    }

    /// Marks an active edge as leaving. The edge count stays small in
    /// practice, so a linear scan beats any indexed structure here.
    pub(crate) fn leave_mark(&mut self, idx: EdgeIdx) {
        for entry in &mut self.entries {
            if entry.idx == idx && !entry.leaving {
                entry.leaving = true;
                return;
            }
        }
        debug_assert!(false, "leave_mark: {:?} is not active", idx);
    }

    /// Removes edges marked as leaving and clears entering flags, keeping
    /// the remaining entries in order.
    pub(crate) fn compact(&mut self) {
        self.entries.retain_mut(|entry| {
            entry.entering = false;
            !entry.leaving
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Computes the crossings of the sweep line at height `y` into `out`,
    /// sorted by x (stable, so paired corner emissions stay adjacent).
    ///
    /// Edges entering at this line emit `emit0` copies of their exact `x0`;
    /// edges leaving emit `emit1` copies of their exact `x1`; every other
    /// active edge contributes one interpolated crossing.
    pub(crate) fn compute_crossings(&self, y: f32, edges: &[ScanEdge], out: &mut Vec<Crossing>) {
        out.clear();
        for entry in &self.entries {
            let edge = &edges[entry.idx.0 as usize];
            if entry.entering {
                debug_assert_eq!(edge.y0(), y);
                emit(out, edge.x0(), edge.emit0(), edge.kind());
            } else if entry.leaving {
                debug_assert_eq!(edge.y1(), y);
                emit(out, edge.x1(), edge.emit1(), edge.kind());
            } else {
                out.push(Crossing {
                    x: edge.x_at(y),
                    kind: edge.kind(),
                });
            }
        }
        out.sort_by_key(|c| OrderedFloat(c.x));
    }
}

fn emit(out: &mut Vec<Crossing>, x: f32, count: u8, kind: CrossingKind) {
    match count {
        0 => {}
        1 => out.push(Crossing { x, kind }),
        _ => {
            // A touching vertex: the pair cancels under the non-zero rule.
            out.push(Crossing {
                x,
                kind: CrossingKind::Corner,
            });
            out.push(Crossing {
                x,
                kind: CrossingKind::Corner,
            });
        }
    }
}
