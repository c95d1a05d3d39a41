//! Turning raw crossings into fill-rule-resolved ones.

use crate::active::Crossing;
use crate::edge::CrossingKind;
use crate::FillRule;

/// Resolves a sorted crossing list under `rule`, appending the surviving
/// x coordinates to `out` (cleared first).
///
/// Odd-even keeps every crossing: consecutive pairs delimit inside runs,
/// and the paired corner emissions are exactly what keeps the pairing
/// aligned at touching vertices. Non-zero folds the list with a running
/// winding count and keeps the x coordinates where insideness flips;
/// corner pairs contribute +1 then -1, so they cancel inside filled spans
/// and collapse to a zero-width span outside them.
pub(crate) fn resolve(rule: FillRule, crossings: &[Crossing], out: &mut Vec<f32>) {
    out.clear();
    match rule {
        FillRule::EvenOdd => out.extend(crossings.iter().map(|c| c.x)),
        FillRule::NonZero => {
            let mut winding = 0i32;
            let mut corner_phase = true;
            for crossing in crossings {
                let delta = match crossing.kind {
                    CrossingKind::Up => 1,
                    CrossingKind::Down => -1,
                    CrossingKind::Corner => {
                        let delta = if corner_phase { 1 } else { -1 };
                        corner_phase = !corner_phase;
                        delta
                    }
                };
                let was_inside = winding != 0;
                winding += delta;
                if was_inside != (winding != 0) {
                    out.push(crossing.x);
                }
            }
            // Up and down crossings balance on every line of a closed
            // multipolygon, and corners pair up.
            debug_assert_eq!(winding, 0);
        }
    }
}
