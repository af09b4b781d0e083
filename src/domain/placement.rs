// Placement engine - first-fit search for a free grid origin
use super::widget::{Footprint, GridRect};
use std::collections::HashSet;

/// Grid origin of a placed widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: u32,
    pub y: u32,
}

/// Find the first origin, scanning rows top to bottom and columns left to
/// right, where `footprint` overlaps none of `existing`.
///
/// Rows are scanned up to `max_rows`. When nothing fits the widget is
/// appended below all current content at `x = 0`, so placement never fails.
pub fn place(existing: &[GridRect], footprint: Footprint, columns: u32, max_rows: u32) -> Origin {
    if footprint.w <= columns {
        for y in 0..max_rows {
            for x in 0..=(columns - footprint.w) {
                let candidate = GridRect::new(x, y, footprint.w, footprint.h);
                if !existing.iter().any(|rect| rect.overlaps(&candidate)) {
                    return Origin { x, y };
                }
            }
        }
    }

    let bottom = existing.iter().map(GridRect::bottom).max().unwrap_or(0);
    tracing::debug!(
        "No free cell for {}x{} within {} rows, appending at row {}",
        footprint.w,
        footprint.h,
        max_rows,
        bottom
    );
    Origin { x: 0, y: bottom }
}

/// Push rectangles down until none overlap.
///
/// Rectangles listed in `pinned` (indices into `rects`) settle first, in the
/// order of their first mention; the rest settle top to bottom. A rectangle
/// that collides with one already settled moves to that rectangle's bottom
/// edge. Every index settles exactly once. Returns the indices of rectangles
/// that moved.
pub fn resolve_collisions(rects: &mut [GridRect], pinned: &[usize]) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(rects.len());
    let mut order: Vec<usize> = pinned
        .iter()
        .copied()
        .filter(|i| *i < rects.len() && seen.insert(*i))
        .collect();
    let mut rest: Vec<usize> = (0..rects.len()).filter(|i| !seen.contains(i)).collect();
    rest.sort_by_key(|i| (rects[*i].y, rects[*i].x, *i));
    order.extend(rest);

    let mut settled: Vec<usize> = Vec::with_capacity(rects.len());
    let mut moved = Vec::new();
    for idx in order {
        let start_y = rects[idx].y;
        // idx is never in `settled` and bottom() saturates, so y only grows
        // until nothing below it can overlap
        while let Some(hit) = settled.iter().find(|j| rects[**j].overlaps(&rects[idx])) {
            rects[idx].y = rects[*hit].bottom();
        }
        if rects[idx].y != start_y {
            moved.push(idx);
        }
        settled.push(idx);
    }
    moved
}
