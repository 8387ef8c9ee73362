//! Integer line rasterization.

/// Core Bresenham loop, valid in the first octant only
/// (`0 <= dy <= dx`, left to right).
fn first_octant(x1: i64, y1: i64, x2: i64, y2: i64, plot: &mut dyn FnMut(i64, i64)) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut y = y1;
    let mut eps = 0_i64;

    for x in x1..=x2 {
        plot(x, y);
        eps += dy;
        if (eps << 1) >= dx {
            y += 1;
            eps -= dx;
        }
    }
}

/// Plot the integer line between two points in any octant.
///
/// The endpoints are reflected and swapped so the core loop always runs
/// in the first octant; the plot callback receives coordinates mapped
/// back to the original frame. Both endpoints are always plotted.
pub(crate) fn draw_line(x1: i64, y1: i64, x2: i64, y2: i64, plot: &mut dyn FnMut(i64, i64)) {
    let dx = x2 - x1;
    let dy = y2 - y1;

    if dx >= 0 && dy >= 0 && dx >= dy {
        // 1st octant
        first_octant(x1, y1, x2, y2, plot);
    } else if dx >= 0 && dy >= 0 {
        // 2nd octant: swap x and y
        first_octant(y1, x1, y2, x2, &mut |x, y| plot(y, x));
    } else if dx < 0 && dy >= 0 && dy > -dx {
        // 3rd octant: swap -x and y
        first_octant(y1, -x1, y2, -x2, &mut |x, y| plot(-y, x));
    } else if dx < 0 && dy >= 0 {
        // 4th octant: negate x
        first_octant(-x1, y1, -x2, y2, &mut |x, y| plot(-x, y));
    } else if dx < 0 && dy < 0 && -dx >= -dy {
        // 5th octant: negate x and y
        first_octant(-x1, -y1, -x2, -y2, &mut |x, y| plot(-x, -y));
    } else if dx < 0 && dy < 0 {
        // 6th octant: swap -x and -y
        first_octant(-y1, -x1, -y2, -x2, &mut |x, y| plot(-y, -x));
    } else if dx >= 0 && dy < 0 && -dy > dx {
        // 7th octant: swap x and -y
        first_octant(-y1, x1, -y2, x2, &mut |x, y| plot(y, -x));
    } else {
        // 8th octant: negate y
        first_octant(x1, -y1, x2, -y2, &mut |x, y| plot(x, -y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(x1: i64, y1: i64, x2: i64, y2: i64) -> Vec<(i64, i64)> {
        let mut pts = Vec::new();
        draw_line(x1, y1, x2, y2, &mut |x, y| pts.push((x, y)));
        pts
    }

    #[test]
    fn single_point() {
        assert_eq!(collect(3, 4, 3, 4), vec![(3, 4)]);
    }

    #[test]
    fn horizontal_both_directions() {
        assert_eq!(collect(0, 0, 3, 0), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        let mut rev = collect(3, 0, 0, 0);
        rev.sort_unstable();
        assert_eq!(rev, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn vertical_both_directions() {
        assert_eq!(collect(1, 0, 1, 3), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
        let mut rev = collect(1, 3, 1, 0);
        rev.sort_unstable();
        assert_eq!(rev, vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn endpoints_plotted_in_all_octants() {
        let targets = [
            (5, 2),
            (2, 5),
            (-2, 5),
            (-5, 2),
            (-5, -2),
            (-2, -5),
            (2, -5),
            (5, -2),
        ];
        for (tx, ty) in targets {
            let pts = collect(0, 0, tx, ty);
            assert!(pts.contains(&(0, 0)), "missing start for ({tx},{ty})");
            assert!(pts.contains(&(tx, ty)), "missing end for ({tx},{ty})");
            // A line never plots more points than its chebyshev length + 1.
            let len = tx.abs().max(ty.abs()) + 1;
            assert_eq!(pts.len() as i64, len, "wrong point count for ({tx},{ty})");
        }
    }

    #[test]
    fn diagonal_is_exact() {
        assert_eq!(collect(0, 0, 3, 3), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn shallow_line_steps_once() {
        let pts = collect(0, 0, 4, 1);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts.first(), Some(&(0, 0)));
        assert_eq!(pts.last(), Some(&(4, 1)));
        // y never exceeds the target
        assert!(pts.iter().all(|&(_, y)| y <= 1));
    }
}
