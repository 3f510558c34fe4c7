//! Intervalles semi-ouverts `[start, end)` et opérations ensemblistes
//! (union, découpage, différence) sur des listes triées.
//!
//! Générique sur tout type ordonné : aucune dépendance au domaine des
//! plannings.

/// Intervalle semi-ouvert, toujours non vide (`start < end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

impl<T: Ord + Copy> Interval<T> {
    /// `None` si l'intervalle serait vide.
    pub fn new(start: T, end: T) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn contains(&self, at: T) -> bool {
        self.start <= at && at < self.end
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection avec `bounds`.
    pub fn clip(&self, bounds: &Self) -> Option<Self> {
        Self::new(self.start.max(bounds.start), self.end.min(bounds.end))
    }
}

/// Union minimale : tri par début puis fusion des intervalles qui se
/// chevauchent ou se touchent. Le résultat est trié et disjoint.
pub fn union<T, I>(intervals: I) -> Vec<Interval<T>>
where
    T: Ord + Copy,
    I: IntoIterator<Item = Interval<T>>,
{
    let mut sorted: Vec<Interval<T>> = intervals.into_iter().collect();
    sorted.sort_by_key(|iv| iv.start);

    let mut out: Vec<Interval<T>> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        match out.last_mut() {
            Some(last) if iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => out.push(iv),
        }
    }
    out
}

/// Différence `base \ holes`. Un trou strictement intérieur coupe un
/// intervalle en deux restes.
pub fn subtract<T: Ord + Copy>(base: &[Interval<T>], holes: &[Interval<T>]) -> Vec<Interval<T>> {
    let base = union(base.iter().copied());
    let holes = union(holes.iter().copied());

    let mut out = Vec::with_capacity(base.len());
    let mut first_hole = 0usize;
    for iv in base {
        let mut cursor = iv.start;
        while first_hole < holes.len() && holes[first_hole].end <= cursor {
            first_hole += 1;
        }
        for hole in holes[first_hole..].iter().take_while(|h| h.start < iv.end) {
            if hole.start > cursor {
                out.push(Interval {
                    start: cursor,
                    end: hole.start,
                });
            }
            cursor = cursor.max(hole.end);
        }
        if cursor < iv.end {
            out.push(Interval {
                start: cursor,
                end: iv.end,
            });
        }
    }
    out
}

/// Découpe chaque intervalle sur `bounds`, en écartant ceux qui tombent dehors.
pub fn clip_all<T, I>(intervals: I, bounds: &Interval<T>) -> Vec<Interval<T>>
where
    T: Ord + Copy,
    I: IntoIterator<Item = Interval<T>>,
{
    intervals
        .into_iter()
        .filter_map(|iv| iv.clip(bounds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i32, end: i32) -> Interval<i32> {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn empty_interval_is_rejected() {
        assert!(Interval::new(3, 3).is_none());
        assert!(Interval::new(4, 3).is_none());
    }

    #[test]
    fn union_merges_overlapping_and_touching() {
        let merged = union(vec![iv(5, 8), iv(0, 2), iv(1, 3), iv(3, 4), iv(10, 12)]);
        assert_eq!(merged, vec![iv(0, 4), iv(5, 8), iv(10, 12)]);
    }

    #[test]
    fn union_absorbs_nested_intervals() {
        assert_eq!(union(vec![iv(0, 10), iv(2, 3), iv(4, 9)]), vec![iv(0, 10)]);
    }

    #[test]
    fn subtract_splits_around_inner_hole() {
        assert_eq!(subtract(&[iv(0, 10)], &[iv(4, 6)]), vec![iv(0, 4), iv(6, 10)]);
    }

    #[test]
    fn subtract_trims_edges_and_spans() {
        let base = [iv(0, 5), iv(8, 12), iv(20, 30)];
        let holes = [iv(-2, 1), iv(4, 9), iv(11, 25)];
        assert_eq!(subtract(&base, &holes), vec![iv(1, 4), iv(9, 11), iv(25, 30)]);
    }

    #[test]
    fn subtract_without_overlap_is_identity() {
        let base = [iv(0, 5), iv(10, 15)];
        assert_eq!(subtract(&base, &[iv(5, 10)]), base.to_vec());
        assert_eq!(subtract(&base, &[]), base.to_vec());
    }

    #[test]
    fn subtract_everything_leaves_nothing() {
        assert!(subtract(&[iv(2, 4), iv(6, 8)], &[iv(0, 10)]).is_empty());
    }

    #[test]
    fn clip_all_drops_outside() {
        let bounds = iv(5, 10);
        let clipped = clip_all(vec![iv(0, 6), iv(7, 8), iv(9, 20), iv(10, 11)], &bounds);
        assert_eq!(clipped, vec![iv(5, 6), iv(7, 8), iv(9, 10)]);
    }
}
