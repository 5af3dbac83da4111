/// Below this length insertion sort is used instead of merging.
const INSERTION_SORT_THRESHOLD: usize = 16;

/// Stable merge sort driven by a strict "goes before" predicate.
/// - `is_less(a, b)` returns true when `a` must be placed before `b`
/// - Equal elements (neither goes before the other) keep their input order
///
/// Unlike `slice::sort_by`, the predicate does not need to be a total order:
/// tolerance-based comparisons (e.g. floats equal within an epsilon) are
/// fine. The result is deterministic and the sort never panics.
///
/// Complexity: O(n log n) comparisons, O(n) extra memory
pub fn stable_sort_by<T, F>(items: &mut Vec<T>, is_less: F)
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= 1 {
        return;
    }
    let sorted = merge_sort(std::mem::take(items), &is_less);
    *items = sorted;
}

fn merge_sort<T, F>(mut items: Vec<T>, is_less: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= INSERTION_SORT_THRESHOLD {
        insertion_sort(&mut items, is_less);
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, is_less);
    let right = merge_sort(right, is_less);
    merge(left, right, is_less)
}

/// Merge two sorted runs; on ties the left run wins (stability).
fn merge<T, F>(left: Vec<T>, right: Vec<T>, is_less: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut l = left.into_iter().peekable();
    let mut r = right.into_iter().peekable();
    loop {
        let take_right = match (l.peek(), r.peek()) {
            (Some(a), Some(b)) => is_less(b, a),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { r.next() } else { l.next() };
        out.extend(next);
    }
    out
}

/// Tiny insertion sort for small n.
#[inline(always)]
fn insertion_sort<T, F>(items: &mut [T], is_less: &F)
where
    F: Fn(&T, &T) -> bool,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && is_less(&items[j], &items[j - 1]) {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}
