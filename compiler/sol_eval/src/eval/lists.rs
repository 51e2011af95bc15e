//! List helpers shared by indexing, `tail`, `for .. in`, pattern
//! matching and indexed assignment.
//!
//! An implied continuation (the tail of an end-elliptic list, or the gap
//! opened by assigning past the end of a list) counts up by one from a
//! trailing integer constant and repeats any other trailing element.

use sol_ir::Thing;
use sol_num::{Float, Integer, MIN_PRECISION};

/// The element `steps` positions after `last` in an implied continuation.
pub fn continue_sequence(last: &Thing, steps: usize) -> Thing {
    if let Some(c) = last.as_constant() {
        if c.is_integer() {
            if let Some(n) = c.to_integer() {
                let next = n + Integer::from(steps);
                let bits = next.significant_bits().max(c.prec()).max(MIN_PRECISION);
                return Thing::Constant(Float::with_val(bits, &next));
            }
        }
    }
    last.clone()
}

/// Element `index` of an end-elliptic list.
pub fn elliptic_element(items: &[Thing], index: usize) -> Option<Thing> {
    if let Some(item) = items.get(index) {
        return Some(item.clone());
    }
    let last = items.last()?;
    Some(continue_sequence(last, index + 1 - items.len()))
}

/// The first `len` elements of an end-elliptic list, materializing the
/// continuation where needed.
pub fn materialize(items: &[Thing], len: usize) -> Vec<Thing> {
    (0..len.max(items.len()))
        .filter_map(|i| elliptic_element(items, i))
        .collect()
}

/// `tail` of an end-elliptic list: still end-elliptic.
pub fn elliptic_tail(items: &[Thing]) -> Vec<Thing> {
    match items {
        [] => Vec::new(),
        [last] => vec![continue_sequence(last, 1)],
        [_, rest @ ..] => rest.to_vec(),
    }
}

/// Extend `items` so that it has `len` elements, filling from the current
/// last element. Returns `false` when there is nothing to continue from.
pub fn grow_to(items: &mut Vec<Thing>, len: usize) -> bool {
    if items.len() >= len {
        return true;
    }
    let Some(last) = items.last().cloned() else {
        return false;
    };
    let start = items.len();
    for i in start..len {
        items.push(continue_sequence(&last, i + 1 - start));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Thing> {
        values.iter().copied().map(Thing::integer).collect()
    }

    #[test]
    fn integer_continuations_count_up() {
        let items = ints(&[1, 5]);
        assert_eq!(elliptic_element(&items, 3).and_then(|t| t.as_integer()), Some(7));
    }

    #[test]
    fn other_continuations_repeat() {
        let items = vec![Thing::string("a")];
        assert_eq!(elliptic_element(&items, 4), Some(Thing::string("a")));
    }

    #[test]
    fn growth_fills_gaps_by_increment() {
        let mut items = ints(&[1, 2]);
        assert!(grow_to(&mut items, 5));
        let values: Vec<_> = items.iter().filter_map(Thing::as_integer).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn growth_of_empty_list_fails() {
        let mut items = Vec::new();
        assert!(!grow_to(&mut items, 2));
    }

    #[test]
    fn tail_of_singleton_elliptic_list_advances() {
        let tail = elliptic_tail(&ints(&[4]));
        assert_eq!(tail, vec![continue_sequence(&Thing::integer(4), 1)]);
        assert_eq!(tail[0].as_integer(), Some(5));
    }
}
