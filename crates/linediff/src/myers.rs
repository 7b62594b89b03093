//! Shortest edit script via the greedy Myers algorithm.

/// One step of the edit script. Indices refer to records on each side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    /// Records `old` and `new` compare equal.
    Equal { old: usize, new: usize },
    /// Record `old` is absent from the new side.
    Delete { old: usize },
    /// Record `new` is absent from the old side.
    Insert { new: usize },
}

/// Computes a shortest edit script between two record sequences.
///
/// `eq` compares records by index. The script is monotone on both sides
/// and, for replace regions, backtracking yields deletions ahead of
/// insertions.
pub(crate) fn edit_script<F>(old_len: usize, new_len: usize, eq: F) -> Vec<Op>
where
    F: Fn(usize, usize) -> bool,
{
    if old_len == 0 && new_len == 0 {
        return Vec::new();
    }

    let max = old_len + new_len;
    let offset = max as isize;
    let idx = move |k: isize| (k + offset) as usize;
    let mut v = vec![0usize; 2 * max + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();

    for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            // Diagonals of the other parity still hold round d-1 values.
            let mut x = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
                v[idx(k + 1)]
            } else {
                v[idx(k - 1)] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < old_len && y < new_len && eq(x, y) {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x >= old_len && y >= new_len {
                return backtrack(&trace, old_len, new_len, offset);
            }
            k += 2;
        }
    }

    // d = old_len + new_len always reaches the far corner, so the loop
    // cannot fall through; a full rewrite is the trivial backstop.
    full_rewrite(old_len, new_len)
}

fn backtrack(trace: &[Vec<usize>], old_len: usize, new_len: usize, offset: isize) -> Vec<Op> {
    let idx = move |k: isize| (k + offset) as usize;
    let mut ops = Vec::new();
    let (mut x, mut y) = (old_len as isize, new_len as isize);

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[idx(prev_k)] as isize;
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(Op::Equal {
                old: (x - 1) as usize,
                new: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                ops.push(Op::Insert {
                    new: (y - 1) as usize,
                });
            } else {
                ops.push(Op::Delete {
                    old: (x - 1) as usize,
                });
            }
            x = prev_x;
            y = prev_y;
        }
    }

    ops.reverse();
    ops
}

fn full_rewrite(old_len: usize, new_len: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(old_len + new_len);
    ops.extend((0..old_len).map(|old| Op::Delete { old }));
    ops.extend((0..new_len).map(|new| Op::Insert { new }));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Replays a script over `old`, checking monotone coverage of both
    /// sides, and returns the reconstructed new sequence.
    fn replay<T: Clone + PartialEq>(script: &[Op], old: &[T], new: &[T]) -> Vec<T> {
        let (mut next_old, mut next_new) = (0, 0);
        let mut out = Vec::new();
        for op in script {
            match *op {
                Op::Equal { old: i, new: j } => {
                    assert_eq!(i, next_old);
                    assert_eq!(j, next_new);
                    assert!(old[i] == new[j]);
                    out.push(old[i].clone());
                    next_old += 1;
                    next_new += 1;
                }
                Op::Delete { old: i } => {
                    assert_eq!(i, next_old);
                    next_old += 1;
                }
                Op::Insert { new: j } => {
                    assert_eq!(j, next_new);
                    out.push(new[j].clone());
                    next_new += 1;
                }
            }
        }
        assert_eq!(next_old, old.len());
        assert_eq!(next_new, new.len());
        out
    }

    fn script_for(old: &[&str], new: &[&str]) -> Vec<Op> {
        edit_script(old.len(), new.len(), |i, j| old[i] == new[j])
    }

    #[test]
    fn identical_sequences_are_all_equal_ops() {
        let script = script_for(&["a", "b"], &["a", "b"]);
        assert!(script.iter().all(|op| matches!(op, Op::Equal { .. })));
        assert_eq!(script.len(), 2);
    }

    #[test]
    fn empty_to_lines_is_all_inserts() {
        let script = script_for(&[], &["a", "b"]);
        assert_eq!(
            script,
            vec![Op::Insert { new: 0 }, Op::Insert { new: 1 }]
        );
    }

    #[test]
    fn lines_to_empty_is_all_deletes() {
        let script = script_for(&["a", "b"], &[]);
        assert_eq!(
            script,
            vec![Op::Delete { old: 0 }, Op::Delete { old: 1 }]
        );
    }

    #[test]
    fn single_line_replace_deletes_before_inserting() {
        let script = script_for(&["a"], &["b"]);
        assert_eq!(
            script,
            vec![Op::Delete { old: 0 }, Op::Insert { new: 0 }]
        );
    }

    #[test]
    fn middle_change_keeps_surrounding_context() {
        let script = script_for(&["a", "b", "c"], &["a", "x", "c"]);
        let replayed = replay(&script, &["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(replayed, vec!["a", "x", "c"]);
        // Two lines survive untouched.
        let equals = script
            .iter()
            .filter(|op| matches!(op, Op::Equal { .. }))
            .count();
        assert_eq!(equals, 2);
    }

    proptest! {
        #[test]
        fn script_replays_new_from_old(
            old in proptest::collection::vec(0u8..4, 0..12),
            new in proptest::collection::vec(0u8..4, 0..12),
        ) {
            let script = edit_script(old.len(), new.len(), |i, j| old[i] == new[j]);
            let replayed = replay(&script, &old, &new);
            prop_assert_eq!(replayed, new);
        }

        #[test]
        fn script_is_minimal_for_disjoint_alphabets(
            old in proptest::collection::vec(0u8..4, 0..8),
            new in proptest::collection::vec(10u8..14, 0..8),
        ) {
            // No record ever matches, so the script must be exactly one
            // delete per old record and one insert per new record.
            let script = edit_script(old.len(), new.len(), |i, j| old[i] == new[j]);
            prop_assert_eq!(script.len(), old.len() + new.len());
        }
    }
}
