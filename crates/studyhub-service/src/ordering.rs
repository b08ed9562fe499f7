//! Reordering siblings.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;

/// Check that `requested` is a permutation of `current`.
///
/// Reordering never adds or drops records, so both lists must contain
/// the same identifiers exactly once.
pub fn check_permutation<I>(current: &[I], requested: &[I]) -> AppResult<()>
where
    I: Copy + Eq + Hash + Display,
{
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(AppError::validation(format!(
                "Identifier {id} appears more than once in the new order"
            )));
        }
    }
    let existing: HashSet<I> = current.iter().copied().collect();
    if let Some(unknown) = requested.iter().find(|id| !existing.contains(id)) {
        return Err(AppError::validation(format!(
            "Identifier {unknown} is not part of this list"
        )));
    }
    if requested.len() != current.len() {
        return Err(AppError::validation(format!(
            "New order lists {} of {} records",
            requested.len(),
            current.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_permutation() {
        assert!(check_permutation(&[1, 2, 3], &[3, 1, 2]).is_ok());
        assert!(check_permutation(&[1, 2, 3], &[3, 1]).is_err());
        assert!(check_permutation(&[1, 2, 3], &[3, 3, 1]).is_err());
        assert!(check_permutation(&[1, 2, 3], &[1, 2, 4]).is_err());
    }
}
