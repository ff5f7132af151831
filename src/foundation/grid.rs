use ndarray::{ArrayBase, Data, Dimension};

use crate::foundation::error::{InvdesError, InvdesResult};

/// Fail with [`InvdesError::Shape`] unless `a` and `b` have identical shapes.
pub(crate) fn ensure_same_shape<A, B, S1, S2, D>(
    what: &str,
    a: &ArrayBase<S1, D>,
    b: &ArrayBase<S2, D>,
) -> InvdesResult<()>
where
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
    D: Dimension,
{
    if a.shape() != b.shape() {
        return Err(InvdesError::shape(format!(
            "{what}: shape {:?} does not match {:?}",
            a.shape(),
            b.shape()
        )));
    }
    Ok(())
}

/// Min and max over the finite entries of `values`, or `None` if there are none.
pub(crate) fn finite_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/grid.rs"]
mod tests;
