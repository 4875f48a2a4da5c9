use crate::error::LabelError;

/// Neighbourhood of a grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Elements sharing a face: one axis differs by one. 4-connectivity in 2D, 6 in 3D.
    Face,
    /// Elements sharing a face, an edge or a corner. 8-connectivity in 2D, 26 in 3D.
    Full,
}

/// Computes the flattened offsets to the neighbours that precede an element in row-major order.
///
/// The last axis of `shape` varies fastest. The offsets are negative, deduplicated and sorted
/// nearest first, ready to be passed to [SparseLabeler::label](crate::sparse::SparseLabeler::label).
///
/// Offsets are computed on the flattened grid and wrap across the end of a row, so the grid
/// should carry a one-element background border along each axis. With [Connectivity::Full]
/// every axis must therefore be at least 3 long, which yields exactly `(3^N - 1) / 2` offsets.
///
/// # Arguments
///
/// * `shape` - The size of each axis of the grid.
/// * `connectivity` - The neighbourhood to use.
///
/// # Errors
///
/// Returns [LabelError::InvalidShape] if `shape` is empty, has a zero-length axis, has more
/// elements than fit in an `i64`, or has an axis shorter than 3 with [Connectivity::Full].
///
/// # Example
///
/// ```
/// use kornia_label::neighborhood::{backward_deltas, Connectivity};
///
/// let deltas = backward_deltas(&[4, 10], Connectivity::Full).unwrap();
/// assert_eq!(deltas, vec![-1, -9, -10, -11]);
/// ```
pub fn backward_deltas(
    shape: &[usize],
    connectivity: Connectivity,
) -> Result<Vec<i64>, LabelError> {
    let invalid = || LabelError::InvalidShape(shape.to_vec());
    let strides = row_major_strides(shape)?;

    let mut deltas: Vec<i64> = match connectivity {
        Connectivity::Face => strides.iter().map(|&stride| -stride).collect(),
        Connectivity::Full => {
            if shape.iter().any(|&len| len < 3) {
                return Err(invalid());
            }

            let mut deltas = Vec::new();
            // odometer over {-1, 0, 1} per axis
            let mut digits = vec![-1i64; strides.len()];
            loop {
                let delta = digits
                    .iter()
                    .zip(&strides)
                    .try_fold(0i64, |acc, (d, s)| acc.checked_add(d.checked_mul(*s)?))
                    .ok_or_else(invalid)?;
                if delta < 0 {
                    deltas.push(delta);
                }

                let Some(axis) = digits.iter().rposition(|&d| d < 1) else {
                    break;
                };
                digits[axis] += 1;
                digits[axis + 1..].iter_mut().for_each(|d| *d = -1);
            }
            deltas
        }
    };

    deltas.sort_unstable_by(|a, b| b.cmp(a));
    deltas.dedup();

    Ok(deltas)
}

fn row_major_strides(shape: &[usize]) -> Result<Vec<i64>, LabelError> {
    let invalid = || LabelError::InvalidShape(shape.to_vec());

    if shape.is_empty() || shape.contains(&0) {
        return Err(invalid());
    }

    let mut strides = vec![1i64; shape.len()];
    let mut numel: i64 = 1;
    for (axis, &len) in shape.iter().enumerate().rev() {
        strides[axis] = numel;
        let len = i64::try_from(len).map_err(|_| invalid())?;
        numel = numel.checked_mul(len).ok_or_else(invalid)?;
    }

    Ok(strides)
}

/// Returns the flattened positions of the `true` elements of `mask`, in ascending order.
pub fn foreground_indices(mask: &[bool]) -> Vec<u64> {
    mask.iter()
        .enumerate()
        .filter(|(_, fg)| **fg)
        .map(|(i, _)| i as u64)
        .collect()
}
