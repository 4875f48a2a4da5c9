use std::collections::VecDeque;

use kornia_label::{
    label_regions_sparse,
    neighborhood::{backward_deltas, foreground_indices, Connectivity},
    LabelError, SparseLabelConfig, SparseLabeler,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random mask with a one-element background border along each axis.
fn random_mask(shape: &[usize], density: f64, rng: &mut StdRng) -> Vec<bool> {
    let numel = shape.iter().product::<usize>();
    let mut mask = vec![false; numel];

    for (i, value) in mask.iter_mut().enumerate() {
        let mut rest = i;
        let mut on_border = false;
        for &len in shape.iter().rev() {
            let coord = rest % len;
            rest /= len;
            on_border |= coord == 0 || coord == len - 1;
        }
        *value = !on_border && rng.random_bool(density);
    }

    mask
}

/// Flood fill over the dense mask, numbering regions by their smallest index.
fn flood_fill_labels(mask: &[bool], deltas: &[i64]) -> Vec<u64> {
    let mut dense = vec![0u64; mask.len()];
    let mut next = 0;
    let mut queue = VecDeque::new();

    for start in 0..mask.len() {
        if !mask[start] || dense[start] != 0 {
            continue;
        }
        next += 1;
        dense[start] = next;
        queue.push_back(start);

        while let Some(i) = queue.pop_front() {
            for &d in deltas {
                for offset in [d, -d] {
                    let j = i as i64 + offset;
                    if j < 0 || j as usize >= mask.len() {
                        continue;
                    }
                    let j = j as usize;
                    if mask[j] && dense[j] == 0 {
                        dense[j] = next;
                        queue.push_back(j);
                    }
                }
            }
        }
    }

    mask.iter()
        .zip(&dense)
        .filter(|(fg, _)| **fg)
        .map(|(_, &label)| label)
        .collect()
}

fn check_against_flood_fill(shape: &[usize], connectivity: Connectivity, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mask = random_mask(shape, 0.45, &mut rng);
    let deltas = backward_deltas(shape, connectivity).unwrap();
    let indices = foreground_indices(&mask);

    let mut labels = vec![0; indices.len()];
    let num_regions = label_regions_sparse(&indices, &deltas, &mut labels).unwrap();

    let expected = flood_fill_labels(&mask, &deltas);
    assert_eq!(labels, expected);
    assert_eq!(num_regions as u64, expected.iter().copied().max().unwrap_or(0));
}

#[test]
fn test_label_1d_runs() -> Result<(), LabelError> {
    init_logger();
    let indices = [0, 1, 2, 5, 6, 10];
    let mut labels = [0; 6];

    let num_regions = label_regions_sparse(&indices, &[-1], &mut labels)?;

    assert_eq!(num_regions, 3);
    assert_eq!(labels, [1, 1, 1, 2, 2, 3]);

    Ok(())
}

#[test]
fn test_label_2d_block() -> Result<(), LabelError> {
    init_logger();
    const W: u64 = 10;

    let indices = (2..5)
        .flat_map(|y| (3..6).map(move |x| y * W + x))
        .collect::<Vec<_>>();
    let labels = SparseLabeler::default().label_into_vec(&indices, &[-1, -(W as i64)])?;

    assert_eq!(labels, vec![1; 9]);

    Ok(())
}

#[test]
fn test_label_2d_diagonal() -> Result<(), LabelError> {
    init_logger();
    let shape = [6, 6];
    let indices = [7, 14, 21];

    let face = backward_deltas(&shape, Connectivity::Face)?;
    let full = backward_deltas(&shape, Connectivity::Full)?;
    let labeler = SparseLabeler::default();

    assert_eq!(labeler.label_into_vec(&indices, &face)?, vec![1, 2, 3]);
    assert_eq!(labeler.label_into_vec(&indices, &full)?, vec![1, 1, 1]);

    Ok(())
}

#[test]
fn test_label_3d_columns() -> Result<(), LabelError> {
    init_logger();
    let shape = [5, 5, 5];
    let deltas = backward_deltas(&shape, Connectivity::Face)?;

    // two vertical columns through the volume, joined on the last slice
    let mut mask = vec![false; 125];
    for z in 1..4 {
        mask[z * 25 + 5 + 1] = true;
        mask[z * 25 + 5 + 3] = true;
    }
    mask[3 * 25 + 5 + 2] = true;
    // isolated element
    mask[2 * 25 + 15 + 3] = true;

    let indices = foreground_indices(&mask);
    let labels = SparseLabeler::default().label_into_vec(&indices, &deltas)?;

    // ascending order: column elements of z=1 and z=2, then the isolated one, then z=3
    assert_eq!(labels, vec![1, 1, 1, 1, 2, 1, 1, 1]);

    Ok(())
}

#[test]
fn test_label_empty() -> Result<(), LabelError> {
    init_logger();
    let labels = SparseLabeler::default().label_into_vec(&[], &[-1, -10])?;
    assert!(labels.is_empty());
    Ok(())
}

#[test]
fn test_label_dense_range() -> Result<(), LabelError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let indices = (0..5000u64)
        .filter_map(|i| rng.random_bool(0.3).then(|| i * 3 + rng.random_range(0..3)))
        .collect::<Vec<_>>();

    let labeler = SparseLabeler::new(SparseLabelConfig {
        initial_capacity: 2,
        ..Default::default()
    });
    let mut labels = vec![0; indices.len()];
    let num_regions = labeler.label(&indices, &[-1, -2], &mut labels)?;

    let mut seen = vec![false; num_regions + 1];
    let mut max_seen = 0;
    for &label in &labels {
        // a new region is always the next number
        assert!(label as usize <= max_seen + 1);
        max_seen = max_seen.max(label as usize);
        seen[label as usize] = true;
    }
    assert_eq!(max_seen, num_regions);
    assert!(seen[1..].iter().all(|&s| s));

    Ok(())
}

#[test]
fn test_label_random_2d_face() {
    init_logger();
    for seed in 0..8 {
        check_against_flood_fill(&[34, 42], Connectivity::Face, seed);
    }
}

#[test]
fn test_label_random_2d_full() {
    init_logger();
    for seed in 0..8 {
        check_against_flood_fill(&[34, 42], Connectivity::Full, seed);
    }
}

#[test]
fn test_label_random_3d() {
    init_logger();
    for seed in 0..4 {
        check_against_flood_fill(&[12, 13, 14], Connectivity::Face, seed);
        check_against_flood_fill(&[12, 13, 14], Connectivity::Full, seed);
    }
}
