use std::cmp::Ordering;

use crate::{
    disjoint_set::{DisjointSet, SetId, DEFAULT_CAPACITY},
    error::LabelError,
};

/// Configuration for [SparseLabeler].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseLabelConfig {
    /// Number of disjoint-set slots reserved up front. The set doubles when it runs out.
    pub initial_capacity: usize,
    /// Whether to check that the indices are strictly ascending before labelling.
    pub validate_indices: bool,
}

impl Default for SparseLabelConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            validate_indices: true,
        }
    }
}

/// Labels connected regions among the foreground elements of a large implicit grid.
///
/// Only the sorted, flattened positions of the foreground are given. Neighbourhood is defined
/// by negative offsets relative to each position, so the labeler never needs to know the
/// shape or dimensionality of the grid.
#[derive(Debug, Clone, Default)]
pub struct SparseLabeler {
    config: SparseLabelConfig,
}

impl SparseLabeler {
    /// Creates a new labeler with the given configuration.
    pub fn new(config: SparseLabelConfig) -> Self {
        Self { config }
    }

    /// Returns the labeler configuration.
    pub fn config(&self) -> &SparseLabelConfig {
        &self.config
    }

    /// Labels the regions formed by `indices` and writes one region number per index to `labels`.
    ///
    /// # Arguments
    ///
    /// * `indices` - Flattened foreground positions, strictly ascending.
    /// * `deltas` - Offsets to the neighbours already visited by an ascending scan. All negative.
    /// * `labels` - Output buffer with the same length as `indices`.
    ///
    /// # Returns
    ///
    /// The number of regions `K`. Labels take every value in `1..=K`, numbered in the order the
    /// regions first appear in `indices`.
    ///
    /// # Errors
    ///
    /// On error the contents of `labels` are unspecified.
    pub fn label(
        &self,
        indices: &[u64],
        deltas: &[i64],
        labels: &mut [u64],
    ) -> Result<usize, LabelError> {
        if labels.len() != indices.len() {
            return Err(LabelError::LengthMismatch(labels.len(), indices.len()));
        }

        validate_deltas(deltas)?;
        if self.config.validate_indices {
            validate_indices(indices)?;
        }

        let mut sets = DisjointSet::with_capacity(self.config.initial_capacity)?;

        merge_neighbours(indices, deltas, labels, &mut sets)?;
        let num_regions = compact_labels(labels, &mut sets)?;

        log::debug!(
            "labelled {} indices into {} regions ({} provisional sets)",
            indices.len(),
            num_regions,
            sets.len()
        );

        Ok(num_regions)
    }

    /// Labels the regions formed by `indices` into a newly allocated buffer.
    ///
    /// See [SparseLabeler::label].
    pub fn label_into_vec(&self, indices: &[u64], deltas: &[i64]) -> Result<Vec<u64>, LabelError> {
        let mut labels = Vec::new();
        labels.try_reserve_exact(indices.len())?;
        labels.resize(indices.len(), 0);

        self.label(indices, deltas, &mut labels)?;

        Ok(labels)
    }
}

/// Labels the regions formed by `indices` using the default [SparseLabelConfig].
///
/// See [SparseLabeler::label].
pub fn label_regions_sparse(
    indices: &[u64],
    deltas: &[i64],
    labels: &mut [u64],
) -> Result<usize, LabelError> {
    SparseLabeler::default().label(indices, deltas, labels)
}

/// Returns the position of `needle` in the ascending slice `haystack`, if present.
///
/// Callers bound the search by slicing, e.g. `&indices[..i]` to look only at the processed prefix.
pub fn search_sorted(haystack: &[u64], needle: u64) -> Option<usize> {
    let mut low = 0;
    let mut high = haystack.len();

    while low < high {
        let mid = low + (high - low) / 2;
        match haystack[mid].cmp(&needle) {
            Ordering::Equal => return Some(mid),
            Ordering::Greater => high = mid,
            Ordering::Less => low = mid + 1,
        }
    }

    None
}

fn validate_deltas(deltas: &[i64]) -> Result<(), LabelError> {
    match deltas.iter().position(|&delta| delta >= 0) {
        Some(position) => Err(LabelError::InvalidDelta {
            position,
            delta: deltas[position],
        }),
        None => Ok(()),
    }
}

fn validate_indices(indices: &[u64]) -> Result<(), LabelError> {
    match indices.windows(2).position(|pair| pair[0] >= pair[1]) {
        Some(position) => Err(LabelError::UnsortedIndices {
            position: position + 1,
        }),
        None => Ok(()),
    }
}

/// Reads back the provisional set id stored in `labels[slot]` during the scan.
fn provisional_id(labels: &[u64], slot: usize, position: usize) -> Result<SetId, LabelError> {
    let raw = labels[slot];
    usize::try_from(raw)
        .ok()
        .and_then(SetId::new)
        .ok_or(LabelError::UnknownRegion { position, id: raw })
}

/// First pass: gives every index a provisional set id and merges the sets of touching neighbours.
fn merge_neighbours(
    indices: &[u64],
    deltas: &[i64],
    labels: &mut [u64],
    sets: &mut DisjointSet,
) -> Result<(), LabelError> {
    let mut neighbours: Vec<SetId> = Vec::new();
    neighbours.try_reserve_exact(deltas.len())?;

    for (i, &index) in indices.iter().enumerate() {
        neighbours.clear();

        // only the prefix has labels yet
        let processed = &indices[..i];

        for &delta in deltas {
            // the neighbour would lie before the start of the grid
            let Some(candidate) = index.checked_add_signed(delta) else {
                continue;
            };

            if let Some(slot) = search_sorted(processed, candidate) {
                neighbours.push(provisional_id(labels, slot, i)?);
            }
        }

        let Some((&first, rest)) = neighbours.split_first() else {
            labels[i] = sets.insert()?.get() as u64;
            continue;
        };

        labels[i] = first.get() as u64;
        for &other in rest {
            sets.merge(first, other)
                .map_err(|source| LabelError::InvalidMerge {
                    position: i,
                    source,
                })?;
        }
    }

    Ok(())
}

/// Second pass: replaces provisional ids by their root and renumbers roots densely from 1.
fn compact_labels(labels: &mut [u64], sets: &mut DisjointSet) -> Result<usize, LabelError> {
    // region number per root id, 0 while unseen
    let mut regions: Vec<u64> = Vec::new();
    regions.try_reserve_exact(sets.len() + 1)?;
    regions.resize(sets.len() + 1, 0);

    let mut num_regions = 0;

    for i in 0..labels.len() {
        let id = provisional_id(labels, i, i)?;
        let root = sets.find(id).ok_or(LabelError::UnknownRegion {
            position: i,
            id: labels[i],
        })?;

        let region = &mut regions[root.get()];
        if *region == 0 {
            num_regions += 1;
            *region = num_regions as u64;
        }
        labels[i] = *region;
    }

    Ok(num_regions)
}
