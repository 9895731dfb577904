use alloc::vec::Vec;

/// How an ordered collection mutated between two observations.
///
/// Index spaces: `removed` indexes the view before the batch. `inserted`
/// indexes the view after deletions. `changed` refreshes positions that did
/// not shift, so its indices read the same in either numbering. Move sources
/// index the view after deletions and insertions; move destinations index the
/// final ordering. `snapshot_after` is the authoritative post-batch ordering
/// and supplies the identifiers for insertions and reloads.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeSet<I> {
    pub removed: Vec<usize>,
    pub inserted: Vec<usize>,
    pub changed: Vec<usize>,
    pub moves: Vec<(usize, usize)>,
    /// `false` marks a discontinuous change: the view is replaced wholesale
    /// with `snapshot_after` and the index fields are ignored.
    pub incremental: bool,
    pub snapshot_after: Vec<I>,
}

impl<I> ChangeSet<I> {
    /// A full (non-incremental) replacement of the view.
    pub fn full(snapshot_after: Vec<I>) -> Self {
        Self {
            removed: Vec::new(),
            inserted: Vec::new(),
            changed: Vec::new(),
            moves: Vec::new(),
            incremental: false,
            snapshot_after,
        }
    }

    /// An incremental batch against the given post-batch snapshot.
    pub fn incremental(snapshot_after: Vec<I>) -> Self {
        Self {
            removed: Vec::new(),
            inserted: Vec::new(),
            changed: Vec::new(),
            moves: Vec::new(),
            incremental: true,
            snapshot_after,
        }
    }

    pub fn with_removed(mut self, removed: Vec<usize>) -> Self {
        self.removed = removed;
        self
    }

    pub fn with_inserted(mut self, inserted: Vec<usize>) -> Self {
        self.inserted = inserted;
        self
    }

    pub fn with_changed(mut self, changed: Vec<usize>) -> Self {
        self.changed = changed;
        self
    }

    pub fn with_moves(mut self, moves: Vec<(usize, usize)>) -> Self {
        self.moves = moves;
        self
    }
}

/// How a change batch landed on the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Incremental edits were applied in place.
    Incremental,
    /// The batch was non-incremental; the view now equals `snapshot_after`.
    FullReload,
    /// The incremental batch referenced indices the view could not satisfy;
    /// rather than apply it partially, the view was replaced with
    /// `snapshot_after`.
    RejectedToFullReload,
}

/// Applies a change batch to the live ordered view, atomically.
///
/// Incremental batches apply in the only order that keeps every index valid
/// against the single evolving numbering space: deletions by descending index,
/// then insertions by ascending index into the shrunk view, then in-place
/// reloads, then moves as simultaneous paired remove/inserts. The batch runs
/// against a scratch copy and replaces the view only on success, so no
/// observer ever sees an intermediate state.
///
/// A batch whose indices fall outside bounds (or whose bookkeeping disagrees
/// with `snapshot_after`'s length) is not applied partially: the view is
/// replaced wholesale from the snapshot, trading an extra full redraw for
/// immunity to index corruption.
pub fn apply_changes<I: Clone>(view: &mut Vec<I>, change: &ChangeSet<I>) -> ApplyOutcome {
    if !change.incremental {
        view.clear();
        view.extend_from_slice(&change.snapshot_after);
        return ApplyOutcome::FullReload;
    }

    match apply_incremental(view, change) {
        Some(next) => {
            *view = next;
            ApplyOutcome::Incremental
        }
        None => {
            pwarn!("incremental batch rejected, reloading from snapshot");
            view.clear();
            view.extend_from_slice(&change.snapshot_after);
            ApplyOutcome::RejectedToFullReload
        }
    }
}

fn apply_incremental<I: Clone>(view: &[I], change: &ChangeSet<I>) -> Option<Vec<I>> {
    let mut next: Vec<I> = view.to_vec();

    // Deletions by descending index: earlier removals never shift later ones.
    let mut removed = change.removed.clone();
    removed.sort_unstable();
    removed.dedup();
    for &index in removed.iter().rev() {
        if index >= next.len() {
            return None;
        }
        next.remove(index);
    }

    // Insertions by ascending index into the already-shrunk view; the inserted
    // identifier lives at the same index in the post-batch snapshot.
    let mut inserted = change.inserted.clone();
    inserted.sort_unstable();
    inserted.dedup();
    for &index in &inserted {
        if index > next.len() || index >= change.snapshot_after.len() {
            return None;
        }
        next.insert(index, change.snapshot_after[index].clone());
    }

    // Reloads: identifier swap at indices that did not move.
    for &index in &change.changed {
        if index >= next.len() || index >= change.snapshot_after.len() {
            return None;
        }
        next[index] = change.snapshot_after[index].clone();
    }

    // Moves are simultaneous: capture every source first, then remove sources
    // by descending index, then insert at destinations by ascending index, so
    // no move clobbers another's target.
    if !change.moves.is_empty() {
        let mut values = Vec::with_capacity(change.moves.len());
        for &(from, _) in &change.moves {
            if from >= next.len() {
                return None;
            }
            values.push(next[from].clone());
        }

        let mut sources: Vec<usize> = change.moves.iter().map(|&(from, _)| from).collect();
        sources.sort_unstable();
        sources.dedup();
        if sources.len() != change.moves.len() {
            return None;
        }
        for &from in sources.iter().rev() {
            next.remove(from);
        }

        let mut destinations: Vec<(usize, usize)> = change
            .moves
            .iter()
            .enumerate()
            .map(|(slot, &(_, to))| (to, slot))
            .collect();
        destinations.sort_unstable();
        if destinations.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            return None;
        }
        for &(to, slot) in &destinations {
            if to > next.len() {
                return None;
            }
            next.insert(to, values[slot].clone());
        }
    }

    if next.len() != change.snapshot_after.len() {
        return None;
    }
    Some(next)
}
