use super::{Row, RowKey};

/// What changed about a row that kept its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Only the availability flag flipped; a cheap partial rebind suffices.
    Availability(bool),
    Replace(Row),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowChange {
    /// Index in the old projection.
    Remove { index: usize },
    /// Index in the new projection.
    Insert { index: usize, row: Row },
    /// Index in the new projection.
    Update { index: usize, payload: Payload },
}

/// Changes turning one projection into the next.
///
/// Removals come first in descending order, then insertions in ascending
/// order, then updates; applied in that order they reproduce the new rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDiff {
    pub changes: Vec<RowChange>,
}

impl RowDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn removals(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Remove { .. }))
    }

    pub fn insertions(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Insert { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|c| matches!(c, RowChange::Update { .. }))
    }

    fn count(&self, pred: impl Fn(&RowChange) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }

    pub fn apply(&self, old: &[Row]) -> Vec<Row> {
        let mut rows = old.to_vec();
        for change in &self.changes {
            match change {
                RowChange::Remove { index } => {
                    rows.remove(*index);
                }
                RowChange::Insert { index, row } => rows.insert(*index, row.clone()),
                RowChange::Update { index, payload } => match payload {
                    Payload::Availability(available) => {
                        if let Some(Row::Item(item)) = rows.get_mut(*index) {
                            item.available = *available;
                        }
                    }
                    Payload::Replace(row) => rows[*index] = row.clone(),
                },
            }
        }
        rows
    }
}

/// Diff two projections by row identity.
///
/// Rows kept in both are found as the longest common subsequence of keys,
/// so a window sliding by a few rows yields only the edge changes.
pub fn diff(old: &[Row], new: &[Row]) -> RowDiff {
    let old_keys: Vec<RowKey> = old.iter().map(Row::key).collect();
    let new_keys: Vec<RowKey> = new.iter().map(Row::key).collect();
    let (kept_old, kept_new) = common_subsequence(&old_keys, &new_keys);

    let mut changes = Vec::new();

    for index in (0..old.len()).rev() {
        if !kept_old[index] {
            changes.push(RowChange::Remove { index });
        }
    }
    for (index, row) in new.iter().enumerate() {
        if !kept_new[index] {
            changes.push(RowChange::Insert {
                index,
                row: row.clone(),
            });
        }
    }

    let mut old_kept = old.iter().zip(&kept_old).filter(|(_, kept)| **kept);
    for (index, row) in new.iter().enumerate() {
        if !kept_new[index] {
            continue;
        }
        let Some((previous, _)) = old_kept.next() else {
            break;
        };
        if let Some(payload) = payload_for(previous, row) {
            changes.push(RowChange::Update { index, payload });
        }
    }

    RowDiff { changes }
}

fn payload_for(old: &Row, new: &Row) -> Option<Payload> {
    if old == new {
        return None;
    }
    match (old, new) {
        (Row::Item(before), Row::Item(after)) if before.differs_only_in_availability(after) => {
            Some(Payload::Availability(after.available))
        }
        _ => Some(Payload::Replace(new.clone())),
    }
}

/// Membership flags of the LCS in `a` and `b`.
fn common_subsequence(a: &[RowKey], b: &[RowKey]) -> (Vec<bool>, Vec<bool>) {
    let (n, m) = (a.len(), b.len());
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut in_a = vec![false; n];
    let mut in_b = vec![false; m];
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            in_a[i] = true;
            in_b[j] = true;
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    (in_a, in_b)
}
