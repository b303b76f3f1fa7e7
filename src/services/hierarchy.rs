use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::AppError;
use crate::store::{StoreError, StoreTx};

/// Collects the id of every department below `root`, at any depth.
///
/// Uses an explicit worklist so deep trees cannot exhaust the stack. A node
/// already in the set is never expanded twice, which keeps the walk finite
/// even if the stored parent pointers already contain a loop.
pub async fn descendant_ids<T: StoreTx>(tx: &mut T, root: Uuid) -> Result<HashSet<Uuid>, StoreError> {
    let mut visited = HashSet::new();
    let mut pending = vec![root];

    while let Some(current) = pending.pop() {
        for child in tx.children(current).await? {
            if child.id != root && visited.insert(child.id) {
                pending.push(child.id);
            }
        }
    }

    Ok(visited)
}

/// Decides whether making `candidate_parent` the parent of `node` keeps the
/// hierarchy a forest. Must pass before a parent pointer is written.
pub async fn check_move<T: StoreTx>(
    tx: &mut T,
    node: Uuid,
    candidate_parent: Uuid,
) -> Result<(), AppError> {
    if node == candidate_parent {
        return Err(AppError::SelfParent);
    }

    let descendants = descendant_ids(tx, node).await?;
    if descendants.contains(&candidate_parent) {
        return Err(AppError::CycleDetected);
    }

    Ok(())
}
