use super::vector_store::VectorStore;
use crate::error::{ScopeError, ScopeResult};
use crate::vector::Embedding;

fn create_test_embedding(dim: usize, val: f32) -> Embedding {
    Embedding::from(vec![val; dim])
}

#[test]
fn test_new_vector_store() -> ScopeResult<()> {
    let store = VectorStore::new(4)?;
    assert_eq!(store.dimension(), 4);
    assert_eq!(store.size(), 0);
    assert_eq!(store.capacity(), 0);
    assert!(store.is_empty());
    assert!(store.all_vectors().is_empty());
    Ok(())
}

#[test]
fn test_zero_dimension_rejected() {
    assert!(matches!(VectorStore::new(0), Err(ScopeError::InvalidParameter(_))));
}

#[test]
fn test_add_get_vector() -> ScopeResult<()> {
    let mut store = VectorStore::new(3)?;
    let vec1 = create_test_embedding(3, 1.0);
    let vec2 = create_test_embedding(3, 2.0);

    assert_eq!(store.add(vec1.clone())?, 0);
    assert_eq!(store.add(vec2.clone())?, 1);
    assert_eq!(store.size(), 2);

    assert_eq!(store.get(0)?, &vec1);
    assert_eq!(store.get(1)?, &vec2);
    assert_eq!(store.get(2), Err(ScopeError::NotFound(2)));
    Ok(())
}

#[test]
fn test_add_validation() -> ScopeResult<()> {
    let mut store = VectorStore::new(2)?;
    assert_eq!(
        store.add(Embedding::from(vec![1.0, 2.0, 3.0])),
        Err(ScopeError::DimensionMismatch { expected: 2, actual: 3 })
    );
    assert!(matches!(
        store.add(Embedding::from(vec![1.0, f32::NAN])),
        Err(ScopeError::InvalidVector(_))
    ));
    // Rejected inserts must not consume an id.
    assert_eq!(store.capacity(), 0);
    assert_eq!(store.add(Embedding::from(vec![1.0, 2.0]))?, 0);
    Ok(())
}

#[test]
fn test_update_vector() -> ScopeResult<()> {
    let mut store = VectorStore::new(2)?;
    let id = store.add(create_test_embedding(2, 1.0))?;

    let updated = create_test_embedding(2, 1.5);
    store.update(id, updated.clone())?;
    assert_eq!(store.get(id)?, &updated);
    assert_eq!(store.size(), 1);

    assert_eq!(
        store.update(id, create_test_embedding(3, 0.0)),
        Err(ScopeError::DimensionMismatch { expected: 2, actual: 3 })
    );
    assert!(matches!(
        store.update(id, Embedding::from(vec![f32::INFINITY, 0.0])),
        Err(ScopeError::InvalidVector(_))
    ));
    assert_eq!(store.get(id)?, &updated, "failed update must leave the vector untouched");

    assert_eq!(store.update(7, updated.clone()), Err(ScopeError::NotFound(7)));
    store.remove(id)?;
    assert_eq!(store.update(id, updated), Err(ScopeError::NotFound(id)));
    Ok(())
}

#[test]
fn test_remove_tombstones_and_keeps_ids_stable() -> ScopeResult<()> {
    let mut store = VectorStore::new(2)?;
    for i in 0..4 {
        store.add(create_test_embedding(2, i as f32))?;
    }

    store.remove(1)?;
    assert_eq!(store.size(), 3);
    assert_eq!(store.capacity(), 4);
    assert!(!store.is_live(1));
    assert_eq!(store.get(1), Err(ScopeError::NotFound(1)));
    assert_eq!(store.remove(1), Err(ScopeError::NotFound(1)));

    // Remaining ids still resolve to their original vectors.
    assert_eq!(store.get(2)?, &create_test_embedding(2, 2.0));

    // New vectors never reuse a tombstoned slot.
    assert_eq!(store.add(create_test_embedding(2, 9.0))?, 4);
    let ids: Vec<usize> = store.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![0, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_all_vectors_is_a_snapshot() -> ScopeResult<()> {
    let mut store = VectorStore::new(2)?;
    store.add(create_test_embedding(2, 1.0))?;
    store.add(create_test_embedding(2, 2.0))?;

    let snapshot = store.all_vectors();
    store.update(0, create_test_embedding(2, 5.0))?;
    store.remove(1)?;

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0], (0, create_test_embedding(2, 1.0)));
    assert_eq!(snapshot[1], (1, create_test_embedding(2, 2.0)));
    assert_eq!(store.all_vectors(), vec![(0, create_test_embedding(2, 5.0))]);
    Ok(())
}
