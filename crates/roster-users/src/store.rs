//! In-memory storage for user records.

use parking_lot::RwLock;

use crate::{error::UserError, NewUser, Result, UserPatch, UserRecord};

/// Records plus the id counter, guarded together so every mutation is atomic.
#[derive(Debug)]
struct UserTable {
    /// Records in insertion order.
    records: Vec<UserRecord>,
    /// Id handed to the next created record.
    next_id: u64,
}

impl UserTable {
    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// In-memory store for user records.
///
/// Thread-safe, insertion-ordered storage. Ids come from a counter that only
/// moves forward, so an id is never handed out twice even after the record
/// that held it is deleted.
#[derive(Debug)]
pub struct UserStore {
    table: RwLock<UserTable>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Creates a new empty store. The first record gets id 1.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store holding `records`, in order.
    ///
    /// The counter starts one past the largest id present.
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        let next_id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        Self {
            table: RwLock::new(UserTable { records, next_id }),
        }
    }

    /// Creates a store with the fixed startup records.
    pub fn seeded() -> Self {
        Self::with_records(vec![
            UserRecord::new(1, NewUser::new("John", "Doe", "reading")),
            UserRecord::new(2, NewUser::new("Jane", "Smith", "cooking")),
            UserRecord::new(3, NewUser::new("Alex", "Johnson", "gaming")),
        ])
    }

    /// Lists all records in insertion order.
    pub fn list_all(&self) -> Vec<UserRecord> {
        self.table.read().records.clone()
    }

    /// Gets a record by id.
    pub fn get(&self, id: u64) -> Result<UserRecord> {
        self.table
            .read()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| UserError::not_found(id))
    }

    /// Stores a new record under the next id and returns it.
    pub fn create(&self, user: NewUser) -> UserRecord {
        let mut table = self.table.write();
        let record = UserRecord::new(table.next_id, user);
        table.next_id += 1;
        table.records.push(record.clone());
        record
    }

    /// Applies `patch` to the record with `id` and returns the result.
    pub fn update(&self, id: u64, patch: UserPatch) -> Result<UserRecord> {
        let mut table = self.table.write();
        let record = table
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| UserError::not_found(id))?;

        record.apply(patch);
        Ok(record.clone())
    }

    /// Removes the record with `id` and returns it.
    pub fn delete(&self, id: u64) -> Result<UserRecord> {
        let mut table = self.table.write();
        let index = table.position(id).ok_or_else(|| UserError::not_found(id))?;
        Ok(table.records.remove(index))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.table.read().records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_seeded_store() {
        let store = UserStore::seeded();

        assert_eq!(store.len(), 3);
        let ids: Vec<u64> = store.list_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(store.get(1).unwrap().first_name, "John");
    }

    #[test]
    fn test_create_assigns_next_id() {
        let store = UserStore::seeded();

        let record = store.create(NewUser::new("Ann", "Lee", "chess"));
        assert_eq!(record.id, 4);
        assert_eq!(store.list_all().last(), Some(&record));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = UserStore::new();

        let first = store.create(NewUser::new("A", "B", "C"));
        let second = store.create(NewUser::new("D", "E", "F"));
        assert_eq!((first.id, second.id), (1, 2));

        store.delete(second.id).unwrap();
        let third = store.create(NewUser::new("G", "H", "I"));
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_update_merges_fields() {
        let store = UserStore::seeded();

        let updated = store
            .update(
                2,
                UserPatch {
                    first_name: Some("Janet".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, 2);
        assert_eq!(updated.first_name, "Janet");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.hobby, "cooking");
        assert_eq!(store.get(2).unwrap(), updated);
    }

    #[test]
    fn test_delete_preserves_order() {
        let store = UserStore::seeded();

        let removed = store.delete(2).unwrap();
        assert_eq!(removed.first_name, "Jane");

        let ids: Vec<u64> = store.list_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_not_found() {
        let store = UserStore::seeded();

        assert_eq!(store.get(999), Err(UserError::not_found(999)));
        assert_eq!(
            store.update(999, UserPatch::default()),
            Err(UserError::not_found(999))
        );
        assert_eq!(store.delete(999), Err(UserError::not_found(999)));

        store.delete(1).unwrap();
        assert!(store.get(1).is_err());
        assert!(store.delete(1).is_err());
    }

    #[test]
    fn test_with_records_counter() {
        let store = UserStore::with_records(vec![
            UserRecord::new(10, NewUser::new("A", "B", "C")),
            UserRecord::new(5, NewUser::new("D", "E", "F")),
        ]);

        assert_eq!(store.create(NewUser::new("G", "H", "I")).id, 11);
        assert!(UserStore::new().is_empty());
    }

    #[test]
    fn test_concurrent_creates_unique_ids() {
        let store = Arc::new(UserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(NewUser::new(format!("t{t}"), format!("u{i}"), "x")).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 400);
        assert_eq!(store.len(), 400);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create,
        Delete(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Create), (1u64..20).prop_map(Op::Delete)]
    }

    proptest! {
        /// Length tracks creates minus deletes; each new id is one past the
        /// largest ever assigned.
        #[test]
        fn prop_len_and_ids(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let store = UserStore::seeded();
            let mut expected_len = 3usize;
            let mut max_assigned = 3u64;

            for op in ops {
                match op {
                    Op::Create => {
                        let record = store.create(NewUser::new("a", "b", "c"));
                        prop_assert_eq!(record.id, max_assigned + 1);
                        max_assigned = record.id;
                        expected_len += 1;
                    }
                    Op::Delete(id) => {
                        if store.delete(id).is_ok() {
                            expected_len -= 1;
                        }
                    }
                }
                prop_assert_eq!(store.len(), expected_len);
            }
        }
    }
}
