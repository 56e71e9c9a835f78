/// A record that can live in a [`RecordStore`].
///
/// Ids are handed out by the store on insert; a record fresh from a
/// payload carries none.
pub trait StoredRecord {
    fn id(&self) -> Option<&str>;
    fn assign_id(&mut self, id: String);
}

/// The minimal storage seam the planning core needs.
///
/// Handlers receive an explicit store handle instead of reaching for a
/// shared connection, which keeps every operation testable against
/// [`MemoryStore`].
pub trait RecordStore<T: StoredRecord> {
    /// Stores the record and returns the assigned id.
    fn insert(&mut self, record: T) -> String;

    fn find_all(&self) -> Vec<T>;

    fn find_by_id(&self, id: &str) -> Option<T>;

    /// Replaces the record with the given id, keeping its id. Returns
    /// false when no such record exists.
    fn update_by_id(&mut self, id: &str, record: T) -> bool;

    fn delete_by_id(&mut self, id: &str) -> bool;
}

/// In-memory store with sequential ids, insertion ordered.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Vec<T>,
    next_id: u64,
}

impl<T> MemoryStore<T> {
    pub fn new() -> MemoryStore<T> {
        MemoryStore {
            records: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> MemoryStore<T> {
        MemoryStore::new()
    }
}

impl<T: StoredRecord + Clone> RecordStore<T> for MemoryStore<T> {
    fn insert(&mut self, mut record: T) -> String {
        self.next_id += 1;
        let id = self.next_id.to_string();
        record.assign_id(id.clone());
        self.records.push(record);
        id
    }

    fn find_all(&self) -> Vec<T> {
        self.records.clone()
    }

    fn find_by_id(&self, id: &str) -> Option<T> {
        match self.records.iter().position(|record| record.id() == Some(id)) {
            Some(index) => Some(self.records[index].clone()),
            _ => None,
        }
    }

    fn update_by_id(&mut self, id: &str, mut record: T) -> bool {
        match self.records.iter().position(|record| record.id() == Some(id)) {
            Some(index) => {
                record.assign_id(id.to_string());
                self.records[index] = record;
                true
            }
            _ => false,
        }
    }

    fn delete_by_id(&mut self, id: &str) -> bool {
        match self.records.iter().position(|record| record.id() == Some(id)) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            _ => false,
        }
    }
}
