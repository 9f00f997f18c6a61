use crate::domain::{RecordKey, RegistryError, RegistryResult, SlotAddress};
use crate::ports::{RecordStore, StoredRecord, WriteBatch, WriteOp};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error};

struct Entry {
    slot: SlotAddress,
    nonce: u8,
    data: Vec<u8>,
}

#[derive(Default)]
struct Arena {
    records: BTreeMap<RecordKey, Entry>,
    index: HashMap<SlotAddress, RecordKey>,
}

impl Arena {
    fn len_at(&self, slot: &SlotAddress) -> Option<(usize, &RecordKey)> {
        let key = self.index.get(slot)?;
        self.records.get(key).map(|e| (e.data.len(), key))
    }
}

/// In-memory record arena, indexed by logical key with a slot index on top.
#[derive(Default)]
pub struct InMemoryRecordStore {
    arena: RwLock<Arena>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every op against the arena plus the earlier ops of the batch.
    fn check(arena: &Arena, batch: &WriteBatch) -> RegistryResult<()> {
        let mut pending: HashMap<SlotAddress, (usize, &RecordKey)> = HashMap::new();
        for op in batch.ops() {
            match op {
                WriteOp::Create { key, slot, data } => {
                    let taken = arena.records.contains_key(key)
                        || arena.index.contains_key(&slot.address)
                        || pending.contains_key(&slot.address)
                        || pending.values().any(|(_, k)| *k == key);
                    if taken {
                        return Err(RegistryError::DuplicateInitialization { slot: slot.address });
                    }
                    pending.insert(slot.address, (data.len(), key));
                }
                WriteOp::Update { slot, kind, data } => {
                    let (len, key) = pending
                        .get(slot)
                        .copied()
                        .or_else(|| arena.len_at(slot))
                        .ok_or(RegistryError::Ownership {
                            slot: *slot,
                            expected: *kind,
                        })?;
                    if key.kind() != *kind {
                        return Err(RegistryError::Ownership {
                            slot: *slot,
                            expected: *kind,
                        });
                    }
                    if len != data.len() {
                        return Err(RegistryError::Storage(format!(
                            "update of {} changes record length {} -> {}",
                            slot,
                            len,
                            data.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, slot: &SlotAddress) -> RegistryResult<Option<StoredRecord>> {
        let arena = self.arena.read();
        let Some(key) = arena.index.get(slot) else {
            return Ok(None);
        };
        let entry = arena.records.get(key).ok_or_else(|| {
            error!(slot = %slot, "slot index points at a missing record");
            RegistryError::Storage(format!("dangling slot index {}", slot))
        })?;
        Ok(Some(StoredRecord {
            key: key.clone(),
            nonce: entry.nonce,
            data: entry.data.clone(),
        }))
    }

    fn slot_of(&self, key: &RecordKey) -> RegistryResult<Option<SlotAddress>> {
        Ok(self.arena.read().records.get(key).map(|e| e.slot))
    }

    fn commit(&self, batch: WriteBatch) -> RegistryResult<()> {
        let mut arena = self.arena.write();
        Self::check(&arena, &batch)?;
        let ops = batch.len();
        for op in batch.into_ops() {
            match op {
                WriteOp::Create { key, slot, data } => {
                    arena.index.insert(slot.address, key.clone());
                    arena.records.insert(
                        key,
                        Entry {
                            slot: slot.address,
                            nonce: slot.nonce,
                            data,
                        },
                    );
                }
                WriteOp::Update { slot, data, .. } => {
                    let Some(key) = arena.index.get(&slot).cloned() else {
                        continue;
                    };
                    if let Some(entry) = arena.records.get_mut(&key) {
                        entry.data = data;
                    }
                }
            }
        }
        debug!(ops, records = arena.records.len(), "batch committed");
        Ok(())
    }
}
