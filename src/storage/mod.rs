mod kv;
mod vocab_storage;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use vocab_storage::{
    StoredState, VocabStorage, DAILY_SET_KEY, PROGRESS_KEY, SCHEMA_VERSION, SENTENCES_KEY,
    TERMS_KEY,
};
