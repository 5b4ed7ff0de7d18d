pub mod locking;
pub mod state_store;

pub use state_store::{checksum, state_file_path, Restored, StateStore};
