pub mod search;
pub mod snapshot;

pub use search::{find_by_provider, find_by_unified_id, search};
pub use snapshot::{load_snapshot, save_snapshot};
