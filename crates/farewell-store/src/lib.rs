mod collection;
mod jsonbin;
mod local;
mod offline;
mod reconcile;
mod retry;

pub use collection::Collection;
pub use jsonbin::{JsonBinClient, extract_collection, parse_created_bin_id, parse_document};
pub use local::LocalRepository;
pub use offline::OfflineRemote;
pub use reconcile::{DeleteOutcome, ReconcilingRepository, RemoteSync, WriteOutcome};
pub use retry::RetryPolicy;
