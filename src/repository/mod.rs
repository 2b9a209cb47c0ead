mod error;
mod git_store;
mod refspec;
mod store;

pub use error::{io_err, lookup_err, ExchangeError, Result};
pub use git_store::GitStore;
pub use refspec::RefSpec;
pub use store::ObjectStore;
