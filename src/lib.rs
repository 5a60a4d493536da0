pub mod fetch;

mod chart;
mod dataset;
mod ioutil;
mod manager;
mod progress;
mod query;
mod rivm;
mod store;
mod table;

pub use chart::*;
pub use dataset::*;
pub use fetch::{have_connectivity, Fetcher};
pub use ioutil::{create_sig, open_sig, strip_bom};
pub use manager::*;
pub use progress::*;
pub use query::*;
pub use rivm::*;
pub use store::*;
pub use table::*;
