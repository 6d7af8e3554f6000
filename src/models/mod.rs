pub mod record;

pub use record::{ScanOrigin, ScanRecord};
