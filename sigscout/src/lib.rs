pub mod config;
pub mod errors;
pub mod loader;
pub mod metrics;
pub mod results;
pub mod scan;
pub mod wire;

pub use config::ScanConfig;
pub use errors::{ScanError, ScanResult};
pub use loader::{load_signatures, parse_signatures};
pub use metrics::{ScanMetrics, ScanStats};
pub use results::{ScanReport, ScanStatus};
pub use scan::{ScanEngine, ScanShard, Signature};
pub use wire::{decode_report, encode_report};
