pub mod cell;
pub mod enums;
pub mod error;
pub mod float;
pub mod trade;

// Re-export the core types to provide a clean public API.
pub use cell::{Cell, Row, RowView};
pub use enums::MetricsStrategy;
pub use error::CoreError;
pub use trade::TradeRecord;
