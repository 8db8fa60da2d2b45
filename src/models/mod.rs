pub mod alert;
pub mod enums;
pub mod vital_sign;

pub use alert::VitalAlert;
pub use enums::{AlertLevel, AlertStatus, ReadingSource, VitalKind};
pub use vital_sign::{NormalRange, VitalReading, VitalTemplate};
