#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod frame;
pub mod warning;

pub use cell::UnitCell;
pub use error::{TrajError, TrajResult};
pub use frame::{Box3, Frame};
pub use warning::{ContinuityWarning, Discontinuity};
