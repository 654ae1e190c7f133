//! 整数の集合を、互いに素かつ隣接しない閉区間の和 (正規形) として扱う。
//!
//! ```
//! use ivset::IntervalSet;
//!
//! let a = IntervalSet::new(5, 15).unwrap();
//! let b = IntervalSet::new(7, 26).unwrap();
//!
//! assert_eq!((&a | &b).to_string(), "[5-26]");
//! assert_eq!((&a & &b).to_string(), "[7-15]");
//! ```

pub mod index;
mod range;
pub mod script;
mod set;

pub use self::range::InvalidRangeError;
pub use self::set::IntervalSet;
