//! Utility functions shared by the health modules

pub mod time;
pub mod url;

pub use self::time::*;
pub use self::url::*;
