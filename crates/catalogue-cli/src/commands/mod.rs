//! Command implementations.

pub mod extract;
pub mod serve;
pub mod show;

pub use self::extract::execute_extract;
pub use self::serve::execute_serve;
pub use self::show::execute_show;

/// Exit code of a command that completed normally
pub const EXIT_SUCCESS: i32 = 0;
