//! Request handlers.

pub mod health;
pub mod pages;
pub mod results;
pub mod uploads;

pub use health::*;
pub use results::*;
pub use uploads::*;
