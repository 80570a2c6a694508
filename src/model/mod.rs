pub mod activities;
pub mod common;
pub mod management;
pub mod reservations;

pub use activities::*;
pub use common::*;
pub use management::*;
pub use reservations::*;
