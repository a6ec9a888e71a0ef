//! Infrastructure layer - storage backends and runtime wiring

pub mod logging;
pub mod storage;
pub mod user;
