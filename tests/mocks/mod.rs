//! Test doubles shared by the integration tests.

pub mod scripted_executor;

#[allow(unused_imports)]
pub use scripted_executor::ScriptedExecutor;
