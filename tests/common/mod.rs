//! Common test utilities for flow-dl integration tests

#[allow(dead_code)]
pub mod config;
#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod video_host;

#[allow(unused_imports)]
pub use config::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use video_host::*;
