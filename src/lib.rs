// Library surface for the binary, headless/integration tests and reuse.
// Terminal rendering stays in the binary.
pub mod alert;
pub mod app_dirs;
pub mod audio;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod plan;
pub mod report;
pub mod runtime;
pub mod sequencer;
pub mod session;
pub mod util;
