#![allow(dead_code)]

pub mod harness;
pub mod recording;
pub mod websocket;
pub mod websocket_client;

pub use harness::{cards, Harness};
pub use recording::{Recorded, RecordingBroadcaster};

// Logging is auto-installed for every test binary that pulls in support
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}
