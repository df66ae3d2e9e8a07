pub mod fake_hipchat;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fake_hipchat::FakeHipChat;
pub use setup::TestApp;
