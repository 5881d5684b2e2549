//! hcs-home library
//!
//! Console-style home screen: a wrap-around game row and dock driven by a
//! navigation state machine, sound cues gated behind the first interaction,
//! and a viewport that keeps the selected tile centred.
//!
//! [`session::HomeSession`] is the single owner of this state; the binary
//! feeds it terminal input and paints its [`session::HomeView`].

pub mod ambient;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod embedded;
pub mod error;
pub mod input;
pub mod journal;
pub mod media;
pub mod navigation;
pub mod overlay;
pub mod render;
pub mod session;
pub mod viewport;

pub use error::{Error, Result};
pub use session::{HomeSession, HomeView};

/// Short git commit hash captured at build time
pub const GIT_HASH: &str = env!("GIT_HASH");
/// RFC 3339 build timestamp
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
/// Cargo profile (debug / release)
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// One-line build identification for the startup log
pub fn build_info() -> String {
    format!(
        "hcs-home {} ({}, {} build, built {})",
        env!("CARGO_PKG_VERSION"),
        GIT_HASH,
        BUILD_PROFILE,
        BUILD_TIMESTAMP
    )
}
