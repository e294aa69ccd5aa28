pub mod classify;
pub mod client;
pub mod error;
pub mod sse;

pub use classify::is_rate_limit_message;
pub use client::{ScoutClient, ScoutStream};
pub use error::ScoutError;
pub use sse::{FrameDecoder, DEFAULT_MAX_FRAME_BYTES};
