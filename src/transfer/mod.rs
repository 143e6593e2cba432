//! Transfer Module
//!
//! Paced byte copying for file downloads.

mod channel;
mod rate_limited;

pub use channel::{body_channel, ChannelWriter};
pub use rate_limited::{CancelFlag, RateLimitedTransfer, DEFAULT_BUFFER_SIZE};
