//! Client-facing service layer
//!
//! `LogQueryService` is what a transport binds to. Progress reaches clients
//! through a `PushApi`, on one result channel and one timeline channel per
//! query.

mod callbacks;
mod push;
#[allow(clippy::module_inception)]
mod service;

pub use callbacks::{query_channel, timeline_channel, PushPageCallback, PushTimelineCallback};
pub use push::{ChannelPush, PushApi, PushError, PushMessage, PushReceiver, PushSender};
pub use service::{LogQueryService, ResultPage, StartQuery};
