//! Sink hooks: external delivery targets fired by the emit core
//!
//! - [`ChannelHook`]: non-blocking send to a caller-owned channel
//! - [`TeamsHook`]: MessageCard POST to a Teams incoming webhook
//! - [`SlackHook`]: `chat.postMessage` call to the Slack Web API
//!
//! The network hooks share an [`HttpTransport`], which tests can replace.

pub mod channel;
pub mod slack;
pub mod teams;
pub mod transport;

pub use channel::ChannelHook;
pub use slack::SlackHook;
pub use teams::{Fact, MessageCard, Section, TeamsHook};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, HTTP_TIMEOUT};

pub use crate::core::Hook;
