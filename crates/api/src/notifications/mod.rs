//! Alarm push to live sessions.
//!
//! [`NotificationDispatcher`] serializes alarm events and delivers them to
//! one session or to every session through the [`WsManager`](crate::ws::WsManager).

pub mod dispatcher;

pub use dispatcher::{DeliveryTarget, NotificationDispatcher, NEW_ALARM_MESSAGE_TYPE};
