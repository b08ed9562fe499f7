//! # studyhub-view
//!
//! One authoritative [`Navigation`] value selects exactly one of five
//! views. [`ViewStateMachine`] owns that value, applies transitions, and
//! notifies subscribers synchronously. [`derive_view`] turns the value
//! plus a cache snapshot into a renderable [`View`].

pub mod machine;
pub mod navigation;
pub mod notification;
pub mod search;
pub mod subscription;
pub mod view;

pub use machine::{Revalidation, ViewStateMachine};
pub use navigation::{Navigation, StateChange, ViewKind};
pub use notification::{Notification, NotificationCenter, NotificationLevel};
pub use search::{SearchHit, SearchHitKind, search};
pub use subscription::{ListenerRegistry, Subscription};
pub use view::{View, derive_view};
