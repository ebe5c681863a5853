//! Message-routing and session-state core.
//!
//! Everything platform-specific lives behind three injected contracts: the
//! [`store::SessionStore`] and [`store::RelayMapStore`] persistence seams and
//! the [`dispatch::Dispatcher`] transport seam. The [`router::Router`] is the
//! decision core: it classifies nothing itself. An inbound update is first
//! resolved into an [`event::InboundEvent`] exactly once, then handed over.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod router;
pub mod store;
pub mod topic;

pub use {
    dispatch::{DeliveryError, Dispatcher},
    error::{Error, Result, StoreError},
    event::{InboundEvent, RawMessage},
    router::{
        BroadcastReport, RegisterOutcome, RelayConfig, RelayOutcome, ReplyOutcome, Response,
        Router, TopicThreads,
    },
    store::{RelayMapStore, Session, SessionStore},
    topic::Topic,
};
