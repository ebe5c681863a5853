//! The decision core.
//!
//! The router owns no transport and no storage: it consults the session
//! store, decides one action, calls the dispatcher, and records or resolves
//! relay mappings. Each operation below matches one inbound surface; the
//! [`Router::handle`] entry point drives them from a classified event and
//! yields what the front-end should present.

use std::sync::Arc;

use tracing::{debug, warn};

use relaygram_common::{ChatRef, MessageKey, MessageRef, ThreadKey, UserId};

use crate::{
    dispatch::Dispatcher,
    error::{Error, Result},
    event::InboundEvent,
    store::{RelayMapStore, Session, SessionStore},
    topic::Topic,
};

/// Static routing configuration: the administrator, the staff group, and
/// the per-topic forum threads inside it.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub admin: UserId,
    pub group: ChatRef,
    pub threads: TopicThreads,
}

/// Optional sub-destination (forum thread) per topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicThreads {
    pub admin_support: Option<ThreadKey>,
    pub sponsorship: Option<ThreadKey>,
    pub report_scam: Option<ThreadKey>,
}

impl TopicThreads {
    #[must_use]
    pub fn for_topic(&self, topic: Topic) -> Option<ThreadKey> {
        match topic {
            Topic::AdminSupport => self.admin_support,
            Topic::Sponsorship => self.sponsorship,
            Topic::ReportScam => self.report_scam,
        }
    }
}

/// Result of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A session row was written (or overwritten); present these options.
    Registered { options: Vec<Topic> },
    /// The administrator registered: informative no-op, no row written.
    AdminWelcome,
}

/// Result of relaying a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Forwarded into the group; a mapping now exists under this key.
    Forwarded { forwarded: MessageKey },
    /// No topic selected yet; ask the user to pick one first.
    TopicPrompt,
    /// Sender is the administrator; the relay path never applies to them.
    Ignored,
}

/// Result of resolving a reply in the destination (or from the admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was copied to the mapped originating user.
    Delivered(UserId),
    /// The replied-to message is outside the relay's knowledge.
    Unmapped,
}

/// Per-recipient tally of a broadcast. Failures never abort the fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub success: u32,
    pub failure: u32,
}

/// What the front-end should do after handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Show the topic menu.
    Menu {
        text: &'static str,
        options: Vec<Topic>,
    },
    /// Reply with plain text.
    Text(String),
    /// Nothing to present.
    Silent,
}

pub const WELCOME: &str = "Welcome! Choose an option below:";
pub const ADMIN_WELCOME: &str =
    "Admin mode: reply to a forwarded message to answer the user, or reply to any \
     message with /broadcast to send it to everyone.";
pub const PROMPT_REGISTER: &str = "Please use /start to begin.";
pub const PROMPT_TOPIC: &str = "Please select an option (Admin Support, Sponsorship, or \
     Report Scam) from the menu to get started.";
pub const BROADCAST_NEEDS_REPLY: &str = "Please reply to a message to broadcast it.";
pub const ADMIN_TOPIC_NOOP: &str =
    "Topic selection is for users; replies from you are routed straight back to them.";

/// The routing/session engine.
pub struct Router {
    sessions: Arc<dyn SessionStore>,
    relay_map: Arc<dyn RelayMapStore>,
    dispatcher: Arc<dyn Dispatcher>,
    config: RelayConfig,
}

impl Router {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        relay_map: Arc<dyn RelayMapStore>,
        dispatcher: Arc<dyn Dispatcher>,
        config: RelayConfig,
    ) -> Self {
        Self {
            sessions,
            relay_map,
            dispatcher,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Drive one classified event and produce the front-end directive.
    pub async fn handle(&self, event: InboundEvent) -> Result<Response> {
        match event {
            InboundEvent::Register { user, name } => {
                match self.register(user, name.as_deref()).await? {
                    RegisterOutcome::Registered { options } => Ok(Response::Menu {
                        text: WELCOME,
                        options,
                    }),
                    RegisterOutcome::AdminWelcome => Ok(Response::Text(ADMIN_WELCOME.into())),
                }
            },
            InboundEvent::TopicSelected { user, topic } => {
                match self.select_topic(user, topic).await {
                    Ok(ack) => Ok(Response::Text(ack.into())),
                    Err(Error::SessionNotFound { .. }) => {
                        Ok(Response::Text(PROMPT_REGISTER.into()))
                    },
                    Err(Error::NotApplicableForAdmin) => {
                        Ok(Response::Text(ADMIN_TOPIC_NOOP.into()))
                    },
                    Err(e) => Err(e),
                }
            },
            InboundEvent::UserText { user, message } => {
                match self.relay_message(user, message).await {
                    Ok(RelayOutcome::Forwarded { .. }) | Ok(RelayOutcome::Ignored) => {
                        Ok(Response::Silent)
                    },
                    Ok(RelayOutcome::TopicPrompt) => Ok(Response::Text(PROMPT_TOPIC.into())),
                    Err(Error::SessionNotFound { .. }) => {
                        Ok(Response::Text(PROMPT_REGISTER.into()))
                    },
                    Err(e) => Err(e),
                }
            },
            InboundEvent::DestinationReply { replied_to, reply }
            | InboundEvent::AdminPrivateReply { replied_to, reply } => {
                match self.resolve_reply(replied_to, reply).await? {
                    ReplyOutcome::Delivered(user) => {
                        debug!(%user, replied_to = %replied_to, "reply routed back");
                    },
                    ReplyOutcome::Unmapped => {
                        debug!(replied_to = %replied_to, "reply to unmapped message, ignoring");
                    },
                }
                Ok(Response::Silent)
            },
            InboundEvent::BroadcastRequest { template } => match self.broadcast(template).await {
                Ok(report) => Ok(Response::Text(format!(
                    "Broadcast completed: {} successes, {} failures.",
                    report.success, report.failure
                ))),
                Err(Error::MissingReplyTarget) => {
                    Ok(Response::Text(BROADCAST_NEEDS_REPLY.into()))
                },
                Err(e) => Err(e),
            },
            InboundEvent::Ignored => Ok(Response::Silent),
        }
    }

    /// Create or overwrite the user's session and reset its topic.
    ///
    /// The administrator never gets a session row on this path; they are
    /// greeted and left out of the broadcast recipient set.
    pub async fn register(
        &self,
        user: UserId,
        display_name: Option<&str>,
    ) -> Result<RegisterOutcome> {
        if user == self.config.admin {
            return Ok(RegisterOutcome::AdminWelcome);
        }
        self.sessions.upsert(Session::new(user, display_name)).await?;
        Ok(RegisterOutcome::Registered {
            options: Topic::ALL.to_vec(),
        })
    }

    /// Set the session's selected topic and return the topic's ack text.
    pub async fn select_topic(&self, user: UserId, topic: Topic) -> Result<&'static str> {
        if user == self.config.admin {
            return Err(Error::NotApplicableForAdmin);
        }
        let mut session = self
            .sessions
            .get(user)
            .await?
            .ok_or(Error::SessionNotFound { user_id: user.0 })?;
        session.topic = Some(topic);
        self.sessions.upsert(session).await?;
        Ok(topic.ack())
    }

    /// Forward a user's message into the group and record its provenance.
    ///
    /// This is the only place relay mappings are created. The mapping is
    /// written only after the forward has been confirmed, so a failed
    /// forward leaves no state behind.
    pub async fn relay_message(&self, user: UserId, message: MessageRef) -> Result<RelayOutcome> {
        if user == self.config.admin {
            return Ok(RelayOutcome::Ignored);
        }
        let session = self
            .sessions
            .get(user)
            .await?
            .ok_or(Error::SessionNotFound { user_id: user.0 })?;
        let Some(topic) = session.topic else {
            return Ok(RelayOutcome::TopicPrompt);
        };

        let thread = self.config.threads.for_topic(topic);
        let forwarded = self
            .dispatcher
            .forward(self.config.group, message, thread)
            .await
            .map_err(|source| Error::ForwardFailed { source })?;

        self.relay_map.put(forwarded, message.id, user).await?;

        // Context header for staff. Delivery of the header is best effort.
        let header = format!(
            "{}\nMessage From: {}\nUser Id: {}",
            topic.tag(),
            session.name,
            user
        );
        if let Err(e) = self.dispatcher.send(self.config.group, &header).await {
            warn!(%user, error = %e, "failed to post context header");
        }

        Ok(RelayOutcome::Forwarded { forwarded })
    }

    /// Route a reply in the destination (or from the admin's private chat)
    /// back to the originating user.
    ///
    /// First-hop only: no mapping is written for the delivered copy, so a
    /// reply to a reply is unmapped by construction.
    pub async fn resolve_reply(
        &self,
        replied_to: MessageKey,
        reply: MessageRef,
    ) -> Result<ReplyOutcome> {
        let Some(user) = self.relay_map.get(replied_to).await? else {
            return Ok(ReplyOutcome::Unmapped);
        };
        self.dispatcher
            .copy(user, reply)
            .await
            .map_err(|source| Error::ForwardFailed { source })?;
        Ok(ReplyOutcome::Delivered(user))
    }

    /// Copy the replied-to template to every registered user.
    ///
    /// Per-recipient failures are tallied, never propagated; the fan-out
    /// always runs through the full recipient set.
    pub async fn broadcast(&self, template: Option<MessageRef>) -> Result<BroadcastReport> {
        let template = template.ok_or(Error::MissingReplyTarget)?;
        let mut report = BroadcastReport::default();
        for session in self.sessions.list_all().await? {
            match self.dispatcher.copy(session.user_id, template).await {
                Ok(_) => report.success += 1,
                Err(e) => {
                    warn!(user = %session.user_id, error = %e, "broadcast delivery failed");
                    report.failure += 1;
                },
            }
        }
        Ok(report)
    }
}
