//! The fixed topic table.
//!
//! Adding a topic means adding a variant here and wiring its thread id into
//! the config schema; nothing else in the core changes.

use serde::{Deserialize, Serialize};

/// A support topic the user selects before their messages are relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    AdminSupport,
    Sponsorship,
    ReportScam,
}

impl Topic {
    /// Every topic, in keyboard order.
    pub const ALL: [Topic; 3] = [Topic::AdminSupport, Topic::Sponsorship, Topic::ReportScam];

    /// The keyboard/user-facing label. Selection matches on this exact text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::AdminSupport => "Admin Support",
            Topic::Sponsorship => "Sponsorship",
            Topic::ReportScam => "Report Scam",
        }
    }

    /// Static acknowledgment sent back when the topic is selected.
    #[must_use]
    pub fn ack(self) -> &'static str {
        match self {
            Topic::AdminSupport => {
                "Admin Support enabled! Send me a message, and I will forward it to the admin."
            },
            Topic::Sponsorship => {
                "Sponsorship option enabled! Send me a message, and I will forward it to the admin."
            },
            Topic::ReportScam => {
                "Report Scam option enabled! Send me a message, and I will forward it to the admin."
            },
        }
    }

    /// Hashtag-style header tag posted alongside each forward in the group.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Topic::AdminSupport => "#Admin_Support",
            Topic::Sponsorship => "#Sponsorship",
            Topic::ReportScam => "#ReportScam",
        }
    }

    /// Match a message text against the topic labels.
    #[must_use]
    pub fn from_label(text: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.label() == text)
    }

    /// Stable identifier used in the sessions table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::AdminSupport => "admin_support",
            Topic::Sponsorship => "sponsorship",
            Topic::ReportScam => "report_scam",
        }
    }

    /// Inverse of [`Topic::as_str`]. Unknown strings map to `None` so a
    /// schema change never poisons existing rows.
    #[must_use]
    pub fn parse(s: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("Admin Support", Some(Topic::AdminSupport))]
    #[case("Sponsorship", Some(Topic::Sponsorship))]
    #[case("Report Scam", Some(Topic::ReportScam))]
    #[case("admin support", None)] // labels are exact
    #[case("report_scam", None)] // storage ids are not labels
    #[case("", None)]
    fn label_matching(#[case] text: &str, #[case] expected: Option<Topic>) {
        assert_eq!(Topic::from_label(text), expected);
    }

    #[test]
    fn storage_id_roundtrip() {
        for topic in Topic::ALL {
            assert_eq!(Topic::parse(topic.as_str()), Some(topic));
        }
        assert_eq!(Topic::parse("unknown"), None);
    }
}
