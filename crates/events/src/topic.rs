use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    UserCreated,
    UserUpdated,
    CustomerCreated,
    EventCreated,
    EventUpdated,
    EventDeleted,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::UserCreated,
        Topic::UserUpdated,
        Topic::CustomerCreated,
        Topic::EventCreated,
        Topic::EventUpdated,
        Topic::EventDeleted,
    ];

    /// Subscription field name as exposed to clients (e.g. `eventCreated`).
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::UserCreated => "userCreated",
            Topic::UserUpdated => "userUpdated",
            Topic::CustomerCreated => "customerCreated",
            Topic::EventCreated => "eventCreated",
            Topic::EventUpdated => "eventUpdated",
            Topic::EventDeleted => "eventDeleted",
        }
    }
}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic '{0}'")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_subscription_name() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn serializes_as_subscription_name() {
        assert_eq!(serde_json::to_value(Topic::CustomerCreated).unwrap(), "customerCreated");
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!("EventCreated".parse::<Topic>(), Err(UnknownTopic("EventCreated".to_string())));
    }
}
