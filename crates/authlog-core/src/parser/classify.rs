// Ordered multi-pattern event classification for auth messages

use regex::{Captures, Regex};

use crate::EventType;

/// Classification result: event kind plus the fields pulled out of the message
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    pub event_type: EventType,
    pub username: String,
    pub ip_address: String,
}

// A single classification rule: a compiled pattern plus a field extractor.
// Rules are tried in order and the first match wins, so adding a new
// authentication-failure signature means pushing another rule, not touching
// the existing ones.
struct Rule {
    pattern: Regex,
    extract: fn(&Captures<'_>) -> ClassifiedEvent,
}

/// First-match-wins classifier over the known auth-failure message shapes
pub struct EventClassifier {
    rules: Vec<Rule>,
}

impl EventClassifier {
    pub fn new() -> Self {
        Self {
            rules: vec![
                // Failed password, with optional "invalid user " qualifier.
                // Must stay ahead of the invalid-user rule: a message matching
                // both resolves as a failed login.
                Rule {
                    pattern: Regex::new(
                        r"Failed password for (invalid user )?(?P<username>\S+) from (?P<ip>\d{1,3}(?:\.\d{1,3}){3})",
                    )
                    .unwrap(),
                    extract: |caps| ClassifiedEvent {
                        event_type: if caps.get(1).is_some() {
                            EventType::FailedLoginInvalidUser
                        } else {
                            EventType::FailedLogin
                        },
                        username: caps["username"].to_string(),
                        ip_address: caps["ip"].to_string(),
                    },
                },
                // Invalid user probe (no password attempt)
                Rule {
                    pattern: Regex::new(
                        r"Invalid user (?P<username>\S+) from (?P<ip>\d{1,3}(?:\.\d{1,3}){3})",
                    )
                    .unwrap(),
                    extract: |caps| ClassifiedEvent {
                        event_type: EventType::InvalidUser,
                        username: caps["username"].to_string(),
                        ip_address: caps["ip"].to_string(),
                    },
                },
                // PAM authentication failure. rhost= may carry a hostname
                // rather than a dotted quad; it is kept verbatim.
                Rule {
                    pattern: Regex::new(
                        r"(?i)authentication failure;.*?rhost=(?P<ip>[\w.-]+?)\s+user=(?P<username>\S+)",
                    )
                    .unwrap(),
                    extract: |caps| ClassifiedEvent {
                        event_type: EventType::PamAuthFailure,
                        username: caps["username"].to_string(),
                        ip_address: caps["ip"].to_string(),
                    },
                },
            ],
        }
    }

    /// Classify a message, returning None when no rule matches
    pub fn classify(&self, message: &str) -> Option<ClassifiedEvent> {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(message) {
                return Some((rule.extract)(&caps));
            }
        }
        None
    }
}
