//! Caller check applied before any handler work.
//!
//! The check is an allowlist by user-agent substring. It is trivially
//! spoofable and only suitable for a low-stakes internal integration.

use crate::models::InboundEvent;
use thiserror::Error;

pub const USER_AGENT_HEADER: &str = "user-agent";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("user-agent header is missing")]
    MissingUserAgent,

    #[error("user-agent does not identify the expected caller")]
    UnknownCaller,
}

#[derive(Debug, Clone)]
pub struct Authorizer {
    marker: String,
}

impl Authorizer {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn check(&self, event: &InboundEvent) -> Result<(), Rejection> {
        let user_agent = event
            .header(USER_AGENT_HEADER)
            .ok_or(Rejection::MissingUserAgent)?;

        if user_agent.contains(&self.marker) {
            Ok(())
        } else {
            Err(Rejection::UnknownCaller)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn event_with_agent(agent: &str) -> InboundEvent {
        InboundEvent::new(
            HashMap::from([("user-agent".to_string(), agent.to_string())]),
            None,
        )
    }

    #[test]
    fn accepts_agent_containing_marker() {
        let authorizer = Authorizer::new("AppsheetBot");
        assert!(authorizer
            .check(&event_with_agent("Mozilla/5.0 (compatible; AppsheetBot/2.1)"))
            .is_ok());
    }

    #[test]
    fn rejects_other_agents() {
        let authorizer = Authorizer::new("AppsheetBot");
        assert_eq!(
            authorizer.check(&event_with_agent("curl/7.0")),
            Err(Rejection::UnknownCaller)
        );
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let authorizer = Authorizer::new("AppsheetBot");
        assert_eq!(
            authorizer.check(&event_with_agent("appsheetbot")),
            Err(Rejection::UnknownCaller)
        );
    }

    #[test]
    fn rejects_missing_user_agent() {
        let authorizer = Authorizer::new("AppsheetBot");
        assert_eq!(
            authorizer.check(&InboundEvent::default()),
            Err(Rejection::MissingUserAgent)
        );
    }
}
