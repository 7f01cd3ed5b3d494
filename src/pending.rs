use crate::error::{PlannerError, Result};
use log::warn;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Extraction,
    Advice,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction => f.write_str("extraction"),
            Self::Advice => f.write_str("advice"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: RequestKind,
    pub id: u64,
}

/// Tracks outstanding collaborator calls. Only the most recently issued request of a kind may
/// apply its result; anything older is rejected when it arrives.
#[derive(Debug, Default)]
pub struct RequestGuard {
    next_id: u64,
    latest: HashMap<RequestKind, u64>,
    outstanding: HashMap<RequestKind, u64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.next_id += 1;
        let id = self.next_id;
        self.latest.insert(kind, id);
        self.outstanding.insert(kind, id);
        RequestToken { kind, id }
    }

    /// True while the latest request of `kind` has not come back.
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.outstanding.contains_key(&kind)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.get(&token.kind) == Some(&token.id)
    }

    /// Settles a response. Stale tokens leave the pending state of newer requests untouched.
    pub fn accept(&mut self, token: RequestToken) -> Result<()> {
        let latest = self.latest.get(&token.kind).copied().unwrap_or(0);
        if latest != token.id {
            warn!(
                "Discarding {} response #{}; newer request #{} supersedes it",
                token.kind, token.id, latest
            );
            return Err(PlannerError::StaleResponse {
                kind: token.kind.to_string(),
                token: token.id,
                latest,
            });
        }
        if self.outstanding.get(&token.kind) != Some(&token.id) {
            warn!("Ignoring repeated {} response #{}", token.kind, token.id);
            return Err(PlannerError::AlreadySettled {
                kind: token.kind.to_string(),
                token: token.id,
            });
        }
        self.outstanding.remove(&token.kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_accepted() {
        let mut guard = RequestGuard::new();
        assert!(!guard.is_pending(RequestKind::Extraction));

        let token = guard.issue(RequestKind::Extraction);
        assert!(guard.is_pending(RequestKind::Extraction));
        assert!(!guard.is_pending(RequestKind::Advice));

        guard.accept(token).unwrap();
        assert!(!guard.is_pending(RequestKind::Extraction));
    }

    #[test]
    fn test_latest_response_applies_only_once() {
        let mut guard = RequestGuard::new();
        let token = guard.issue(RequestKind::Advice);
        guard.accept(token).unwrap();
        assert!(matches!(
            guard.accept(token),
            Err(PlannerError::AlreadySettled { token: 1, .. })
        ));
        assert!(!guard.is_pending(RequestKind::Advice));

        let next = guard.issue(RequestKind::Advice);
        assert!(guard.accept(token).is_err());
        guard.accept(next).unwrap();
    }

    #[test]
    fn test_older_response_is_discarded_in_either_arrival_order() {
        let mut guard = RequestGuard::new();
        let first = guard.issue(RequestKind::Extraction);
        let second = guard.issue(RequestKind::Extraction);

        assert!(matches!(
            guard.accept(first),
            Err(PlannerError::StaleResponse { token: 1, latest: 2, .. })
        ));
        assert!(guard.is_pending(RequestKind::Extraction));
        guard.accept(second).unwrap();

        let third = guard.issue(RequestKind::Extraction);
        let fourth = guard.issue(RequestKind::Extraction);
        guard.accept(fourth).unwrap();
        assert!(guard.accept(third).is_err());
        assert!(!guard.is_pending(RequestKind::Extraction));
    }

    #[test]
    fn test_kinds_do_not_supersede_each_other() {
        let mut guard = RequestGuard::new();
        let extraction = guard.issue(RequestKind::Extraction);
        let advice = guard.issue(RequestKind::Advice);
        assert!(guard.is_current(extraction));
        guard.accept(advice).unwrap();
        guard.accept(extraction).unwrap();
    }
}
