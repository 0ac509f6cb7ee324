//! The decision type returned by every layer of the gate.

/// The gate's verdict on a command or file operation.
///
/// Precedence when combining: an `Ask` carrying guidance outranks a
/// plain `Ask`, both outrank `Pass`, and `Allow` survives only when
/// every check agreed. The driver short-circuits on the first
/// non-`Allow`, so combination never has to merge two prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Skip the user prompt; the reason is reported to the host.
    Allow(String),
    /// Prompt the user. `suggestion` carries advice to surface to the
    /// assistant alongside the prompt.
    Ask {
        reason: String,
        suggestion: Option<String>,
    },
    /// No opinion — stay silent and let the host apply its own policy.
    Pass,
}

impl Decision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Decision::Allow(reason.into())
    }

    pub fn ask(reason: impl Into<String>) -> Self {
        Decision::Ask {
            reason: reason.into(),
            suggestion: None,
        }
    }

    pub fn guide(reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Decision::Ask {
            reason: reason.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    /// Label used in the audit log: `allow`, `prompt`, or `feedback`.
    pub fn audit_label(&self) -> Option<&'static str> {
        match self {
            Decision::Allow(_) => Some("allow"),
            Decision::Ask {
                suggestion: Some(_),
                ..
            } => Some("feedback"),
            Decision::Ask { .. } => Some("prompt"),
            Decision::Pass => None,
        }
    }

    /// The human-readable reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow(reason) | Decision::Ask { reason, .. } => Some(reason),
            Decision::Pass => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_labels() {
        assert_eq!(Decision::allow("ok").audit_label(), Some("allow"));
        assert_eq!(Decision::ask("no").audit_label(), Some("prompt"));
        assert_eq!(
            Decision::guide("no", "use jq").audit_label(),
            Some("feedback")
        );
        assert_eq!(Decision::Pass.audit_label(), None);
    }

    #[test]
    fn reasons() {
        assert_eq!(Decision::allow("ok").reason(), Some("ok"));
        assert_eq!(Decision::Pass.reason(), None);
    }
}
