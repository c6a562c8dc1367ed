//! Notification kind: the event vocabulary driving template selection.

use std::fmt;

/// Known notification kinds.
///
/// The stored `kind` field is a free string; this enumeration is the
/// template-selection view of it. Anything outside the known vocabulary
/// maps to [`NotificationKind::Generic`], which renders the record's own
/// title and message instead of a kind-specific template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A request awaits the recipient's approval.
    ApprovalRequired,
    /// The recipient's request was approved.
    RequestApproved,
    /// The recipient's request was rejected.
    RequestRejected,
    /// Reminder about outstanding approvals.
    ApprovalReminder,
    /// A request was cancelled.
    RequestCancelled,
    /// Unrecognized kind; generic template.
    Generic,
}

impl NotificationKind {
    /// Parse a stored kind string, falling back to `Generic`.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "approval_required" => Self::ApprovalRequired,
            "request_approved" => Self::RequestApproved,
            "request_rejected" => Self::RequestRejected,
            "approval_reminder" => Self::ApprovalReminder,
            "request_cancelled" => Self::RequestCancelled,
            _ => Self::Generic,
        }
    }

    /// Default title used when a submission omits one.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::ApprovalRequired => "Approval Required",
            Self::RequestApproved => "Request Approved",
            Self::RequestRejected => "Request Rejected",
            Self::ApprovalReminder => "Approval Reminder",
            Self::RequestCancelled => "Request Cancelled",
            Self::Generic => "Notification",
        }
    }

    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovalRequired => "approval_required",
            Self::RequestApproved => "request_approved",
            Self::RequestRejected => "request_rejected",
            Self::ApprovalReminder => "approval_reminder",
            Self::RequestCancelled => "request_cancelled",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_parse() {
        assert_eq!(
            NotificationKind::parse("approval_required"),
            NotificationKind::ApprovalRequired
        );
        assert_eq!(
            NotificationKind::parse("request_cancelled"),
            NotificationKind::RequestCancelled
        );
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        assert_eq!(
            NotificationKind::parse("order_shipped"),
            NotificationKind::Generic
        );
        assert_eq!(NotificationKind::Generic.default_title(), "Notification");
    }
}
