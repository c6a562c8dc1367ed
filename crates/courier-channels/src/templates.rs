//! Per-kind message templates for the email and SMS channels.
//!
//! Kinds without a dedicated template fall back to the notification's own
//! title and message.

use courier_entity::notification::kind::NotificationKind;
use courier_entity::notification::model::Notification;

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

fn data_title<'a>(notification: &'a Notification, fallback: &'a str) -> &'a str {
    notification
        .data
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or(fallback)
}

fn data_str<'a>(notification: &'a Notification, field: &str) -> Option<&'a str> {
    notification.data.get(field).and_then(|v| v.as_str())
}

/// Render the email subject/text/html for a notification.
pub fn email_content(notification: &Notification) -> EmailContent {
    match NotificationKind::parse(&notification.kind) {
        NotificationKind::ApprovalRequired => {
            let title = data_title(notification, "New Request");
            EmailContent {
                subject: format!("Approval Required: {title}"),
                text: format!("Please review and approve the request: {title}"),
                html: approval_required_html(notification, title),
            }
        }
        NotificationKind::RequestApproved => {
            let title = data_title(notification, "Your Request");
            EmailContent {
                subject: format!("Request Approved: {title}"),
                text: format!("Your request has been approved: {title}"),
                html: request_approved_html(notification, title),
            }
        }
        NotificationKind::RequestRejected => {
            let title = data_title(notification, "Your Request");
            EmailContent {
                subject: format!("Request Rejected: {title}"),
                text: format!("Your request has been rejected: {title}"),
                html: request_rejected_html(notification, title),
            }
        }
        NotificationKind::ApprovalReminder => EmailContent {
            subject: "Reminder: Pending Approval Required".to_string(),
            text: "You have pending approvals that require your attention".to_string(),
            html: "<p>You have pending approvals that require your attention.</p>".to_string(),
        },
        NotificationKind::RequestCancelled => {
            let title = data_title(notification, "Request");
            EmailContent {
                subject: format!("Request Cancelled: {title}"),
                text: format!("Request has been cancelled: {title}"),
                html: format!("<p>Request <strong>{title}</strong> has been cancelled.</p>"),
            }
        }
        NotificationKind::Generic => EmailContent {
            subject: notification.title.clone(),
            text: notification.message.clone(),
            html: format!("<p>{}</p>", notification.message),
        },
    }
}

/// Render the SMS body for a notification.
pub fn sms_message(notification: &Notification) -> String {
    match NotificationKind::parse(&notification.kind) {
        NotificationKind::ApprovalRequired => format!(
            "Approval Required: {}. Please review urgently.",
            data_title(notification, "New Request")
        ),
        NotificationKind::RequestApproved => format!(
            "Your request \"{}\" has been approved.",
            data_title(notification, "Request")
        ),
        NotificationKind::RequestRejected => format!(
            "Your request \"{}\" has been rejected.",
            data_title(notification, "Request")
        ),
        NotificationKind::ApprovalReminder => {
            "Reminder: You have pending approvals requiring your attention.".to_string()
        }
        NotificationKind::RequestCancelled => format!(
            "Request \"{}\" has been cancelled.",
            data_title(notification, "Request")
        ),
        NotificationKind::Generic => notification.message.clone(),
    }
}

fn approval_required_html(notification: &Notification, title: &str) -> String {
    let mut html = format!(
        "<h2>Approval Required</h2>\
         <p><strong>Request:</strong> {title}</p>"
    );
    if let Some(request_type) = data_str(notification, "requestType") {
        html.push_str(&format!("<p><strong>Type:</strong> {request_type}</p>"));
    }
    html.push_str(&format!(
        "<p><strong>Priority:</strong> {}</p>",
        notification.priority
    ));
    if let Some(description) = data_str(notification, "description") {
        html.push_str(&format!("<p>{description}</p>"));
    }
    html.push_str("<p>This is an automated message. Please do not reply.</p>");
    html
}

fn request_approved_html(notification: &Notification, title: &str) -> String {
    let mut html = format!(
        "<h2>Request Approved</h2>\
         <p><strong>Request:</strong> {title}</p>\
         <p>Your request has been approved and is now being processed.</p>"
    );
    if let Some(approved_by) = data_str(notification, "approvedBy") {
        html.push_str(&format!("<p><strong>Approved by:</strong> {approved_by}</p>"));
    }
    html
}

fn request_rejected_html(notification: &Notification, title: &str) -> String {
    let mut html = format!(
        "<h2>Request Rejected</h2>\
         <p><strong>Request:</strong> {title}</p>\
         <p>Your request has been rejected.</p>"
    );
    if let Some(comments) = data_str(notification, "comments") {
        html.push_str(&format!("<p><strong>Reason:</strong> {comments}</p>"));
    }
    html
}
