//! Channel routing rules.
//!
//! Routing is a pure function of the recipient's contact facts, their
//! preferences, and the notification priority. It runs exactly once, at
//! submission time; the resolved set is persisted on the record and reused
//! by every later processing pass.

use courier_entity::notification::priority::NotificationPriority;
use courier_entity::recipient::Recipient;

use crate::adapter::names;

/// Resolve the eligible channel set for a recipient and priority.
///
/// Rules, applied in order:
/// - email: recipient has an email address and priority is urgent or high
/// - sms: recipient has a phone number and priority is urgent
/// - realtime: always eligible
/// - push: recipient has a device token
///
/// The result is then filtered by the recipient's opt-out preferences. The
/// set can legitimately come out empty.
pub fn resolve_channels(recipient: &Recipient, priority: NotificationPriority) -> Vec<String> {
    let mut channels = Vec::new();

    if recipient.email.is_some()
        && matches!(
            priority,
            NotificationPriority::Urgent | NotificationPriority::High
        )
    {
        channels.push(names::EMAIL);
    }

    if recipient.phone.is_some() && priority == NotificationPriority::Urgent {
        channels.push(names::SMS);
    }

    channels.push(names::REALTIME);

    if recipient.device_token.is_some() {
        channels.push(names::PUSH);
    }

    channels
        .into_iter()
        .filter(|c| recipient.allows_channel(c))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_recipient() -> Recipient {
        Recipient {
            user_id: Some("u1".into()),
            email: Some("a@b.com".into()),
            phone: Some("+15550001".into()),
            device_token: Some("tok".into()),
            preferences: None,
        }
    }

    #[test]
    fn test_urgent_gets_all_channels() {
        let channels = resolve_channels(&full_recipient(), NotificationPriority::Urgent);
        assert_eq!(channels, vec!["email", "sms", "realtime", "push"]);
    }

    #[test]
    fn test_high_drops_sms() {
        let channels = resolve_channels(&full_recipient(), NotificationPriority::High);
        assert_eq!(channels, vec!["email", "realtime", "push"]);
    }

    #[test]
    fn test_normal_drops_email_and_sms() {
        let channels = resolve_channels(&full_recipient(), NotificationPriority::Normal);
        assert_eq!(channels, vec!["realtime", "push"]);
    }

    #[test]
    fn test_realtime_always_eligible() {
        let bare = Recipient {
            user_id: Some("u1".into()),
            ..Default::default()
        };
        let channels = resolve_channels(&bare, NotificationPriority::Low);
        assert_eq!(channels, vec!["realtime"]);
    }

    #[test]
    fn test_preferences_override_priority() {
        let mut prefs = HashMap::new();
        prefs.insert("email".to_string(), false);
        prefs.insert("realtime".to_string(), false);
        let mut recipient = full_recipient();
        recipient.preferences = Some(prefs);

        let channels = resolve_channels(&recipient, NotificationPriority::Urgent);
        assert_eq!(channels, vec!["sms", "push"]);
    }

    #[test]
    fn test_all_opted_out_is_empty() {
        let mut prefs = HashMap::new();
        prefs.insert("realtime".to_string(), false);
        let recipient = Recipient {
            user_id: Some("u1".into()),
            preferences: Some(prefs),
            ..Default::default()
        };
        let channels = resolve_channels(&recipient, NotificationPriority::Normal);
        assert!(channels.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let recipient = full_recipient();
        let a = resolve_channels(&recipient, NotificationPriority::Urgent);
        let b = resolve_channels(&recipient, NotificationPriority::Urgent);
        assert_eq!(a, b);
    }
}
