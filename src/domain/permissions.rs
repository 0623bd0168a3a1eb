//! Usage: Permission gate policy for the embedded page.
//!
//! Stateless and synchronous: the notification capability is granted,
//! every other requested capability is denied unconditionally.

pub(crate) const NOTIFICATIONS: &str = "notifications";

pub(crate) fn allow(permission: &str) -> bool {
    permission == NOTIFICATIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_notifications_is_granted() {
        assert!(allow("notifications"));
        assert!(allow(NOTIFICATIONS));
    }

    #[test]
    fn every_other_permission_is_denied() {
        for permission in [
            "geolocation",
            "camera",
            "microphone",
            "media",
            "midi",
            "push",
            "persistent-storage",
            "clipboard-read",
            "clipboard-write",
            "screen-wake-lock",
            "pointer-lock",
            "device-info",
            "background-sync",
            "accelerometer",
            "gyroscope",
            "magnetometer",
            "payment-handler",
            "fullscreen",
            "unknown",
            "",
            "Notifications",
            "notifications ",
        ] {
            assert!(!allow(permission), "{permission:?} must be denied");
        }
    }
}
