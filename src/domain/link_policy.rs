//! Usage: External link routing policy for navigation attempts away from
//! the loaded document.
//!
//! Matching is prefix-based on the full URL string, not the origin, so
//! non-network custom schemes route correctly.

/// Where a navigation attempt should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkAction {
    /// Object-reference URL: open a secondary viewer window, suppress the
    /// navigation.
    OpenViewer,
    /// Network URL: hand to the OS default handler, suppress the navigation.
    OpenExternal,
    /// Anything else proceeds in place.
    Navigate,
}

const OBJECT_URL_PREFIX: &str = "blob:";
const NETWORK_URL_PREFIXES: [&str; 2] = ["http://", "https://"];

pub(crate) fn route(url: &str) -> LinkAction {
    if url.starts_with(OBJECT_URL_PREFIX) {
        return LinkAction::OpenViewer;
    }
    if NETWORK_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
    {
        return LinkAction::OpenExternal;
    }
    LinkAction::Navigate
}

/// Navigation that stays on the shell's own HTTPS origin is exempt from
/// routing: the initial load and in-app links proceed in place.
pub(crate) fn stays_in_app(url: &tauri::Url, app_host: &str) -> bool {
    url.scheme() == "https" && url.host_str() == Some(app_host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_reference_urls_open_the_viewer() {
        assert_eq!(route("blob:https://web.eitaa.com/abc-123"), LinkAction::OpenViewer);
        assert_eq!(route("blob:null/xyz"), LinkAction::OpenViewer);
    }

    #[test]
    fn network_urls_go_to_the_os_handler() {
        assert_eq!(route("http://example.com/"), LinkAction::OpenExternal);
        assert_eq!(route("https://example.com/page?q=1"), LinkAction::OpenExternal);
    }

    #[test]
    fn everything_else_navigates_in_place() {
        assert_eq!(route("mailto:someone@example.com"), LinkAction::Navigate);
        assert_eq!(route("tg://resolve?domain=x"), LinkAction::Navigate);
        assert_eq!(route("eitaa://join/abc"), LinkAction::Navigate);
        assert_eq!(route("about:blank"), LinkAction::Navigate);
        assert_eq!(route(""), LinkAction::Navigate);
    }

    #[test]
    fn matching_is_on_the_full_url_string_not_the_origin() {
        // A custom scheme that merely embeds "http" must not match.
        assert_eq!(route("myapp-http://thing"), LinkAction::Navigate);
        assert_eq!(route("httpx://thing"), LinkAction::Navigate);
    }

    #[test]
    fn app_origin_exemption_requires_https_and_exact_host() {
        let host = "web.eitaa.com";

        let in_app: tauri::Url = "https://web.eitaa.com/a/b".parse().unwrap();
        assert!(stays_in_app(&in_app, host));

        let wrong_host: tauri::Url = "https://eitaa.com/".parse().unwrap();
        assert!(!stays_in_app(&wrong_host, host));

        let wrong_scheme: tauri::Url = "http://web.eitaa.com/".parse().unwrap();
        assert!(!stays_in_app(&wrong_scheme, host));

        // blob: URLs parse without a host and never count as in-app.
        let object_url: tauri::Url = "blob:https://web.eitaa.com/uuid".parse().unwrap();
        assert!(!stays_in_app(&object_url, host));
    }
}
