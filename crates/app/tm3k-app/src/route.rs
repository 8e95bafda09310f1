//! Navigation targets.

use std::fmt;
use url::Url;

// Only used to resolve paths without an origin.
const RELATIVE_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Task editor, behind the session gate.
    Main,
    /// Sign-in / sign-up form.
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Main => "/",
            Route::Login => "/auth",
        }
    }

    /// Resolves a URL or path; anything unknown or unparsable lands on the main view.
    pub fn from_url(url: &str) -> Self {
        let parsed = Url::parse(url).or_else(|_| Url::parse(RELATIVE_BASE)?.join(url));

        match parsed {
            Ok(parsed) if parsed.path().trim_end_matches('/') == "/auth" => Route::Login,
            _ => Route::Main,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user between views.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_and_full_urls() {
        assert_eq!(Route::from_url("/"), Route::Main);
        assert_eq!(Route::from_url("/auth"), Route::Login);
        assert_eq!(Route::from_url("/auth/"), Route::Login);
        assert_eq!(Route::from_url("/auth?next=1"), Route::Login);
        assert_eq!(Route::from_url("http://localhost:8080/auth#top"), Route::Login);
        assert_eq!(Route::from_url("http://localhost:8080"), Route::Main);
        assert_eq!(Route::from_url("/elsewhere"), Route::Main);
    }

    #[test]
    fn query_and_fragment_do_not_pick_the_route() {
        assert_eq!(Route::from_url("http://localhost:8080?next=/auth"), Route::Main);
        assert_eq!(Route::from_url("http://localhost:8080#/auth"), Route::Main);
        assert_eq!(Route::from_url("/?next=/auth"), Route::Main);
        assert_eq!(Route::from_url("https://tasks.example.com/auth?next=/"), Route::Login);
    }

    #[test]
    fn unparsable_urls_land_on_main() {
        assert_eq!(Route::from_url("http://exa mple.com/auth"), Route::Main);
        assert_eq!(Route::from_url("http://[::1/auth"), Route::Main);
    }

    #[test]
    fn paths_round_trip() {
        for route in [Route::Main, Route::Login] {
            assert_eq!(Route::from_url(route.path()), route);
        }
    }
}
