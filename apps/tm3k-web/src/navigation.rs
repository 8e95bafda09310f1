use dominator::routing;
use tm3k_app::{Navigator, Route};
use tracing::debug;

/// Pushes routes onto the browser history; the router re-renders from the URL signal.
///
/// Navigating to the route already shown is a no-op, so a redirect followed by an
/// explicit navigation to the same view leaves a single history entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    pub fn current_route(&self) -> Route {
        Route::from_url(&routing::url().lock_ref())
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, route: Route) {
        if self.current_route() == route {
            debug!(%route, "Already there");
            return;
        }

        debug!(%route, "Navigating");
        routing::go_to_url(route.path());
    }
}
