use super::ReachabilityService;

/// Connectivity as reported by the browser (`navigator.onLine`)
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserReachability;

impl ReachabilityService for BrowserReachability {
    fn is_reachable(&self) -> bool {
        #[cfg(target_family = "wasm")]
        {
            match web_sys::window() {
                Some(window) => window.navigator().on_line(),
                None => {
                    log::warn!("No window object, assuming online");
                    true
                }
            }
        }

        #[cfg(not(target_family = "wasm"))]
        {
            true
        }
    }
}
