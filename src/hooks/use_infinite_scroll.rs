use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Minimum time between two load-more triggers
const TRIGGER_INTERVAL_MS: u64 = 1000;

/// Rate limit for sentinel intersections
#[derive(Clone, Copy, Debug)]
pub struct ScrollDebounce {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl ScrollDebounce {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// Whether an intersection at `now_ms` should trigger; records the trigger if so
    pub fn should_fire(&mut self, now_ms: u64) -> bool {
        let ready = match self.last_fired_ms {
            Some(last) => now_ms.saturating_sub(last) > self.interval_ms,
            None => true,
        };
        if ready {
            self.last_fired_ms = Some(now_ms);
        }
        ready
    }
}

impl Default for ScrollDebounce {
    fn default() -> Self {
        Self::new(TRIGGER_INTERVAL_MS)
    }
}

/// A DOM watcher that must be stopped before it is dropped or replaced
pub trait Disconnect {
    fn disconnect(&self);
}

/// The single live observer of one hook instance
#[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
pub struct ObserverSlot<T: Disconnect> {
    current: Option<T>,
}

#[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
impl<T: Disconnect> ObserverSlot<T> {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Disconnect the previous observer, then keep `observer`
    pub fn install(&mut self, observer: T) {
        self.clear();
        self.current = Some(observer);
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.disconnect();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(target_family = "wasm")]
struct SentinelObserver {
    observer: web_sys::IntersectionObserver,
    // dropped only after disconnect, so the browser never calls a freed closure
    _on_intersect: wasm_bindgen::closure::Closure<dyn FnMut(js_sys::Array)>,
}

#[cfg(target_family = "wasm")]
impl Disconnect for SentinelObserver {
    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Infinite scroll hook that triggers loading when a sentinel element enters the viewport
///
/// Returns the id to put on a sentinel element below the feed. The observer is
/// only armed while `has_more` is true and `loading` is false.
///
/// ```ignore
/// let sentinel_id = use_infinite_scroll(move || load_more(), has_more, loading);
///
/// rsx! { div { id: "{sentinel_id}", class: "h-4" } }
/// ```
pub fn use_infinite_scroll<F>(callback: F, has_more: Signal<bool>, loading: Signal<bool>) -> String
where
    F: FnMut() + 'static,
{
    let sentinel_id = use_hook(|| format!("scroll-sentinel-{}", uuid::Uuid::new_v4()));

    #[cfg_attr(not(target_family = "wasm"), allow(unused_variables))]
    let debounce = use_hook(|| Rc::new(RefCell::new(ScrollDebounce::default())));

    #[cfg_attr(not(target_family = "wasm"), allow(unused_variables))]
    let cb = use_hook(|| Rc::new(RefCell::new(callback)));

    #[cfg_attr(not(target_family = "wasm"), allow(unused_variables))]
    let id_for_effect = sentinel_id.clone();

    #[cfg(target_family = "wasm")]
    let slot = use_hook(|| Rc::new(RefCell::new(ObserverSlot::<SentinelObserver>::new())));

    #[cfg(target_family = "wasm")]
    {
        let slot = slot.clone();
        use_drop(move || slot.borrow_mut().clear());
    }

    use_effect(move || {
        let enabled = *has_more.read() && !*loading.read();
        if !enabled {
            log::debug!("Infinite scroll disarmed: has_more={}, loading={}", has_more.peek(), loading.peek());
            #[cfg(target_family = "wasm")]
            slot.borrow_mut().clear();
            return;
        }

        #[cfg(target_family = "wasm")]
        {
            use wasm_bindgen::prelude::*;
            use wasm_bindgen::JsCast;

            let id = id_for_effect.clone();
            let cb = cb.clone();
            let debounce = debounce.clone();
            let slot = slot.clone();

            spawn(async move {
                // let the sentinel render first
                gloo_timers::future::TimeoutFuture::new(100).await;
                if !*has_more.peek() || *loading.peek() {
                    return;
                }

                let Some(element) = web_sys::window()
                    .and_then(|window| window.document())
                    .and_then(|document| document.get_element_by_id(&id))
                else {
                    log::debug!("Scroll sentinel {} not in the DOM", id);
                    return;
                };

                let on_intersect = Closure::wrap(Box::new(move |entries: js_sys::Array| {
                    let visible = entries.iter().any(|entry| {
                        entry
                            .dyn_into::<web_sys::IntersectionObserverEntry>()
                            .map(|entry| entry.is_intersecting())
                            .unwrap_or(false)
                    });
                    if visible && debounce.borrow_mut().should_fire(js_sys::Date::now() as u64) {
                        log::debug!("Scroll sentinel visible, loading more");
                        (cb.borrow_mut())();
                    }
                }) as Box<dyn FnMut(js_sys::Array)>);

                let options = web_sys::IntersectionObserverInit::new();
                // start loading before the sentinel is on screen
                options.set_root_margin("300px");

                let observer = match web_sys::IntersectionObserver::new_with_options(
                    on_intersect.as_ref().unchecked_ref(),
                    &options,
                ) {
                    Ok(observer) => observer,
                    Err(e) => {
                        log::error!("Failed to create IntersectionObserver: {:?}", e);
                        return;
                    }
                };

                observer.observe(&element);
                slot.borrow_mut().install(SentinelObserver {
                    observer,
                    _on_intersect: on_intersect,
                });
            });
        }
    });

    sentinel_id
}
