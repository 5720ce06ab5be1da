use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use payloads::ClientError;
use yew::prelude::*;

use super::FetchState;

/// Generic fetch hook return type
pub struct FetchHookReturn<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<Rc<ClientError>>,
    pub refetch: Callback<()>,
}

impl<T: Clone> FetchHookReturn<T> {
    /// The error as shown to users, generic for network and server failures.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.user_message())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.error.as_deref(), Some(ClientError::NotFound(_)))
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// - No data + loading: "Loading {context}..."
    /// - No data + error: the error's user message
    /// - Has data: `render_fn(data, is_loading)`, so a refetch keeps showing
    ///   the previous data
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool) -> Html,
    {
        match self.data.as_ref() {
            None => {
                if self.is_loading {
                    html! {
                        <div class="text-center py-12">
                            <p class="text-neutral-600 dark:text-neutral-400">
                                {format!("Loading {}...", context)}
                            </p>
                        </div>
                    }
                } else if let Some(error) = self.error_message() {
                    html! {
                        <div class="p-4 rounded-md bg-red-50 \
                                   dark:bg-red-900/20 border \
                                   border-red-200 dark:border-red-800">
                            <p class="text-sm text-red-700 \
                                      dark:text-red-400">
                                {error}
                            </p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            Some(data) => render_fn(data, self.is_loading),
        }
    }
}

/// Tracks the most recent request so that a response arriving after a newer
/// request was issued cannot overwrite newer state.
#[derive(Default)]
struct Generation(u64);

impl Generation {
    fn next(cell: &RefCell<Generation>) -> u64 {
        let mut generation = cell.borrow_mut();
        generation.0 += 1;
        generation.0
    }

    fn is_current(cell: &RefCell<Generation>, generation: u64) -> bool {
        cell.borrow().0 == generation
    }
}

/// A fetch error together with the deps it was fetched for, so that it is
/// never reported against other deps.
struct KeyedError<D> {
    deps: D,
    error: Rc<ClientError>,
}

impl<D: PartialEq> KeyedError<D> {
    fn for_deps(slot: &Option<Self>, deps: &D) -> Option<Rc<ClientError>> {
        slot.as_ref()
            .filter(|keyed| keyed.deps == *deps)
            .map(|keyed| keyed.error.clone())
    }
}

/// Generic fetch hook composer.
///
/// Automatically fetches on mount and whenever `deps` change, and provides
/// refetch capability. The fetch function captures its inputs from the
/// closure; `deps` is used only for dependency tracking.
///
/// # Example
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_search(term: String) -> FetchHookReturn<Vec<Property>> {
///     use_fetch(term.clone(), move || {
///         let criteria = SearchCriteria { address: term.clone() };
///         async move { get_api_client().search(&criteria).await }
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, ClientError>> + 'static,
{
    let data = use_state(|| FetchState::NotFetched);
    let error = use_state(|| None::<Rc<ClientError>>);
    let is_loading = use_state(|| false);
    let generation = use_mut_ref(Generation::default);

    let refetch = {
        let data = data.clone();
        let error = error.clone();
        let is_loading = is_loading.clone();
        let fetch_fn = Rc::new(fetch_fn);

        use_callback(deps.clone(), move |_, _| {
            let data = data.clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            let fetch_fn = fetch_fn.clone();
            let generation = generation.clone();
            let current = Generation::next(&generation);

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error.set(None);

                let result = fetch_fn().await;
                if !Generation::is_current(&generation, current) {
                    return;
                }
                match result {
                    Ok(result) => {
                        data.set(FetchState::Fetched(result));
                    }
                    Err(e) => {
                        tracing::debug!("Fetch failed: {e}");
                        error.set(Some(Rc::new(e)));
                    }
                }

                is_loading.set(false);
            });
        })
    };

    // Auto-fetch on mount and when deps change
    {
        let refetch = refetch.clone();
        use_effect_with(deps, move |_| refetch.emit(()));
    }

    FetchHookReturn {
        data: (*data).clone(),
        is_loading: *is_loading,
        error: (*error).clone(),
        refetch: Callback::from(move |_| refetch.emit(())),
    }
}

/// Generic fetch hook with global state caching support.
///
/// Like `use_fetch`, but the data lives in the Yewdux store:
///
/// 1. `get_cached`: reads the cached value for the current deps
/// 2. `fetch_and_cache`: performs the API call and writes the result into
///    the store
///
/// A fetch is issued on mount and on every deps change for which nothing is
/// cached yet. The returned data is whatever the store holds for the current
/// deps, so a late response for earlier deps only fills its own cache slot.
#[hook]
pub fn use_fetch_with_cache<T, D, GetCached, FetchAndCache, Fut>(
    deps: D,
    get_cached: GetCached,
    fetch_and_cache: FetchAndCache,
) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    GetCached: Fn() -> Option<T> + 'static,
    FetchAndCache: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<(), ClientError>> + 'static,
{
    let error = use_state(|| None::<KeyedError<D>>);
    let is_loading = use_state(|| false);
    let generation = use_mut_ref(Generation::default);

    let refetch = {
        let error = error.clone();
        let is_loading = is_loading.clone();
        let generation = generation.clone();
        let fetch_and_cache = Rc::new(fetch_and_cache);

        use_callback(deps.clone(), move |_, deps| {
            let error = error.clone();
            let is_loading = is_loading.clone();
            let fetch_and_cache = fetch_and_cache.clone();
            let generation = generation.clone();
            let deps = deps.clone();
            let current = Generation::next(&generation);

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error.set(None);

                let result = fetch_and_cache().await;
                if !Generation::is_current(&generation, current) {
                    return;
                }
                if let Err(e) = result {
                    tracing::debug!("Fetch failed: {e}");
                    error.set(Some(KeyedError {
                        deps,
                        error: Rc::new(e),
                    }));
                }

                is_loading.set(false);
            });
        })
    };

    let cached = get_cached();

    // Auto-fetch on mount and on deps change, unless already cached. Either
    // way a response still in flight for the old deps is now stale.
    {
        let refetch = refetch.clone();
        let is_loading = is_loading.clone();
        let is_cached = cached.is_some();
        use_effect_with(deps.clone(), move |_| {
            if is_cached {
                Generation::next(&generation);
                if *is_loading {
                    is_loading.set(false);
                }
            } else {
                refetch.emit(());
            }
        });
    }

    let data = match cached {
        Some(cached) => FetchState::Fetched(cached),
        None => FetchState::NotFetched,
    };

    let current_error = KeyedError::for_deps(&*error, &deps);

    // Nothing cached and no error yet means a fetch is about to start
    let effective_is_loading =
        *is_loading || (!data.is_fetched() && current_error.is_none());

    FetchHookReturn {
        data,
        is_loading: effective_is_loading,
        error: current_error,
        refetch: Callback::from(move |_| refetch.emit(())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_error_is_only_reported_for_its_own_deps() {
        let slot = Some(KeyedError {
            deps: 1u32,
            error: Rc::new(ClientError::NotFound("page 1".into())),
        });
        assert!(KeyedError::for_deps(&slot, &1).is_some());
        assert!(KeyedError::for_deps(&slot, &0).is_none());
        assert!(KeyedError::for_deps(&None, &1).is_none());
    }

    #[test]
    fn a_newer_generation_makes_older_responses_stale() {
        let generation = RefCell::new(Generation::default());
        let first = Generation::next(&generation);
        assert!(Generation::is_current(&generation, first));

        // deps changed to a cached key: no refetch, only the bump
        Generation::next(&generation);
        assert!(!Generation::is_current(&generation, first));
    }
}
