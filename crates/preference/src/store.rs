use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::{runtime::Handle, sync::broadcast, task::JoinHandle};

use crate::{
    COLOR_SCHEME_KEY, ColorScheme, Preference, PreferenceEvent, PreferenceStorage, THEME_KEY,
    Theme,
};

pub const TRANSITION_WINDOW: Duration = Duration::from_millis(800);

struct State {
    preference: Preference,
    generation: u64,
    transition: Option<JoinHandle<()>>,
}

struct Inner {
    storage: Box<dyn PreferenceStorage>,
    state: Mutex<State>,
    events: broadcast::Sender<PreferenceEvent>,
    transition_window: Duration,
}

/// Shared holder of the visual preferences.
///
/// Clones share the same state. Every change is persisted before it becomes
/// visible and is then broadcast to all subscribers.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<Inner>,
}

impl PreferenceStore {
    pub fn load(storage: impl PreferenceStorage + 'static) -> Self {
        Self::with_transition_window(storage, TRANSITION_WINDOW)
    }

    pub fn with_transition_window(
        storage: impl PreferenceStorage + 'static,
        transition_window: Duration,
    ) -> Self {
        let preference = Preference {
            theme: rehydrate(&storage, THEME_KEY, Theme::parse),
            color_scheme: rehydrate(&storage, COLOR_SCHEME_KEY, ColorScheme::parse),
            is_transitioning: false,
        };

        tracing::debug!(
            theme = %preference.theme,
            color_scheme = %preference.color_scheme,
            "Preferences loaded"
        );

        let (events, _) = broadcast::channel(16);

        Self {
            inner: Arc::new(Inner {
                storage: Box::new(storage),
                state: Mutex::new(State {
                    preference,
                    generation: 0,
                    transition: None,
                }),
                events,
                transition_window,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: PreferenceEvent) {
        // No subscriber is not an error.
        let _ = self.inner.events.send(event);
    }

    pub fn snapshot(&self) -> Preference {
        self.lock().preference
    }

    pub fn theme(&self) -> Theme {
        self.lock().preference.theme
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.lock().preference.color_scheme
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock().preference.is_transitioning
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceEvent> {
        self.inner.events.subscribe()
    }

    pub fn toggle_theme(&self) -> folio_shared::Result<Theme> {
        let mut state = self.lock();
        let theme = state.preference.theme.toggled();
        self.apply_theme(&mut state, theme)?;

        Ok(theme)
    }

    /// Returns `false` when `theme` is already active.
    pub fn set_theme(&self, theme: Theme) -> folio_shared::Result<bool> {
        let mut state = self.lock();
        if state.preference.theme == theme {
            return Ok(false);
        }

        self.apply_theme(&mut state, theme)?;

        Ok(true)
    }

    fn apply_theme(&self, state: &mut State, theme: Theme) -> folio_shared::Result<()> {
        self.inner.storage.set(THEME_KEY, theme.as_ref())?;
        state.preference.theme = theme;
        self.publish(PreferenceEvent::ThemeChanged(theme));

        tracing::info!(theme = %theme, "Theme changed");

        Ok(())
    }

    /// Switches palette and opens the transition window. Returns `false`
    /// without side effects when `scheme` is already active.
    pub fn set_color_scheme(&self, scheme: ColorScheme) -> folio_shared::Result<bool> {
        let mut state = self.lock();
        if state.preference.color_scheme == scheme {
            return Ok(false);
        }

        self.inner.storage.set(COLOR_SCHEME_KEY, scheme.as_ref())?;

        if !state.preference.is_transitioning {
            state.preference.is_transitioning = true;
            self.publish(PreferenceEvent::TransitionStarted);
        }

        state.preference.color_scheme = scheme;
        self.publish(PreferenceEvent::ColorSchemeChanged(scheme));

        tracing::info!(color_scheme = %scheme, "Color scheme changed");

        self.restart_transition(&mut state);

        Ok(true)
    }

    fn restart_transition(&self, state: &mut State) {
        if let Some(handle) = state.transition.take() {
            handle.abort();
        }

        state.generation += 1;
        let generation = state.generation;

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No runtime to time the color transition, ending it now");
            self.end_transition(state, generation);
            return;
        };

        let store = Arc::downgrade(&self.inner);
        let window = self.inner.transition_window;

        state.transition = Some(runtime.spawn(async move {
            tokio::time::sleep(window).await;
            finish_transition(store, generation);
        }));
    }

    fn end_transition(&self, state: &mut State, generation: u64) {
        // A newer change restarted the window.
        if state.generation != generation || !state.preference.is_transitioning {
            return;
        }

        state.preference.is_transitioning = false;
        state.transition = None;
        self.publish(PreferenceEvent::TransitionEnded);
    }
}

fn finish_transition(store: Weak<Inner>, generation: u64) {
    let Some(inner) = store.upgrade() else {
        return;
    };

    let store = PreferenceStore { inner };
    let mut state = store.lock();
    store.end_transition(&mut state, generation);
}

fn rehydrate<T: Default + std::fmt::Display>(
    storage: &dyn PreferenceStorage,
    key: &str,
    parse: fn(&str) -> folio_shared::Result<T>,
) -> T {
    let Some(value) = storage.get(key) else {
        return T::default();
    };

    parse(&value).unwrap_or_else(|err| {
        let fallback = T::default();
        tracing::warn!(key, error = %err, fallback = %fallback, "Stored preference rejected");
        fallback
    })
}
