use std::sync::{Mutex, OnceLock, PoisonError};

use anyhow::Context;
use liftlog_domain::AppState;
use log::{debug, error, warn};
use serde_json::{Map, Value};

use crate::{
    KEY_STATE, KeyValueStore, Settings, SettingsError, migration, settings,
    snapshot::{KEY_PERFORMANCE_MEMORY, KEY_WORKOUTS, StateSnapshot},
};

/// Persists the application state in two stores.
///
/// Performance memory and workouts are kept only in the encrypted store. The plain store holds
/// the remaining state, with performance memory and workouts written as empty values.
pub struct Persistence<P, E> {
    plain: P,
    encrypted: E,
}

impl<P: KeyValueStore, E: KeyValueStore> Persistence<P, E> {
    pub fn new(plain: P, encrypted: E) -> Self {
        Self { plain, encrypted }
    }

    pub fn plain(&self) -> &P {
        &self.plain
    }

    pub fn encrypted(&self) -> &E {
        &self.encrypted
    }

    pub fn save_state(&self, state: &AppState) -> bool {
        let snapshot = StateSnapshot::from(state);
        let plain = self.plain.save(KEY_STATE, &snapshot.public_part());
        let encrypted = self.encrypted.save(KEY_STATE, &snapshot.private_part());
        plain && encrypted
    }

    /// Loads the persisted state.
    ///
    /// If the state cannot be applied, it is applied again without performance memory and
    /// workouts. If that fails as well, the persisted state is removed and a new state is
    /// returned.
    pub fn restore_state(&self) -> AppState {
        let merged = self.load_merged();
        if merged.is_empty() {
            debug!("no persisted state found");
            return AppState::new();
        }

        let snapshot = migration::migrate_state_snapshot(merged);
        let error = match apply(snapshot.clone()) {
            Ok(state) => return state,
            Err(err) => err,
        };
        error!("failed to restore state: {error:#}");

        let mut clean = snapshot;
        clean.remove(KEY_PERFORMANCE_MEMORY);
        clean.remove(KEY_WORKOUTS);
        match apply(clean) {
            Ok(state) => {
                warn!("restored state without performance memory and workouts");
                state
            }
            Err(err) => {
                error!("failed to restore clean state: {err:#}");
                self.clear();
                AppState::new()
            }
        }
    }

    /// Snapshots of both stores, where fields of the encrypted store take precedence.
    fn load_merged(&self) -> Map<String, Value> {
        let mut merged = object(self.plain.load(KEY_STATE));
        merged.extend(object(self.encrypted.load(KEY_STATE)));
        merged
    }

    pub fn clear(&self) {
        self.plain.remove(KEY_STATE);
        self.encrypted.remove(KEY_STATE);
    }

    pub fn read_settings(&self) -> Result<Settings, SettingsError> {
        settings::read_settings(&self.plain)
    }

    pub fn write_settings(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings::write_settings(&self.plain, settings)
    }
}

fn object(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        Some(_) => {
            warn!("ignored persisted state that is not an object");
            Map::new()
        }
        None => Map::new(),
    }
}

fn apply(snapshot: Map<String, Value>) -> anyhow::Result<AppState> {
    let snapshot: StateSnapshot =
        serde_json::from_value(Value::Object(snapshot)).context("invalid state snapshot")?;
    let mut state = AppState::try_from(snapshot).context("failed to convert state snapshot")?;
    let seeded = state.catalog.seed_builtin_exercises();
    if seeded > 0 {
        debug!("seeded {seeded} exercises");
    }
    Ok(state)
}

/// Application state that is loaded on first access and persisted after every update.
pub struct App<P, E> {
    persistence: Persistence<P, E>,
    state: OnceLock<Mutex<AppState>>,
}

impl<P: KeyValueStore, E: KeyValueStore> App<P, E> {
    pub fn new(persistence: Persistence<P, E>) -> Self {
        Self {
            persistence,
            state: OnceLock::new(),
        }
    }

    pub fn persistence(&self) -> &Persistence<P, E> {
        &self.persistence
    }

    pub fn is_rehydrated(&self) -> bool {
        self.state.get().is_some()
    }

    fn state(&self) -> &Mutex<AppState> {
        self.state
            .get_or_init(|| Mutex::new(self.persistence.restore_state()))
    }

    pub fn read<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        let state = self
            .state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn update<T>(&self, f: impl FnOnce(&mut AppState) -> T) -> T {
        let mut state = self
            .state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut state);
        if !self.persistence.save_state(&state) {
            error!("failed to persist state");
        }
        result
    }
}
