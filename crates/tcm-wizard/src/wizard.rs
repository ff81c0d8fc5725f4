//! The registration wizard component.

use crate::message::{WizardEffect, WizardMessage};
use crate::snapshot::{PersistedWizardSnapshot, PersistenceAdapter};
use crate::state::WizardState;
use crate::store::SnapshotStore;
use crate::update::update;

/// Owns the wizard state and keeps its durable subset in sync.
///
/// State is restored from the store on mount and the snapshot is rewritten
/// after every message that changes it. Reset and successful submission
/// remove it.
pub struct RegistrationWizard<S: SnapshotStore> {
    state: WizardState,
    persistence: PersistenceAdapter<S>,
    last_saved: Option<PersistedWizardSnapshot>,
}

impl<S: SnapshotStore> RegistrationWizard<S> {
    /// Mount the wizard, restoring saved progress from `store`.
    pub fn mount(store: S) -> Self {
        Self::with_adapter(PersistenceAdapter::new(store))
    }

    /// Mount with a custom adapter (e.g. a different key).
    pub fn with_adapter(persistence: PersistenceAdapter<S>) -> Self {
        let state = persistence.restore();
        let last_saved = Some(PersistedWizardSnapshot::capture(&state));
        Self {
            state,
            persistence,
            last_saved,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Apply `message` and return the effects the caller must run.
    ///
    /// [`WizardEffect::ClearPersisted`] is handled here and never returned.
    pub fn dispatch(&mut self, message: WizardMessage) -> Vec<WizardEffect> {
        let (state, effects) = update(std::mem::take(&mut self.state), message);
        self.state = state;

        let (clear, effects): (Vec<_>, Vec<_>) = effects
            .into_iter()
            .partition(|effect| matches!(effect, WizardEffect::ClearPersisted));
        if clear.is_empty() {
            self.save();
        } else {
            self.clear_saved();
        }
        effects
    }

    /// Discard all progress, in memory and on disk.
    pub fn reset(&mut self) {
        self.dispatch(WizardMessage::Reset);
    }

    fn save(&mut self) {
        let snapshot = PersistedWizardSnapshot::capture(&self.state);
        if self.last_saved.as_ref() == Some(&snapshot) {
            return;
        }
        match self.persistence.persist(&self.state) {
            Ok(()) => self.last_saved = Some(snapshot),
            Err(e) => tracing::warn!(error = %e, "could not save registration progress"),
        }
    }

    fn clear_saved(&mut self) {
        match self.persistence.clear() {
            Ok(()) => self.last_saved = None,
            Err(e) => tracing::warn!(error = %e, "could not remove saved registration progress"),
        }
    }
}
