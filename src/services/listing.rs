//! List and form state for one entity screen.
//!
//! Every fetch gets a [`FetchTicket`]. Starting a new fetch cancels the
//! previous ticket's token and bumps the generation, so a slower response
//! for an old filter can never overwrite the rows of a newer one.

use tokio_util::sync::CancellationToken;

use crate::{
    error::GatewayError,
    models::Entity,
    services::entity_service::{ListFilter, apply_filter},
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    include_inactive: bool,
    cancel: CancellationToken,
}

impl FetchTicket {
    /// Pass to `RequestOptions::cancel_on` so a superseded request is dropped.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

pub struct EntityList<E> {
    rows: Vec<E>,
    state: LoadState,
    generation: u64,
    include_inactive: bool,
    in_flight: Option<CancellationToken>,
}

impl<E> Default for EntityList<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            state: LoadState::Idle,
            generation: 0,
            include_inactive: false,
            in_flight: None,
        }
    }
}

impl<E: Entity> EntityList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn begin_fetch(&mut self, include_inactive: bool) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.include_inactive = include_inactive;
        self.state = LoadState::Loading;

        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        FetchTicket {
            generation: self.generation,
            include_inactive,
            cancel,
        }
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Vec<E>, GatewayError>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                entity = E::LABEL,
                stale = ticket.generation,
                current = self.generation,
                "ignoring stale fetch result"
            );
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(rows) => {
                let filter = ListFilter {
                    include_inactive: ticket.include_inactive,
                    ..ListFilter::default()
                };
                self.rows = apply_filter(rows, &filter);
                self.state = LoadState::Loaded;
            }
            Err(GatewayError::Cancelled) => {
                self.state = LoadState::Idle;
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
            }
        }
        true
    }

    /// Drops any in-flight fetch, e.g. when the screen goes away.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            self.generation += 1;
            self.state = LoadState::Idle;
        }
    }

    pub fn visible(&self, search: &str) -> Vec<&E> {
        let needle = search.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|e| needle.is_empty() || e.matches(&needle))
            .collect()
    }

    pub fn insert_created(&mut self, entity: E) {
        self.rows.push(entity);
    }

    pub fn replace_updated(&mut self, entity: E) -> bool {
        match self.rows.iter_mut().find(|e| e.id() == entity.id()) {
            Some(row) => {
                *row = entity;
                if !self.include_inactive {
                    self.rows.retain(E::is_active);
                }
                true
            }
            None => false,
        }
    }

    /// Local view of a soft delete.
    pub fn mark_inactive(&mut self, id: i64) -> bool {
        let Some(row) = self.rows.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        row.set_active(false);
        if !self.include_inactive {
            self.rows.retain(|e| e.id() != id);
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    Open(EditTarget),
    Submitting(EditTarget),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot {action} while the form is {state:?}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub state: EditorState,
}

/// The create/edit dialog: closed, open, submitting, closed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    state: EditorState,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            state: EditorState::Closed,
        }
    }
}

impl Editor {
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    fn invalid(&self, action: &'static str) -> InvalidTransition {
        InvalidTransition {
            action,
            state: self.state.clone(),
        }
    }

    pub fn open(&mut self, target: EditTarget) -> Result<(), InvalidTransition> {
        match self.state {
            EditorState::Closed | EditorState::Open(_) => {
                self.state = EditorState::Open(target);
                Ok(())
            }
            EditorState::Submitting(_) => Err(self.invalid("open")),
        }
    }

    pub fn submit(&mut self) -> Result<EditTarget, InvalidTransition> {
        match self.state {
            EditorState::Open(target) => {
                self.state = EditorState::Submitting(target);
                Ok(target)
            }
            _ => Err(self.invalid("submit")),
        }
    }

    /// A failed submit keeps the dialog open so the user can retry.
    pub fn finish(&mut self, succeeded: bool) -> Result<(), InvalidTransition> {
        match self.state {
            EditorState::Submitting(target) => {
                self.state = if succeeded {
                    EditorState::Closed
                } else {
                    EditorState::Open(target)
                };
                Ok(())
            }
            _ => Err(self.invalid("finish")),
        }
    }

    pub fn close(&mut self) -> Result<(), InvalidTransition> {
        match self.state {
            EditorState::Submitting(_) => Err(self.invalid("close")),
            _ => {
                self.state = EditorState::Closed;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Color;

    fn color(id: i64, active: bool) -> Color {
        serde_json::from_value(json!({"id": id, "name": format!("c{id}"), "active": active})).unwrap()
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut list = EntityList::<Color>::new();
        let with_inactive = list.begin_fetch(true);
        let active_only = list.begin_fetch(false);
        assert!(with_inactive.token().is_cancelled());

        assert!(list.apply(&active_only, Ok(vec![color(1, true)])));
        assert!(!list.apply(&with_inactive, Ok(vec![color(1, true), color(2, false)])));

        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.state(), &LoadState::Loaded);
    }

    #[test]
    fn failure_is_recorded() {
        let mut list = EntityList::<Color>::new();
        let ticket = list.begin_fetch(false);
        list.apply(&ticket, Err(GatewayError::Network("down".into())));
        assert!(matches!(list.state(), LoadState::Failed(msg) if msg.contains("down")));
    }

    #[test]
    fn cancel_invalidates_in_flight_ticket() {
        let mut list = EntityList::<Color>::new();
        let ticket = list.begin_fetch(false);
        list.cancel();
        assert!(ticket.token().is_cancelled());
        assert!(!list.apply(&ticket, Ok(vec![color(1, true)])));
        assert_eq!(list.state(), &LoadState::Idle);
    }

    #[test]
    fn local_updates_follow_the_active_filter() {
        let mut list = EntityList::<Color>::new();
        let ticket = list.begin_fetch(false);
        list.apply(&ticket, Ok(vec![color(1, true), color(2, true)]));

        list.insert_created(color(3, true));
        assert_eq!(list.rows().len(), 3);

        assert!(list.mark_inactive(2));
        assert_eq!(list.rows().iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);

        assert!(list.replace_updated(color(1, false)));
        assert_eq!(list.rows().len(), 1);
        assert!(!list.mark_inactive(99));
    }

    #[test]
    fn visible_filters_by_search() {
        let mut list = EntityList::<Color>::new();
        let ticket = list.begin_fetch(true);
        list.apply(&ticket, Ok(vec![color(1, true), color(12, false)]));
        assert_eq!(list.visible("C1").len(), 2);
        assert_eq!(list.visible("c12").len(), 1);
        assert_eq!(list.visible("").len(), 2);
    }

    #[test]
    fn editor_walks_through_its_states() {
        let mut editor = Editor::default();
        assert!(editor.submit().is_err());

        editor.open(EditTarget::Edit(4)).unwrap();
        assert_eq!(editor.submit().unwrap(), EditTarget::Edit(4));
        assert!(editor.close().is_err());
        assert!(editor.open(EditTarget::Create).is_err());

        editor.finish(false).unwrap();
        assert_eq!(editor.state(), &EditorState::Open(EditTarget::Edit(4)));

        editor.submit().unwrap();
        editor.finish(true).unwrap();
        assert_eq!(editor.state(), &EditorState::Closed);
    }
}
