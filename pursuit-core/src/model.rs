//! Observable game model
//!
//! Owns the current state and tells registered observers about every move.

use crate::game::{GameError, GameState, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    MoveMade,
    GameOver,
}

/// Receives a notification after every accepted move
pub trait Observer {
    fn on_model_changed(&mut self, state: &GameState, event: Event);
}

/// Handle returned by `Model::register_observer`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("observer {0:?} is not registered")]
    UnknownObserver(ObserverId),

    #[error(transparent)]
    Game(#[from] GameError),
}

pub struct Model {
    state: GameState,
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_id: u64,
}

impl Model {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove and hand back a registered observer
    pub fn unregister_observer(&mut self, id: ObserverId) -> Result<Box<dyn Observer>, ModelError> {
        let index = self
            .observers
            .iter()
            .position(|(oid, _)| *oid == id)
            .ok_or(ModelError::UnknownObserver(id))?;
        Ok(self.observers.remove(index).1)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Play `mv` and notify observers in registration order
    pub fn choose_move(&mut self, mv: &Move) -> Result<Event, ModelError> {
        self.state = self.state.advance(mv)?;

        let event = if self.state.is_terminal() {
            Event::GameOver
        } else {
            Event::MoveMade
        };
        tracing::debug!(%mv, ?event, "move accepted");

        for (_, observer) in &mut self.observers {
            observer.on_model_changed(&self.state, event);
        }
        Ok(event)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameSetup, Piece, Player, Tickets};
    use crate::graph::{Graph, Ticket, Transport};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Observer for Recorder {
        fn on_model_changed(&mut self, _state: &GameState, event: Event) {
            self.0.borrow_mut().push(event);
        }
    }

    /// Fugitive at 1, Red at 3 on the taxi line 1-2-3
    fn simple_game() -> GameState {
        let graph = Graph::from_edges(&[(1, 2, Transport::Taxi), (2, 3, Transport::Taxi)]).unwrap();
        GameState::new(
            Arc::new(GameSetup::new(graph, vec![false; 4])),
            Player::new(Piece::Fugitive, 1, Tickets::fugitive_default().with(Ticket::Double, 0)),
            vec![Player::new(Piece::Red, 3, Tickets::pursuer_default())],
        )
        .unwrap()
    }

    #[test]
    fn test_observers_see_move_then_game_over() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut model = Model::new(simple_game());
        model.register_observer(Box::new(Recorder(Rc::clone(&events))));

        // Fugitive 1 -> 2, then Red 3 -> 2 captures
        let mv = model.state().legal_moves()[0];
        assert_eq!(model.choose_move(&mv).unwrap(), Event::MoveMade);
        let mv = model.state().legal_moves()[0];
        assert_eq!(model.choose_move(&mv).unwrap(), Event::GameOver);

        assert_eq!(*events.borrow(), vec![Event::MoveMade, Event::GameOver]);
        assert!(model.state().is_terminal());
    }

    #[test]
    fn test_unregistered_observer_is_silent() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut model = Model::new(simple_game());
        let id = model.register_observer(Box::new(Recorder(Rc::clone(&events))));
        assert_eq!(model.observer_count(), 1);

        assert!(model.unregister_observer(id).is_ok());
        assert_eq!(model.observer_count(), 0);
        assert_eq!(
            model.unregister_observer(id).err(),
            Some(ModelError::UnknownObserver(id))
        );

        let mv = model.state().legal_moves()[0];
        model.choose_move(&mv).unwrap();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_illegal_move_leaves_state() {
        let mut model = Model::new(simple_game());
        let mv = Move::Single {
            piece: Piece::Red,
            source: 3,
            ticket: Ticket::Taxi,
            destination: 2,
        };
        assert_eq!(
            model.choose_move(&mv).unwrap_err(),
            ModelError::Game(GameError::IllegalMove(mv))
        );
        assert!(model.state().log().is_empty());
    }
}
