//! Named finite state machine
//!
//! States are registered under unique names. The active state decides
//! transitions in [`State::update`] by returning the next state's name and
//! does its per-tick work in [`State::execute`]. The machine runs the
//! `exit`/`enter` hooks around every real transition.
//!
//! Misuse (duplicate names, unknown targets, ticking an inactive machine) is
//! logged and reported as an [`FsmError`] but never panics; the machine stays
//! in its previous state.
//!
//! `O` is the owner the states act on, `W` the world they can query.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub type StateName = &'static str;

/// One behaviour of an owner `O` living in a world `W`
pub trait State<O, W: ?Sized> {
    /// Decide whether to leave this state. Returns the next state's name.
    fn update(&mut self, owner: &mut O, world: &mut W) -> Option<StateName>;

    /// Per-tick behaviour while active
    fn execute(&mut self, owner: &mut O, world: &mut W);

    fn enter(&mut self, _owner: &mut O, _world: &mut W) {}

    fn exit(&mut self, _owner: &mut O, _world: &mut W) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("state `{0}` already exists in the state machine")]
    DuplicateState(String),
    #[error("state `{0}` does not exist in the state machine")]
    UnknownState(String),
    #[error("no state active; the initial state must be activated first")]
    NoActiveState,
}

/// Outcome of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed {
        from: Option<StateName>,
        to: StateName,
    },
    /// Requested state was already active, or the state chose to stay
    Unchanged,
}

pub struct StateMachine<O, W: ?Sized> {
    states: HashMap<StateName, Box<dyn State<O, W>>>,
    current: Option<StateName>,
}

impl<O, W: ?Sized> Default for StateMachine<O, W> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }
}

impl<O, W: ?Sized> fmt::Debug for StateMachine<O, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.states.keys().collect();
        names.sort();
        f.debug_struct("StateMachine")
            .field("states", &names)
            .field("current", &self.current)
            .finish()
    }
}

impl<O, W: ?Sized> StateMachine<O, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the active state, if any
    pub fn current(&self) -> Option<StateName> {
        self.current
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Register `state` under `name`; `active` transitions into it right away
    pub fn add_state(
        &mut self,
        name: StateName,
        state: Box<dyn State<O, W>>,
        active: bool,
        owner: &mut O,
        world: &mut W,
    ) -> Result<(), FsmError> {
        if self.states.contains_key(name) {
            log::warn!("State `{name}` already exists in state machine");
            return Err(FsmError::DuplicateState(name.to_string()));
        }
        self.states.insert(name, state);
        if active {
            self.change_state(name, owner, world)?;
        }
        Ok(())
    }

    /// Leave the current state (if any) and enter `name`.
    ///
    /// Requesting the state that is already active does nothing; use
    /// [`StateMachine::reenter`] to run its hooks again.
    pub fn change_state(
        &mut self,
        name: &str,
        owner: &mut O,
        world: &mut W,
    ) -> Result<Transition, FsmError> {
        let Some((&to, _)) = self.states.get_key_value(name) else {
            log::warn!("State `{name}` does not exist in state machine");
            return Err(FsmError::UnknownState(name.to_string()));
        };
        if self.current == Some(to) {
            return Ok(Transition::Unchanged);
        }

        let from = self.current;
        if let Some(state) = from.and_then(|current| self.states.get_mut(current)) {
            state.exit(owner, world);
        }
        self.current = Some(to);
        if let Some(state) = self.states.get_mut(to) {
            state.enter(owner, world);
        }
        log::debug!("State transition {from:?} -> {to}");
        Ok(Transition::Changed { from, to })
    }

    /// Run `exit` then `enter` on the active state
    pub fn reenter(&mut self, owner: &mut O, world: &mut W) -> Result<Transition, FsmError> {
        let current = self.active_name()?;
        if let Some(state) = self.states.get_mut(current) {
            state.exit(owner, world);
            state.enter(owner, world);
        }
        Ok(Transition::Changed {
            from: Some(current),
            to: current,
        })
    }

    /// Let the active state pick a transition and apply it
    pub fn update(&mut self, owner: &mut O, world: &mut W) -> Result<Transition, FsmError> {
        let current = self.active_name()?;
        let next = match self.states.get_mut(current) {
            Some(state) => state.update(owner, world),
            None => return Err(FsmError::UnknownState(current.to_string())),
        };
        match next {
            Some(name) => self.change_state(name, owner, world),
            None => Ok(Transition::Unchanged),
        }
    }

    /// Run the active state's per-tick behaviour
    pub fn execute(&mut self, owner: &mut O, world: &mut W) -> Result<(), FsmError> {
        let current = self.active_name()?;
        if let Some(state) = self.states.get_mut(current) {
            state.execute(owner, world);
        }
        Ok(())
    }

    fn active_name(&self) -> Result<StateName, FsmError> {
        self.current.ok_or_else(|| {
            log::warn!("No state active. Initial state must be activated.");
            FsmError::NoActiveState
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Hook counters per state name, plus the transition each state asks for
    #[derive(Debug, Default)]
    struct Log {
        enters: HashMap<StateName, u32>,
        exits: HashMap<StateName, u32>,
        executes: HashMap<StateName, u32>,
        wanted: Option<StateName>,
    }

    struct Probe(StateName);

    impl State<Log, ()> for Probe {
        fn update(&mut self, owner: &mut Log, _world: &mut ()) -> Option<StateName> {
            owner.wanted.take()
        }

        fn execute(&mut self, owner: &mut Log, _world: &mut ()) {
            *owner.executes.entry(self.0).or_default() += 1;
        }

        fn enter(&mut self, owner: &mut Log, _world: &mut ()) {
            *owner.enters.entry(self.0).or_default() += 1;
        }

        fn exit(&mut self, owner: &mut Log, _world: &mut ()) {
            *owner.exits.entry(self.0).or_default() += 1;
        }
    }

    const NAMES: [StateName; 3] = ["idle", "chase", "attack"];

    fn machine(log: &mut Log) -> StateMachine<Log, ()> {
        let mut fsm = StateMachine::new();
        for (i, &name) in NAMES.iter().enumerate() {
            fsm.add_state(name, Box::new(Probe(name)), i == 0, log, &mut ())
                .unwrap();
        }
        fsm
    }

    #[test]
    fn test_active_flag_enters_initial_state() {
        let mut log = Log::default();
        let fsm = machine(&mut log);
        assert_eq!(fsm.current(), Some("idle"));
        assert_eq!(log.enters.get("idle"), Some(&1));
        assert_eq!(fsm.len(), 3);
    }

    #[test]
    fn test_duplicate_state_is_rejected() {
        let mut log = Log::default();
        let mut fsm = machine(&mut log);
        let result = fsm.add_state("chase", Box::new(Probe("chase")), true, &mut log, &mut ());
        assert_eq!(result, Err(FsmError::DuplicateState("chase".into())));
        // Not activated either
        assert_eq!(fsm.current(), Some("idle"));
        assert_eq!(fsm.len(), 3);
    }

    #[test]
    fn test_unknown_target_keeps_current_state() {
        let mut log = Log::default();
        let mut fsm = machine(&mut log);
        let result = fsm.change_state("flee", &mut log, &mut ());
        assert_eq!(result, Err(FsmError::UnknownState("flee".into())));
        assert_eq!(fsm.current(), Some("idle"));
        assert!(log.exits.is_empty());
    }

    #[test]
    fn test_inactive_machine_is_a_noop() {
        let mut log = Log::default();
        let mut fsm: StateMachine<Log, ()> = StateMachine::new();
        fsm.add_state("idle", Box::new(Probe("idle")), false, &mut log, &mut ())
            .unwrap();

        assert_eq!(fsm.update(&mut log, &mut ()), Err(FsmError::NoActiveState));
        assert_eq!(fsm.execute(&mut log, &mut ()), Err(FsmError::NoActiveState));
        assert!(log.executes.is_empty());
        assert!(log.enters.is_empty());
    }

    #[test]
    fn test_update_applies_requested_transition() {
        let mut log = Log::default();
        let mut fsm = machine(&mut log);

        assert_eq!(fsm.update(&mut log, &mut ()), Ok(Transition::Unchanged));
        log.wanted = Some("attack");
        assert_eq!(
            fsm.update(&mut log, &mut ()),
            Ok(Transition::Changed {
                from: Some("idle"),
                to: "attack"
            })
        );
        fsm.execute(&mut log, &mut ()).unwrap();
        assert_eq!(log.exits.get("idle"), Some(&1));
        assert_eq!(log.enters.get("attack"), Some(&1));
        assert_eq!(log.executes.get("attack"), Some(&1));
    }

    #[test]
    fn test_same_state_transition_runs_no_hooks() {
        let mut log = Log::default();
        let mut fsm = machine(&mut log);
        assert_eq!(
            fsm.change_state("idle", &mut log, &mut ()),
            Ok(Transition::Unchanged)
        );
        assert_eq!(log.enters.get("idle"), Some(&1));
        assert!(log.exits.is_empty());

        fsm.reenter(&mut log, &mut ()).unwrap();
        assert_eq!(log.enters.get("idle"), Some(&2));
        assert_eq!(log.exits.get("idle"), Some(&1));
    }

    proptest! {
        #[test]
        fn prop_enter_exit_balance(targets in proptest::collection::vec(0usize..3, 0..60)) {
            let mut log = Log::default();
            let mut fsm = machine(&mut log);
            for index in targets {
                fsm.change_state(NAMES[index], &mut log, &mut ()).unwrap();
            }

            let current = fsm.current().unwrap();
            for name in NAMES {
                let enters = log.enters.get(name).copied().unwrap_or(0);
                let exits = log.exits.get(name).copied().unwrap_or(0);
                if name == current {
                    prop_assert_eq!(enters, exits + 1);
                } else {
                    prop_assert_eq!(enters, exits);
                }
            }
        }
    }
}
