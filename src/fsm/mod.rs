//! Function-pointer session state machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StateTable                                                 │
//! │  ┌─────────────┬───────────┬──────────┬──────────────────┐  │
//! │  │ SessionState│ on_enter  │ on_exit  │ on_input         │  │
//! │  ├─────────────┼───────────┼──────────┼──────────────────┤  │
//! │  │ Idle        │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Opt  │  │
//! │  │ AwaitingAck │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Opt  │  │
//! │  │ Streaming   │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Opt  │  │
//! │  └─────────────┴───────────┴──────────┴──────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is event-driven rather than ticked: each link event, host
//! command or descriptor broadcast is fed through [`SessionFsm::handle`].
//! If the current state's `on_input` returns `Some(next)` and `next`
//! differs from the current state, the engine runs `on_exit`, swaps the
//! pointer, then runs `on_enter`. Handlers only write requests into
//! [`SessionContext`]; the caller applies them.

pub mod context;
pub mod states;

use context::SessionContext;
use log::info;

use crate::app::commands::HostCommand;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Session liveness. Must stay in sync with [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionState {
    Idle = 0,
    AwaitingAck = 1,
    Streaming = 2,
}

impl SessionState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `SessionState`. Out-of-range falls back to
    /// `Idle` in release builds.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::AwaitingAck,
            2 => Self::Streaming,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitingAck => "AwaitingAck",
            Self::Streaming => "Streaming",
        }
    }
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything that can move the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// Radio peer attached.
    LinkConnected,
    /// Radio peer left.
    LinkDisconnected,
    /// Recognised text from the serial host.
    Command(HostCommand),
    /// The descriptor was just (re)broadcast on the serial link.
    DescriptorBroadcast,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SessionContext);

/// Signature for the input handler. Returns `Some(next)` to transition.
pub type StateInputFn = fn(&mut SessionContext, SessionInput) -> Option<SessionState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: SessionState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_input: StateInputFn,
}

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct SessionFsm {
    /// Fixed-size table indexed by `SessionState as usize`.
    table: [StateDescriptor; SessionState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Timestamp of the last transition (or of `start`).
    last_transition_ms: u32,
    /// Number of transitions taken.
    transitions: u32,
}

impl SessionFsm {
    pub fn new(table: [StateDescriptor; SessionState::COUNT], initial: SessionState) -> Self {
        Self {
            table,
            current: initial as usize,
            last_transition_ms: 0,
            transitions: 0,
        }
    }

    /// Record the start time. The initial state is entered silently: no
    /// cue, nothing to clear.
    pub fn start(&mut self, ctx: &mut SessionContext) {
        info!(
            "Session starting in state: {} ({:?} link)",
            self.table[self.current].name, ctx.mode
        );
        self.last_transition_ms = ctx.now_ms;
    }

    /// Feed one input. Returns the transition taken, if any.
    pub fn handle(&mut self, input: SessionInput, ctx: &mut SessionContext) -> Option<Transition> {
        let next = (self.table[self.current].on_input)(ctx, input)?;
        self.force_transition(next, ctx)
    }

    /// Jump to `next` regardless of input. A no-op if already there.
    pub fn force_transition(
        &mut self,
        next: SessionState,
        ctx: &mut SessionContext,
    ) -> Option<Transition> {
        if next as usize == self.current {
            return None;
        }
        Some(self.transition(next, ctx))
    }

    pub fn current_state(&self) -> SessionState {
        SessionState::from_index(self.current)
    }

    pub fn is_streaming(&self) -> bool {
        self.current_state() == SessionState::Streaming
    }

    pub fn last_transition_ms(&self) -> u32 {
        self.last_transition_ms
    }

    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: SessionState, ctx: &mut SessionContext) -> Transition {
        let from = self.current_state();
        let next_idx = next as usize;

        info!(
            "Session transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.last_transition_ms = ctx.now_ms;
        self.transitions = self.transitions.wrapping_add(1);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        Transition { from, to: next }
    }
}
