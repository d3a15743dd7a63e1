//! Concrete session handlers and table builder.
//!
//! ```text
//!  serial:  IDLE ──[broadcast]──▶ AWAITING_ACK ──["connect"|"cnnect"]──▶ STREAMING
//!             ▲                                                          │
//!             └───────────────────────["disconnect"]─────────────────────┘
//!
//!  radio:   IDLE ──[peer connected]──▶ STREAMING ──[peer disconnected]──▶ IDLE
//! ```
//!
//! Every input a state has no edge for is ignored. That covers the
//! idempotent cases (`connect` while streaming) as well as inputs from the
//! other link variant.

use super::context::{Cue, SessionContext};
use super::{SessionInput, SessionState, StateDescriptor};
use crate::app::commands::HostCommand;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the session table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; SessionState::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: SessionState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_input: idle_input,
        },
        // Index 1: AwaitingAck
        StateDescriptor {
            id: SessionState::AwaitingAck,
            name: "AwaitingAck",
            on_enter: None,
            on_exit: None,
            on_input: awaiting_ack_input,
        },
        // Index 2: Streaming
        StateDescriptor {
            id: SessionState::Streaming,
            name: "Streaming",
            on_enter: Some(streaming_enter),
            on_exit: None,
            on_input: streaming_input,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: no host listening
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SessionContext) {
    ctx.requests.cue = Some(Cue::Disconnected);
    ctx.requests.clear_buffer = true;
    ctx.requests.reset_broadcast = true;
    info!("IDLE: host gone, buffer cleared");
}

fn idle_input(ctx: &mut SessionContext, input: SessionInput) -> Option<SessionState> {
    match input {
        SessionInput::LinkConnected if ctx.is_radio() => Some(SessionState::Streaming),
        SessionInput::DescriptorBroadcast if !ctx.is_radio() => Some(SessionState::AwaitingAck),
        SessionInput::Command(HostCommand::Connect) => {
            debug!("IDLE: connect before any descriptor, ignored");
            None
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_ACK: descriptor out, waiting for the host to answer
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_ack_input(ctx: &mut SessionContext, input: SessionInput) -> Option<SessionState> {
    match input {
        SessionInput::Command(HostCommand::Connect) if !ctx.is_radio() => {
            Some(SessionState::Streaming)
        }
        SessionInput::LinkConnected if ctx.is_radio() => Some(SessionState::Streaming),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  STREAMING: sampling and flushing
// ═══════════════════════════════════════════════════════════════════════════

fn streaming_enter(ctx: &mut SessionContext) {
    ctx.requests.cue = Some(Cue::Connected);
    ctx.requests.arm_scheduler = true;
    info!("STREAMING: host attached at {} ms", ctx.now_ms);
}

fn streaming_input(ctx: &mut SessionContext, input: SessionInput) -> Option<SessionState> {
    match input {
        SessionInput::LinkDisconnected if ctx.is_radio() => Some(SessionState::Idle),
        SessionInput::Command(HostCommand::Disconnect) if !ctx.is_radio() => {
            Some(SessionState::Idle)
        }
        _ => None,
    }
}
