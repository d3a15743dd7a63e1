//! Inbound host commands.
//!
//! The serial host speaks a tiny text vocabulary. Matching is exact and
//! case-sensitive after trimming surrounding ASCII whitespace; `cnnect` is
//! accepted as a legacy spelling of `connect`. Anything else is ignored.

/// Commands the host can send over a command-oriented transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Host acknowledged the descriptor and is ready for data.
    Connect,
    /// Host is going away; stop streaming.
    Disconnect,
}

impl HostCommand {
    /// Parse one inbound message. Returns `None` for unrecognised text.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim_matches(|c: char| c.is_ascii_whitespace()) {
            "connect" | "cnnect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            _ => None,
        }
    }

    /// Parse raw bytes; non-UTF-8 input is unrecognised.
    pub fn parse_bytes(bytes: &[u8]) -> Option<Self> {
        core::str::from_utf8(bytes).ok().and_then(Self::parse)
    }
}
