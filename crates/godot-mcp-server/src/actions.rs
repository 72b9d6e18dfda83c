//! Action vocabularies for the multiplexed tools.
//!
//! Several tools fan one `action` string out to different wire methods.
//! The vocabularies are closed and checked here, before any connection is
//! opened; an unknown action costs zero network calls. Error strings are
//! returned verbatim to the agent.

/// `godot_signal` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Connect,
    Disconnect,
}

impl SignalAction {
    pub fn parse(action: &str) -> Result<Self, String> {
        match action {
            "connect" => Ok(Self::Connect),
            "disconnect" => Ok(Self::Disconnect),
            other => Err(format!(
                "Error: Unknown action '{other}'. Use 'connect' or 'disconnect'."
            )),
        }
    }

    /// Wire method carrying this action.
    pub fn method(self) -> &'static str {
        match self {
            Self::Connect => "connect_signal",
            Self::Disconnect => "disconnect_signal",
        }
    }
}

/// `godot_game` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Play,
    Stop,
}

impl GameAction {
    pub fn parse(action: &str) -> Result<Self, String> {
        match action {
            "play" => Ok(Self::Play),
            "stop" => Ok(Self::Stop),
            other => Err(format!(
                "Error: Unknown action '{other}'. Use 'play' or 'stop'."
            )),
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Play => "play_game",
            Self::Stop => "stop_game",
        }
    }
}

/// `godot_animation` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationAction {
    Play,
    Stop,
    Seek,
}

impl AnimationAction {
    pub fn parse(action: &str) -> Result<Self, String> {
        match action {
            "play" => Ok(Self::Play),
            "stop" => Ok(Self::Stop),
            "seek" => Ok(Self::Seek),
            other => Err(format!(
                "Error: Unknown action '{other}'. Use 'play', 'stop', or 'seek'."
            )),
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Play => "play_animation",
            Self::Stop => "stop_animation",
            Self::Seek => "seek_animation",
        }
    }
}

/// `godot_group` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Add,
    Remove,
    Get,
}

impl GroupAction {
    pub fn parse(action: &str) -> Result<Self, String> {
        match action {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "get" => Ok(Self::Get),
            other => Err(format!(
                "Error: Unknown action '{other}'. Use 'add', 'remove', or 'get'."
            )),
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Add => "add_to_group",
            Self::Remove => "remove_from_group",
            Self::Get => "get_groups",
        }
    }
}

/// `godot_audio` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    Play,
    Stop,
}

impl AudioAction {
    pub fn parse(action: &str) -> Result<Self, String> {
        match action {
            "play" => Ok(Self::Play),
            "stop" => Ok(Self::Stop),
            other => Err(format!(
                "Error: Unknown action '{other}'. Use 'play' or 'stop'."
            )),
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Play => "play_audio",
            Self::Stop => "stop_audio",
        }
    }
}
