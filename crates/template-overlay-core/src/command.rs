//! User-facing commands and their stable identifiers.

use std::fmt;

/// A command the host exposes on its command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Pick a template and enable it for the active document.
    Enable,
    /// Disable the active document's template.
    Disable,
    /// Store the active document as a template and enable it.
    Create,
    /// Stop auto-activation for the active document.
    DisableAutoActivation,
    /// Re-allow auto-activation for every document.
    ClearDisabledAutoActivations,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Enable,
        Command::Disable,
        Command::Create,
        Command::DisableAutoActivation,
        Command::ClearDisabledAutoActivations,
    ];

    /// The stable identifier registered with the host.
    pub fn id(self) -> &'static str {
        match self {
            Command::Enable => "templateOverlay.enable",
            Command::Disable => "templateOverlay.disable",
            Command::Create => "templateOverlay.create",
            Command::DisableAutoActivation => "templateOverlay.autoActivation.disable",
            Command::ClearDisabledAutoActivations => "templateOverlay.autoActivation.clearDisabled",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Whether the command acts on the active document.
    pub fn needs_document(self) -> bool {
        !matches!(self, Command::ClearDisabledAutoActivations)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Some(command));
        }
        assert_eq!(Command::from_id("templateOverlay.unknown"), None);
    }

    #[test]
    fn only_clear_works_without_document() {
        let free: Vec<Command> = Command::ALL
            .into_iter()
            .filter(|command| !command.needs_document())
            .collect();
        assert_eq!(free, vec![Command::ClearDisabledAutoActivations]);
    }
}
