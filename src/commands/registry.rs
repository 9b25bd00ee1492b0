//! Command registry
//!
//! A command is a name, a description, an optional display chord, and an
//! action. The registry is an ordered sequence: chorded dispatch picks the
//! first registered command whose modifier triple and key match, not the
//! best match. Externally defined shortcuts append to the same sequence
//! and show up in the palette like any built-in.

use serde::{Deserialize, Serialize};

use crate::commands::chord::KeyChord;
use crate::config::{EditorAction, ShortcutConfig};

/// What a command does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Builtin(EditorAction),
    /// Handled by the embedding glue; dispatch reports the command name.
    External,
}

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub chord: Option<KeyChord>,
    pub action: CommandAction,
}

/// Palette-facing view of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub chord: Option<String>,
}

impl From<&Command> for CommandInfo {
    fn from(command: &Command) -> Self {
        Self {
            name: command.name.clone(),
            description: command.description.clone(),
            chord: command.chord.as_ref().map(|c| c.label.clone()),
        }
    }
}

/// Built-in command table, in registration order.
const BUILTIN_COMMANDS: &[(EditorAction, &str, &str)] = &[
    (
        EditorAction::Strip,
        "Remove Cloze",
        "Remove the cloze at the cursor or selection, keeping its text",
    ),
    (
        EditorAction::StripAll,
        "Remove All Clozes",
        "Remove every cloze in the field, keeping their text",
    ),
    (
        EditorAction::StripByNumber,
        "Remove Same-Number Clozes",
        "Remove every cloze sharing the number under the cursor",
    ),
    (
        EditorAction::Increment,
        "Increment Cloze Number",
        "Increase the number of the cloze at the cursor",
    ),
    (
        EditorAction::Decrement,
        "Decrement Cloze Number",
        "Decrease the number of the cloze at the cursor, to a minimum of 1",
    ),
    (
        EditorAction::Renumber,
        "Renumber Cloze",
        "Renumber the cloze at the cursor: press 1-9 to choose",
    ),
    (
        EditorAction::Split,
        "Split Cloze",
        "Split the cloze around the selected text",
    ),
    (
        EditorAction::Merge,
        "Merge Clozes",
        "Merge all clozes sharing a number into one",
    ),
    (
        EditorAction::MoveOut,
        "Move Selection Out of Cloze",
        "Move the selected text outside the cloze",
    ),
    (
        EditorAction::MoveIn,
        "Move Selection Into Cloze",
        "Absorb adjacent selected text into the cloze",
    ),
    (
        EditorAction::ImageToCloze,
        "Convert Image to Cloze",
        "Wrap the image at the cursor or selection in a new cloze",
    ),
    (
        EditorAction::HintEdit,
        "Add/Edit Hint",
        "Add a hint to the cloze, or edit the existing one",
    ),
    (
        EditorAction::HintRemove,
        "Remove Hint",
        "Remove the cloze's hint",
    ),
    (
        EditorAction::HintWordCount,
        "Word Count Hint",
        "Set the hint to the content's word count",
    ),
    (
        EditorAction::HintFromSelection,
        "Hint From Selection",
        "Use the selected text as the hint",
    ),
    (
        EditorAction::FindReplace,
        "Find & Replace in Clozes",
        "Replace text inside cloze contents only",
    ),
    (
        EditorAction::NextCloze,
        "Jump to Next Cloze",
        "Move the cursor to the next cloze",
    ),
    (
        EditorAction::PrevCloze,
        "Jump to Previous Cloze",
        "Move the cursor to the previous cloze",
    ),
    (
        EditorAction::CopyContent,
        "Copy Cloze Content",
        "Copy the content of the cloze at the cursor",
    ),
    (
        EditorAction::ReplayFront,
        "Replay Question",
        "Show the card front again",
    ),
    (
        EditorAction::OpenPalette,
        "Command Palette",
        "Search and run any command",
    ),
    (
        EditorAction::Undo,
        "Undo",
        "Restore the field as it was before the last edit",
    ),
];

/// Ordered command sequence: built-ins first, then external registrations.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn with_config(config: &ShortcutConfig) -> Self {
        let commands = BUILTIN_COMMANDS
            .iter()
            .map(|(action, name, description)| Command {
                name: (*name).to_string(),
                description: (*description).to_string(),
                chord: config.chord(*action).cloned(),
                action: CommandAction::Builtin(*action),
            })
            .collect();
        Self { commands }
    }

    /// Rebind built-in chords from a freshly loaded config. External
    /// registrations keep their chords.
    pub fn apply_config(&mut self, config: &ShortcutConfig) {
        for command in &mut self.commands {
            if let CommandAction::Builtin(action) = command.action {
                command.chord = config.chord(action).cloned();
            }
        }
    }

    pub fn register_external(&mut self, name: &str, description: &str, chord: Option<KeyChord>) {
        self.commands.push(Command {
            name: name.to_string(),
            description: description.to_string(),
            chord,
            action: CommandAction::External,
        });
    }

    /// First registered command matching the event. First wins, not best.
    pub fn find_chord(
        &self,
        primary: bool,
        shift: bool,
        alt: bool,
        key: &str,
    ) -> Option<&Command> {
        self.commands.iter().find(|c| {
            c.chord
                .as_ref()
                .is_some_and(|chord| chord.matches(primary, shift, alt, key))
        })
    }

    /// Case-insensitive substring filter over name and description,
    /// preserving registration order.
    pub fn filter(&self, query: &str) -> Vec<&Command> {
        let needle = query.to_lowercase();
        self.commands
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn infos(&self) -> Vec<CommandInfo> {
        self.commands.iter().map(CommandInfo::from).collect()
    }
}
