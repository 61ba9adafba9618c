//! User selection collaborator.
//!
//! The values the original workflow asks for interactively (source folder,
//! destination folder, PS1-or-PSP) go through the Select trait, so the CLI
//! logic never talks to a dialog toolkit directly and tests can script the
//! answers.

use std::path::PathBuf;

/// Synchronous "ask the user for X" capability.
pub trait Select {
    /// Ask the user to pick a directory. None means cancelled.
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;

    /// Ask the user a yes/no question.
    fn confirm(&self, title: &str, question: &str) -> bool;
}

/// Native-dialog implementation.
pub struct DialogSelect;

impl Select for DialogSelect {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(title).pick_folder()
    }

    fn confirm(&self, title: &str, question: &str) -> bool {
        let choice = rfd::MessageDialog::new()
            .set_title(title)
            .set_description(question)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(choice, rfd::MessageDialogResult::Yes)
    }
}

/// Test double that replays queued answers instead of showing dialogs.
#[cfg(test)]
pub struct ScriptedSelect {
    folders: std::cell::RefCell<std::collections::VecDeque<Option<PathBuf>>>,
    answers: std::cell::RefCell<std::collections::VecDeque<bool>>,
}

#[cfg(test)]
impl ScriptedSelect {
    pub fn new(folders: Vec<Option<PathBuf>>, answers: Vec<bool>) -> Self {
        ScriptedSelect {
            folders: std::cell::RefCell::new(folders.into()),
            answers: std::cell::RefCell::new(answers.into()),
        }
    }
}

#[cfg(test)]
impl Select for ScriptedSelect {
    fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        self.folders.borrow_mut().pop_front().flatten()
    }

    fn confirm(&self, _title: &str, _question: &str) -> bool {
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}
