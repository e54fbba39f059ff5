//! Terminal selection prompt.

use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use super::{Chooser, ResolveError};

/// [`Chooser`] backed by a `dialoguer` arrow-key menu.
///
/// Esc, `q` or Ctrl+C cancels, which ends the session.
pub struct SelectChooser {
    theme: ColorfulTheme,
}

impl SelectChooser {
    /// Create a chooser with the colourful theme.
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for SelectChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for SelectChooser {
    fn choose(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> Result<Option<usize>, ResolveError> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt();
        cancel_on_interrupt(choice)
    }
}

/// Ctrl+C in the menu arrives as an interrupted read, not a signal.
fn cancel_on_interrupt(
    choice: dialoguer::Result<Option<usize>>,
) -> Result<Option<usize>, ResolveError> {
    match choice {
        Ok(choice) => Ok(choice),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
            log::debug!("Selection interrupted");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
