use dialoguer::{theme::ColorfulTheme, Input, Select};
use eyre::{eyre, Context, Result};

/// The console the application talks to the user through.
pub trait Prompt {
    /// Asks the user to pick one of `items`, `None` when the user cancels.
    fn select<S: ToString>(&mut self, prompt: &str, items: &[S]) -> Result<Option<usize>>;

    /// Asks the user for a line of text.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Shows a message to the user.
    fn show(&mut self, message: &str);
}

impl<P: Prompt> Prompt for &mut P {
    fn select<S: ToString>(&mut self, prompt: &str, items: &[S]) -> Result<Option<usize>> {
        (**self).select(prompt, items)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        (**self).input(prompt)
    }

    fn show(&mut self, message: &str) {
        (**self).show(message);
    }
}

/// The user's terminal.
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Default for Terminal {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompt for Terminal {
    fn select<S: ToString>(&mut self, prompt: &str, items: &[S]) -> Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(0)
            .items(items)
            .interact_opt()
            .wrap_err_with(|| eyre!("User selection cancelled"))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .wrap_err_with(|| eyre!("User input cancelled"))
    }

    fn show(&mut self, message: &str) {
        println!("{message}");
    }
}
