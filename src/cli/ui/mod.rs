//! Terminal helpers shared by the commands

pub mod prompts;
pub mod spinner;

pub use prompts::{prompt_confirmation, prompt_password, prompt_text, require_terminal, select_index};
pub use spinner::{Spinner, with_spinner};
