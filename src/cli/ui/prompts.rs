use anyhow::{Result, bail};
use dialoguer::{Input, Password, Select};
use is_terminal::IsTerminal;

/// Refuse to start an interactive command when stdin is piped
pub fn require_terminal(command: &str) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("'{}' is interactive and needs a terminal", command);
    }
    Ok(())
}

/// Yes/No question as an arrow-key selection
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&["Yes", "No"])
        .default(if default_yes { 0 } else { 1 })
        .interact()?;

    Ok(selection == 0)
}

/// Free-text input; `initial` is offered as the default answer
pub fn prompt_text(prompt: &str, initial: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(initial) = initial.filter(|v| !v.is_empty()) {
        input = input.default(initial.to_string());
    }
    Ok(input.interact_text()?)
}

pub fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Pick one of `items`, returning its index
pub fn select_index<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default.min(labels.len().saturating_sub(1)))
        .interact()?;

    Ok(selection)
}
