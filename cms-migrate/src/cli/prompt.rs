//! Menu prompts for the interactive mode

use anyhow::{Context, Result, bail};
use dialoguer::Select;

/// Ask the user to pick one of `items`, returning its index
pub fn select<T: ToString>(prompt: &str, items: &[T]) -> Result<usize> {
    if items.is_empty() {
        bail!("Nothing to choose from for \"{}\"", prompt);
    }

    let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
    Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .context("Selection aborted")
}

/// Like [`select`] with an extra leading "None" choice
pub fn select_optional<T: ToString>(prompt: &str, items: &[T]) -> Result<Option<usize>> {
    let mut labels = vec!["None".to_string()];
    labels.extend(items.iter().map(ToString::to_string));

    let choice = select(prompt, &labels)?;
    Ok(choice.checked_sub(1))
}
