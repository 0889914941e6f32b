//! User confirmation prompts for operations that change remote resources

use dialoguer::Confirm;

/// Ask the user to confirm a change.
///
/// `assume_yes` (from `-y`) skips the prompt. In batch mode without `-y` the
/// answer is always no, so unattended runs never change anything by accident.
pub fn confirm_action(
    prompt: &str,
    assume_yes: bool,
    batch_mode: bool,
) -> Result<bool, dialoguer::Error> {
    if assume_yes {
        return Ok(true);
    }
    if batch_mode {
        eprintln!("Batch mode: refusing to continue without --yes");
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
}
