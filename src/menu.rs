//! # Menu Module
//!
//! Presents pick lists through `rofi -dmenu` and reports the chosen row.
//!
//! The interaction is deliberately narrow: the caller hands over a prompt,
//! the rows, and the row to preselect; the menu answers with the chosen
//! index or `None` when the user dismissed it. Everything else about the
//! flow (what the rows mean, what happens next) stays in the navigator,
//! which is also why the trait exists: tests script a [`Menu`] and never
//! spawn a real process.
//!
//! `rofi` is asked for `-format i`, so its stdout is the bare row index.
//! Dismissal shows up as a non-zero exit status, and typing a row that does
//! not exist yields `-1`; both collapse into `None` here.

use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

const MENU_PROGRAM: &str = "rofi";

/// A pick list the user chooses one row from.
pub trait Menu {
    /// Show `items` under `prompt` with `preselect` highlighted.
    ///
    /// Returns the chosen row's index, or `None` when the menu was
    /// dismissed.
    fn select(&self, prompt: &str, items: &[String], preselect: usize) -> Result<Option<usize>>;
}

/// The production menu, backed by a `rofi -dmenu` subprocess per prompt.
pub struct RofiMenu {
    case_sensitive: bool,
    extra_args: Vec<String>,
}

impl RofiMenu {
    #[must_use]
    pub fn new(case_sensitive: bool, extra_args: Vec<String>) -> Self {
        Self {
            case_sensitive,
            extra_args,
        }
    }
}

/// Argument list for one menu invocation.
///
/// User-supplied pass-through arguments go last so they can override the
/// defaults chosen here.
#[must_use]
fn build_args(
    prompt: &str,
    preselect: usize,
    case_sensitive: bool,
    extra_args: &[String],
) -> Vec<String> {
    let mut args = vec![
        "-dmenu".to_string(),
        "-p".to_string(),
        prompt.to_string(),
        "-format".to_string(),
        "i".to_string(),
        "-selected-row".to_string(),
        preselect.to_string(),
    ];
    if !case_sensitive {
        args.push("-i".to_string());
    }
    args.extend(extra_args.iter().cloned());
    args
}

impl Menu for RofiMenu {
    fn select(&self, prompt: &str, items: &[String], preselect: usize) -> Result<Option<usize>> {
        let args = build_args(prompt, preselect, self.case_sensitive, &self.extra_args);
        debug!("Prompting '{}' with {} rows", prompt, items.len());

        let mut child = Command::new(MENU_PROGRAM)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to launch {MENU_PROGRAM} (is it installed?)"))?;

        let mut stdin = child
            .stdin
            .take()
            .with_context(|| format!("Failed to open {MENU_PROGRAM}'s stdin"))?;
        stdin
            .write_all(items.join("\n").as_bytes())
            .with_context(|| format!("Failed to write the menu rows to {MENU_PROGRAM}"))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {MENU_PROGRAM}"))?;
        if !output.status.success() {
            debug!("Menu dismissed ({})", output.status);
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim().parse::<usize>() {
            Ok(index) if index < items.len() => Ok(Some(index)),
            _ => Ok(None),
        }
    }
}
