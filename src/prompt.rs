//! Interactive prompts behind a trait.
//!
//! Commands that ask the user something take a `&dyn Prompter` argument.
//! The binary passes [`DialoguerPrompter`]; tests pass a
//! [`ScriptedPrompter`] loaded with the answers they expect to be asked
//! for, so no test ever depends on a terminal or on global state.

use std::collections::VecDeque;
use std::sync::Mutex;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};

use crate::error::{Error, Result};

pub trait Prompter {
    /// Yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Free-text answer, `default` when the user just presses enter.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;

    /// Pick any number of `items`; returns the chosen indices.
    fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Vec<usize>>;
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Prompt {
        message: e.to_string(),
    }
}

/// Terminal prompts rendered with `dialoguer`.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .map_err(prompt_error)
    }

    fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Vec<usize>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .interact()
            .map_err(prompt_error)
    }
}

/// A scripted answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Input(String),
    /// Use the prompt's default.
    Default,
    Select(Vec<usize>),
}

/// Deterministic prompter that replays answers in order and records every
/// question it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt text shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        let mut answers = self.answers.lock().map_err(|_| Error::LockPoisoned {
            context: "scripted prompter".to_string(),
        })?;
        answers.pop_front().ok_or_else(|| Error::Prompt {
            message: format!("no scripted answer for '{prompt}'"),
        })
    }

    fn mismatch(prompt: &str, answer: &Answer) -> Error {
        Error::Prompt {
            message: format!("unexpected scripted answer {answer:?} for '{prompt}'"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => Err(Self::mismatch(prompt, &other)),
        }
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Input(value) => Ok(value),
            Answer::Default => Ok(default.to_string()),
            other => Err(Self::mismatch(prompt, &other)),
        }
    }

    fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Vec<usize>> {
        match self.next(prompt)? {
            Answer::Select(indices) if indices.iter().all(|i| *i < items.len()) => Ok(indices),
            Answer::Default => Ok(Vec::new()),
            other => Err(Self::mismatch(prompt, &other)),
        }
    }
}
