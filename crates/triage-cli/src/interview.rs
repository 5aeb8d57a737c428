//! Line-oriented rendering and parsing for interactive surveys.

use std::collections::BTreeSet;

use triage_core::models::submission::AnswerValue;
use triage_survey::definition::{ChoiceOption, StepKind, SurveyStep};

/// What the user typed at a step prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer(AnswerValue),
    /// Empty line: move on without answering.
    Skip,
    Back,
    Quit,
}

pub fn render_step(step: &SurveyStep, index: usize, total: usize) -> String {
    let mut out = format!("\n[{}/{}] {}", index + 1, total, step.prompt);
    if !step.required {
        out.push_str(" (optional)");
    }
    match &step.kind {
        StepKind::FreeText => {}
        StepKind::Scale { min, max } => out.push_str(&format!("\n  enter a number from {min} to {max}")),
        StepKind::SingleChoice { options } => push_options(&mut out, options, "pick one"),
        StepKind::MultiChoice { options } => {
            push_options(&mut out, options, "pick any, separated by commas")
        }
    }
    out
}

fn push_options(out: &mut String, options: &[ChoiceOption], hint: &str) {
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!("\n  {}) {}", i + 1, option.label));
    }
    out.push_str(&format!("\n  {hint}"));
}

/// Parse one input line for `step`. `:back` and `:quit` are commands;
/// options may be given by number or by value.
pub fn parse_input(step: &SurveyStep, line: &str) -> eyre::Result<Command> {
    let input = line.trim();
    match input {
        "" => return Ok(Command::Skip),
        ":back" | ":b" => return Ok(Command::Back),
        ":quit" | ":q" => return Ok(Command::Quit),
        _ => {}
    }

    let value = match &step.kind {
        StepKind::FreeText => AnswerValue::Text(input.to_string()),
        StepKind::Scale { .. } => {
            let n = input
                .parse::<i64>()
                .map_err(|_| eyre::eyre!("'{input}' is not a whole number"))?;
            AnswerValue::Scale(n)
        }
        StepKind::SingleChoice { options } => AnswerValue::Choice(resolve_option(options, input)?),
        StepKind::MultiChoice { options } => {
            let selected = input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| resolve_option(options, s))
                .collect::<eyre::Result<BTreeSet<String>>>()?;
            AnswerValue::MultiChoice(selected)
        }
    };
    Ok(Command::Answer(value))
}

fn resolve_option(options: &[ChoiceOption], input: &str) -> eyre::Result<String> {
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .map(|o| o.value.clone())
            .ok_or_else(|| eyre::eyre!("there is no option {n}"));
    }
    options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(input) || o.label.eq_ignore_ascii_case(input))
        .map(|o| o.value.clone())
        .ok_or_else(|| eyre::eyre!("'{input}' is not one of the options"))
}
