use std::collections::BTreeSet;

use triage_cli::interview::{Command, parse_input, render_step};
use triage_core::models::submission::AnswerValue;
use triage_survey::registry::SurveyRegistry;
use triage_survey::surveys::chronic_risk_screening;

fn step(id: &str) -> triage_survey::definition::SurveyStep {
    let registry = SurveyRegistry::builtin();
    let definition = registry
        .get(chronic_risk_screening::ID)
        .expect("builtin survey");
    definition.step(id).expect("step exists").clone()
}

#[test]
fn commands_and_blank_lines() {
    let age = step("age");
    assert_eq!(parse_input(&age, "   ").expect("parse"), Command::Skip);
    assert_eq!(parse_input(&age, ":back").expect("parse"), Command::Back);
    assert_eq!(parse_input(&age, ":q").expect("parse"), Command::Quit);
}

#[test]
fn scale_requires_a_number() {
    let age = step("age");
    assert_eq!(
        parse_input(&age, "52").expect("parse"),
        Command::Answer(AnswerValue::Scale(52))
    );
    assert!(parse_input(&age, "fifty").is_err());
}

#[test]
fn choices_by_number_value_or_label() {
    let sex = step("sex");
    let female = Command::Answer(AnswerValue::Choice("female".to_string()));
    assert_eq!(parse_input(&sex, "2").expect("parse"), female);
    assert_eq!(parse_input(&sex, "female").expect("parse"), female);
    assert_eq!(parse_input(&sex, "Female").expect("parse"), female);
    assert!(parse_input(&sex, "3").is_err());
    assert!(parse_input(&sex, "0").is_err());
}

#[test]
fn multi_choice_splits_on_commas() {
    let history = step("family_history");
    let expected = BTreeSet::from(["diabetes".to_string(), "heart_disease".to_string()]);
    assert_eq!(
        parse_input(&history, "1, heart_disease").expect("parse"),
        Command::Answer(AnswerValue::MultiChoice(expected))
    );
    assert!(parse_input(&history, "1, cancer").is_err());
}

#[test]
fn rendering_lists_numbered_options() {
    let rendered = render_step(&step("smoker"), 5, 10);
    assert!(rendered.contains("[6/10] Do you smoke?"));
    assert!(rendered.contains("1) Yes"));
    assert!(rendered.contains("2) No"));

    let optional = render_step(&step("high_cholesterol"), 8, 10);
    assert!(optional.contains("(optional)"));
}
