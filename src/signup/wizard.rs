//! Signup wizard — fixed step order, role-dependent questions, and final
//! payload assembly.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::FlowError;
use crate::signup::model::{Answer, Question, QuestionKind, Role, SignupFlow};

/// `{fieldName}` placeholders in a role's summary template.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex"));

/// Fields collected outside the dynamic question list. Role switches
/// preserve these and clear everything else.
const BASIC_FIELDS: [&str; 5] = ["role", "name", "email", "password", "confirmPassword"];

/// The wizard steps, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
    RoleSelection,
    BasicInfo,
    DynamicQuestions,
    Review,
}

impl SignupStep {
    pub fn next(&self) -> Option<SignupStep> {
        match self {
            Self::RoleSelection => Some(Self::BasicInfo),
            Self::BasicInfo => Some(Self::DynamicQuestions),
            Self::DynamicQuestions => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn back(&self) -> Option<SignupStep> {
        match self {
            Self::RoleSelection => None,
            Self::BasicInfo => Some(Self::RoleSelection),
            Self::DynamicQuestions => Some(Self::BasicInfo),
            Self::Review => Some(Self::DynamicQuestions),
        }
    }
}

impl std::fmt::Display for SignupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RoleSelection => "role_selection",
            Self::BasicInfo => "basic_info",
            Self::DynamicQuestions => "dynamic_questions",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// The payload assembled at the Review step.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupSubmission {
    pub email: String,
    pub password: String,
    pub role: String,
    pub name: String,
    /// Only the selected role's question ids that hold an answer.
    pub additional_data: Map<String, Value>,
}

/// Drives a user through `RoleSelection → BasicInfo → DynamicQuestions →
/// Review`, accumulating answers along the way.
///
/// Review is exited only by a successful submission or by navigating back;
/// a failed submission leaves every answer intact.
pub struct SignupWizard {
    flow: SignupFlow,
    step: SignupStep,
    form: HashMap<String, Answer>,
}

impl SignupWizard {
    pub fn new(flow: SignupFlow) -> Self {
        Self {
            flow,
            step: SignupStep::RoleSelection,
            form: HashMap::new(),
        }
    }

    pub fn flow(&self) -> &SignupFlow {
        &self.flow
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    pub fn answer(&self, field: &str) -> Option<&Answer> {
        self.form.get(field)
    }

    /// The currently selected role, if any.
    pub fn selected_role(&self) -> Option<&Role> {
        let id = self.form.get("role")?.as_str()?;
        self.flow.role(id)
    }

    /// The selected role's questions, in declared order.
    pub fn questions(&self) -> &[Question] {
        self.selected_role().map(|r| r.questions.as_slice()).unwrap_or(&[])
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Record the role and advance to BasicInfo. Selecting a role clears
    /// any previously entered dynamic-question answers, since conditional
    /// answers from another role are meaningless.
    pub fn select_role(&mut self, role_id: &str) -> Result<(), FlowError> {
        if self.flow.role(role_id).is_none() {
            return Err(FlowError::UnknownRole(role_id.to_string()));
        }
        self.form.retain(|field, _| BASIC_FIELDS.contains(&field.as_str()));
        self.form
            .insert("role".to_string(), Answer::Text(role_id.to_string()));
        self.step = SignupStep::BasicInfo;
        tracing::debug!("Signup role selected: {role_id}");
        Ok(())
    }

    /// Advance one step. BasicInfo gates on all basic fields being
    /// non-empty; DynamicQuestions advances unconditionally; Review has no
    /// forward step.
    pub fn next(&mut self) -> Result<SignupStep, FlowError> {
        match self.step {
            SignupStep::RoleSelection => {
                if self.selected_role().is_none() {
                    return Err(FlowError::NoRoleSelected);
                }
            }
            SignupStep::BasicInfo => {
                for field in ["name", "email", "password", "confirmPassword"] {
                    if self.form.get(field).is_none_or(Answer::is_empty) {
                        return Err(FlowError::MissingField {
                            field: field.to_string(),
                        });
                    }
                }
            }
            SignupStep::DynamicQuestions | SignupStep::Review => {}
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Step backward, preserving all answers.
    pub fn back(&mut self) -> SignupStep {
        if let Some(prev) = self.step.back() {
            self.step = prev;
        }
        self.step
    }

    // ── Answers ─────────────────────────────────────────────────────

    pub fn set_answer(&mut self, field: &str, answer: Answer) {
        self.form.insert(field.to_string(), answer);
    }

    pub fn set_text(&mut self, field: &str, value: &str) {
        self.set_answer(field, Answer::Text(value.to_string()));
    }

    /// Parse a numeric input. Unparsable text clears the answer: absent
    /// means "not yet answered", never zero.
    pub fn set_number_input(&mut self, question_id: &str, input: &str) -> Result<(), FlowError> {
        let question = self.require_question(question_id)?;
        if !matches!(question.kind, QuestionKind::Number { .. }) {
            return Err(FlowError::WrongQuestionKind {
                question: question_id.to_string(),
                expected: "number".to_string(),
            });
        }
        match input.trim().parse::<i64>() {
            Ok(n) => {
                self.form.insert(question_id.to_string(), Answer::Number(n));
            }
            Err(_) => {
                self.form.remove(question_id);
            }
        }
        Ok(())
    }

    /// Toggle a multiselect option: add if absent, remove if present.
    /// Duplicates are impossible by construction.
    pub fn toggle_option(&mut self, question_id: &str, option: &str) -> Result<(), FlowError> {
        let question = self.require_question(question_id)?;
        if !matches!(question.kind, QuestionKind::Multiselect { .. }) {
            return Err(FlowError::WrongQuestionKind {
                question: question_id.to_string(),
                expected: "multiselect".to_string(),
            });
        }

        let mut selected = match self.form.remove(question_id) {
            Some(Answer::Multi(values)) => values,
            _ => Vec::new(),
        };
        if let Some(pos) = selected.iter().position(|v| v == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_string());
        }
        self.form
            .insert(question_id.to_string(), Answer::Multi(selected));
        Ok(())
    }

    fn require_question(&self, question_id: &str) -> Result<&Question, FlowError> {
        self.questions()
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| FlowError::UnknownQuestion(question_id.to_string()))
    }

    // ── Conditional resolution ──────────────────────────────────────

    /// The option set to offer for a question. When the question declares a
    /// conditional and the trigger question's current value maps to a
    /// non-empty list, that list is offered; otherwise the static options.
    pub fn offered_options<'a>(&'a self, question: &'a Question) -> &'a [String] {
        if let Some(cond) = &question.conditional {
            if let Some(value) = self.form.get(&cond.question_id).and_then(Answer::as_str) {
                if let Some(options) = question.conditional_options.get(value) {
                    if !options.is_empty() {
                        return options;
                    }
                }
            }
        }
        question.kind.static_options()
    }

    // ── Review & submission ─────────────────────────────────────────

    /// Render the role's summary template, substituting each `{field}`
    /// with its current value. Missing fields become empty strings. Pure
    /// and idempotent.
    pub fn render_summary(&self) -> Option<String> {
        let template = self.selected_role()?.summary_template.as_deref()?;
        let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &regex::Captures<'_>| {
            self.form.get(&caps[1]).map(Answer::display).unwrap_or_default()
        });
        Some(rendered.into_owned())
    }

    /// Label/value pairs for the review step: role, name, email, then
    /// every answered question in declared order.
    pub fn review_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Some(role) = self.selected_role() {
            entries.push(("Role".to_string(), role.label.clone()));
        }
        for (label, field) in [("Name", "name"), ("Email", "email")] {
            if let Some(answer) = self.form.get(field) {
                entries.push((label.to_string(), answer.display()));
            }
        }
        for question in self.questions() {
            if let Some(answer) = self.form.get(&question.id) {
                if !answer.is_empty() {
                    entries.push((question.label.clone(), answer.display()));
                }
            }
        }
        entries
    }

    /// Assemble the submission payload. Fails with `PasswordMismatch` when
    /// the passwords differ; the wizard stays at Review with every answer
    /// intact.
    pub fn build_submission(&self) -> Result<SignupSubmission, FlowError> {
        let role = self.selected_role().ok_or(FlowError::NoRoleSelected)?;

        let password = self.text_field("password");
        if password != self.text_field("confirmPassword") {
            return Err(FlowError::PasswordMismatch);
        }

        let mut additional_data = Map::new();
        for question in &role.questions {
            if let Some(answer) = self.form.get(&question.id) {
                additional_data.insert(question.id.clone(), Value::from(answer));
            }
        }

        Ok(SignupSubmission {
            email: self.text_field("email"),
            password,
            role: role.id.clone(),
            name: self.text_field("name"),
            additional_data,
        })
    }

    fn text_field(&self, field: &str) -> String {
        self.form
            .get(field)
            .and_then(Answer::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::flow::default_flow;

    fn wizard_at_questions(role: &str) -> SignupWizard {
        let mut w = SignupWizard::new(default_flow());
        w.select_role(role).unwrap();
        w.set_text("name", "A");
        w.set_text("email", "a@b.com");
        w.set_text("password", "pw");
        w.set_text("confirmPassword", "pw");
        w.next().unwrap();
        assert_eq!(w.step(), SignupStep::DynamicQuestions);
        w
    }

    #[test]
    fn step_order_is_fixed() {
        let mut w = SignupWizard::new(default_flow());
        assert_eq!(w.step(), SignupStep::RoleSelection);
        assert!(matches!(w.next(), Err(FlowError::NoRoleSelected)));

        w.select_role("student").unwrap();
        assert_eq!(w.step(), SignupStep::BasicInfo);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut w = SignupWizard::new(default_flow());
        assert!(matches!(
            w.select_role("admin"),
            Err(FlowError::UnknownRole(_))
        ));
        assert_eq!(w.step(), SignupStep::RoleSelection);
    }

    #[test]
    fn basic_info_gates_on_all_fields() {
        let mut w = SignupWizard::new(default_flow());
        w.select_role("student").unwrap();

        w.set_text("name", "A");
        w.set_text("email", "a@b.com");
        w.set_text("password", "pw");
        match w.next() {
            Err(FlowError::MissingField { field }) => assert_eq!(field, "confirmPassword"),
            other => panic!("expected MissingField, got {other:?}"),
        }
        assert_eq!(w.step(), SignupStep::BasicInfo);

        w.set_text("confirmPassword", "pw");
        assert_eq!(w.next().unwrap(), SignupStep::DynamicQuestions);
    }

    #[test]
    fn selected_role_yields_declared_question_sequence() {
        let w = wizard_at_questions("student");
        let ids: Vec<&str> = w.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(
            ids,
            ["examType", "goal", "timeline", "gradeLevel", "weakSubjects", "schoolName"]
        );
    }

    #[test]
    fn forward_to_review_is_unconditional() {
        let mut w = wizard_at_questions("educator");
        assert_eq!(w.next().unwrap(), SignupStep::Review);
        // Review has no forward step
        assert_eq!(w.next().unwrap(), SignupStep::Review);
    }

    #[test]
    fn back_preserves_answers() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");
        w.next().unwrap();
        assert_eq!(w.step(), SignupStep::Review);

        assert_eq!(w.back(), SignupStep::DynamicQuestions);
        assert_eq!(w.back(), SignupStep::BasicInfo);
        assert_eq!(w.back(), SignupStep::RoleSelection);
        assert_eq!(w.back(), SignupStep::RoleSelection);

        assert_eq!(w.answer("examType").unwrap().as_str(), Some("JEE"));
        assert_eq!(w.answer("name").unwrap().as_str(), Some("A"));
    }

    #[test]
    fn conditional_options_follow_trigger_value() {
        let mut w = wizard_at_questions("student");
        let flow = default_flow();
        let q = flow.role("student").unwrap().questions[4].clone();
        assert_eq!(q.id, "weakSubjects");

        // No trigger answer yet: static options (empty here)
        assert!(w.offered_options(&q).is_empty());

        w.set_text("examType", "NEET");
        assert_eq!(w.offered_options(&q), ["Physics", "Chemistry", "Biology"]);

        w.set_text("examType", "UPSC");
        assert_eq!(
            w.offered_options(&q),
            ["History", "Geography", "Economics", "Polity", "Current Affairs"]
        );

        // Unmapped trigger value falls back to static options
        w.set_text("examType", "None");
        assert!(w.offered_options(&q).is_empty());
    }

    #[test]
    fn multiselect_toggle_adds_and_removes() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");

        w.toggle_option("weakSubjects", "Math").unwrap();
        w.toggle_option("weakSubjects", "Physics").unwrap();
        assert_eq!(
            w.answer("weakSubjects").unwrap(),
            &Answer::Multi(vec!["Math".into(), "Physics".into()])
        );

        // Toggling again removes, never duplicates
        w.toggle_option("weakSubjects", "Math").unwrap();
        assert_eq!(
            w.answer("weakSubjects").unwrap(),
            &Answer::Multi(vec!["Physics".into()])
        );
    }

    #[test]
    fn toggle_rejects_non_multiselect() {
        let mut w = wizard_at_questions("student");
        assert!(matches!(
            w.toggle_option("goal", "x"),
            Err(FlowError::WrongQuestionKind { .. })
        ));
        assert!(matches!(
            w.toggle_option("nope", "x"),
            Err(FlowError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn number_input_parses_or_clears() {
        let mut w = wizard_at_questions("educator");
        w.set_number_input("experience", "7").unwrap();
        assert_eq!(w.answer("experience"), Some(&Answer::Number(7)));

        // Unparsable input yields absent, not zero
        w.set_number_input("experience", "seven").unwrap();
        assert_eq!(w.answer("experience"), None);

        w.set_number_input("experience", " 12 ").unwrap();
        assert_eq!(w.answer("experience"), Some(&Answer::Number(12)));
    }

    #[test]
    fn role_switch_clears_dynamic_answers() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");
        w.toggle_option("weakSubjects", "Math").unwrap();

        w.back();
        w.back();
        w.select_role("educator").unwrap();

        assert!(w.answer("examType").is_none());
        assert!(w.answer("weakSubjects").is_none());
        // Basic info survives the switch
        assert_eq!(w.answer("name").unwrap().as_str(), Some("A"));
        assert_eq!(w.answer("email").unwrap().as_str(), Some("a@b.com"));
    }

    #[test]
    fn summary_substitutes_and_is_idempotent() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");
        w.set_text("goal", "AIR 100");
        w.set_text("timeline", "1 year");
        w.set_text("schoolName", "DPS");

        let first = w.render_summary().unwrap();
        assert_eq!(
            first,
            "I am A, studying in DPS, my goal is to clear JEE with at least AIR 100 by 1 year."
        );
        assert_eq!(w.render_summary().unwrap(), first);
    }

    #[test]
    fn summary_missing_fields_render_empty() {
        let w = wizard_at_questions("student");
        let summary = w.render_summary().unwrap();
        assert!(!summary.contains('{'), "unsubstituted placeholder in {summary:?}");
        assert!(summary.contains("I am A, studying in ,"));
    }

    #[test]
    fn educator_role_has_no_summary() {
        let w = wizard_at_questions("educator");
        assert!(w.render_summary().is_none());
    }

    #[test]
    fn review_entries_skip_unanswered_questions() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");
        w.next().unwrap();

        let entries = w.review_entries();
        assert_eq!(entries[0], ("Role".to_string(), "Student".to_string()));
        assert_eq!(entries[1], ("Name".to_string(), "A".to_string()));
        assert_eq!(entries[2], ("Email".to_string(), "a@b.com".to_string()));
        assert_eq!(
            entries[3],
            ("Which exam are you preparing for?".to_string(), "JEE".to_string())
        );
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn submission_contains_only_answered_question_ids() {
        let mut w = wizard_at_questions("student");
        w.set_text("examType", "JEE");
        w.set_number_input("experience", "3").unwrap_err(); // not a student question
        w.toggle_option("weakSubjects", "Math").unwrap();
        w.next().unwrap();

        let submission = w.build_submission().unwrap();
        assert_eq!(submission.email, "a@b.com");
        assert_eq!(submission.role, "student");
        assert_eq!(submission.name, "A");
        assert_eq!(submission.additional_data.len(), 2);
        assert_eq!(submission.additional_data["examType"], "JEE");
        assert_eq!(
            submission.additional_data["weakSubjects"],
            serde_json::json!(["Math"])
        );
        // Basic fields never leak into additional data
        assert!(!submission.additional_data.contains_key("password"));
    }

    #[test]
    fn password_mismatch_blocks_submission_and_keeps_state() {
        let mut w = SignupWizard::new(default_flow());
        w.select_role("student").unwrap();
        w.set_text("name", "A");
        w.set_text("email", "a@b.com");
        w.set_text("password", "a");
        w.set_text("confirmPassword", "b");
        w.next().unwrap();
        w.set_text("examType", "JEE");
        w.next().unwrap();
        assert_eq!(w.step(), SignupStep::Review);

        assert!(matches!(
            w.build_submission(),
            Err(FlowError::PasswordMismatch)
        ));
        // Still at Review, answers intact
        assert_eq!(w.step(), SignupStep::Review);
        assert_eq!(w.answer("examType").unwrap().as_str(), Some("JEE"));
    }
}
