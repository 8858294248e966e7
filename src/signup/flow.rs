//! Built-in signup flow — the educator and student question sets.

use crate::signup::model::{Question, Role, SignupFlow};

/// The default LearnFrame signup flow.
pub fn default_flow() -> SignupFlow {
    SignupFlow {
        welcome_message: "Welcome! Please select your role to continue.".to_string(),
        roles: vec![educator_role(), student_role()],
    }
}

fn educator_role() -> Role {
    Role {
        id: "educator".to_string(),
        label: "Educator".to_string(),
        questions: vec![
            Question::select(
                "qualification",
                "What is your highest qualification?",
                ["Bachelor's", "Master's", "PhD", "Diploma", "Other"],
            ),
            Question::multiselect(
                "subjects",
                "Which subjects do you teach?",
                ["Math", "Science", "English", "History", "Computer Science", "Other"],
            ),
            Question::number(
                "experience",
                "How many years of teaching experience do you have?",
                0,
                50,
            ),
            Question::select(
                "certifications",
                "Select your teaching certification (if any)",
                ["CTET", "NET", "B.Ed", "M.Ed", "Other", "None"],
            ),
        ],
        summary_template: None,
    }
}

fn student_role() -> Role {
    Role {
        id: "student".to_string(),
        label: "Student".to_string(),
        questions: vec![
            Question::select(
                "examType",
                "Which exam are you preparing for?",
                ["JEE", "NEET", "CUET", "CAT", "UPSC", "None"],
            ),
            Question::text("goal", "What is your target rank/score?"),
            Question::select(
                "timeline",
                "When do you plan to achieve this goal?",
                ["6 months", "1 year", "2 years", "Other"],
            ),
            Question::select(
                "gradeLevel",
                "What is your current grade level?",
                ["High School", "Undergraduate", "Postgraduate", "Other"],
            ),
            Question::multiselect(
                "weakSubjects",
                "Which subjects do you feel you are weak in?",
                Vec::<String>::new(),
            )
            .with_conditional("examType", "JEE")
            .with_conditional_options("JEE", ["Math", "Physics", "Chemistry"])
            .with_conditional_options("NEET", ["Physics", "Chemistry", "Biology"])
            .with_conditional_options(
                "CUET",
                ["English", "General Knowledge", "Reasoning", "Subject-Specific"],
            )
            .with_conditional_options(
                "CAT",
                [
                    "Quantitative Aptitude",
                    "Verbal Ability",
                    "Data Interpretation",
                    "Logical Reasoning",
                ],
            )
            .with_conditional_options(
                "UPSC",
                ["History", "Geography", "Economics", "Polity", "Current Affairs"],
            ),
            Question::text("schoolName", "Enter your school/college name"),
        ],
        summary_template: Some(
            "I am {name}, studying in {schoolName}, my goal is to clear {examType} \
             with at least {goal} by {timeline}."
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::model::QuestionKind;

    #[test]
    fn default_flow_passes_validation() {
        default_flow().validate().unwrap();
    }

    #[test]
    fn default_flow_has_both_roles() {
        let flow = default_flow();
        assert_eq!(flow.roles.len(), 2);
        assert!(flow.role("educator").is_some());
        assert!(flow.role("student").is_some());
        assert!(flow.role("admin").is_none());
    }

    #[test]
    fn educator_questions_in_declared_order() {
        let flow = default_flow();
        let ids: Vec<&str> = flow
            .role("educator")
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(
            ids,
            ["qualification", "subjects", "experience", "certifications"]
        );
    }

    #[test]
    fn student_questions_in_declared_order() {
        let flow = default_flow();
        let ids: Vec<&str> = flow
            .role("student")
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(
            ids,
            ["examType", "goal", "timeline", "gradeLevel", "weakSubjects", "schoolName"]
        );
    }

    #[test]
    fn weak_subjects_conditions_on_exam_type() {
        let flow = default_flow();
        let role = flow.role("student").unwrap();
        let q = role.questions.iter().find(|q| q.id == "weakSubjects").unwrap();

        let cond = q.conditional.as_ref().unwrap();
        assert_eq!(cond.question_id, "examType");
        assert_eq!(q.conditional_options.len(), 5);
        assert_eq!(
            q.conditional_options["NEET"],
            ["Physics", "Chemistry", "Biology"]
        );
        // No static fallback options
        assert!(q.kind.static_options().is_empty());
    }

    #[test]
    fn experience_carries_numeric_bounds() {
        let flow = default_flow();
        let role = flow.role("educator").unwrap();
        let q = role.questions.iter().find(|q| q.id == "experience").unwrap();
        assert_eq!(
            q.kind,
            QuestionKind::Number {
                min: Some(0),
                max: Some(50)
            }
        );
    }

    #[test]
    fn flow_serde_roundtrip() {
        let flow = default_flow();
        let json = serde_json::to_string(&flow).unwrap();
        let parsed: SignupFlow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, flow);
    }
}
