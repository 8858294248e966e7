//! Signup system — declarative role/question flow and the multi-step
//! wizard that drives it.
//!
//! The flow data is declarative: each role carries an ordered question
//! sequence, and a question's offered options may depend on an earlier
//! answer. The wizard walks a fixed step order, accumulates answers, and
//! assembles the final submission payload.

pub mod flow;
pub mod model;
pub mod wizard;

pub use flow::default_flow;
pub use model::{Answer, Conditional, Question, QuestionKind, Role, SignupFlow};
pub use wizard::{SignupStep, SignupSubmission, SignupWizard};
