mod catalog;
mod evaluator;
mod question;

pub use catalog::{Catalog, CatalogEntry, CatalogNode, QuestionRange};
pub use evaluator::{AnswerEvaluator, Evaluation};
pub use question::{Answer, Question, QuestionSet, ANSWERS_PER_QUESTION};
