mod question;
mod question_category;

pub use question::{CreateQuestion, Question};
pub use question_category::QuestionCategory;
