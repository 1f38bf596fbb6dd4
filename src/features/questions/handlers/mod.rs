pub mod question_handler;
pub mod question_tag_handler;

pub use question_handler::*;
pub use question_tag_handler::*;
