pub mod answer_handler;

pub use answer_handler::*;
