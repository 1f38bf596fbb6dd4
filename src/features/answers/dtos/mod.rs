pub mod answer_dto;

pub use answer_dto::{AnswerResponseDto, CreateAnswerDto};
