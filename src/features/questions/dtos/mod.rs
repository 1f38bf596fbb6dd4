pub mod question_dto;

pub use question_dto::{
    CreateQuestionDto, QuestionDetailDto, QuestionResponseDto, ReconcileCategoriesDto,
    ReconcileResultDto, UpdateQuestionDto,
};
