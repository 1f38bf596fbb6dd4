mod association_manager;
mod question_service;
mod question_tag_service;
mod tag_reconciler;

pub use association_manager::AssociationManager;
pub use question_service::QuestionService;
pub use question_tag_service::QuestionTagService;
pub use tag_reconciler::TagReconciler;
