mod answer;

pub use answer::Answer;
