mod create_label;
mod get_user_labels;
mod label_images;
mod search_labels;

pub use create_label::CreateLabelUseCase;
pub use get_user_labels::GetUserLabelsUseCase;
pub use search_labels::SearchLabelsUseCase;
