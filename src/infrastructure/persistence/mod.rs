pub mod connection;
pub mod label_repository;

pub use connection::Database;
pub use label_repository::{LabelDocument, MongoLabelRepository};
