pub mod assistant;
pub mod nlp;
pub mod store;
