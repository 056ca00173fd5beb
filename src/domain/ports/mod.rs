pub mod encoder;
pub mod vector_store;
