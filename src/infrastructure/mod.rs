pub mod encoders;
pub mod fs;
pub mod sqlite;
