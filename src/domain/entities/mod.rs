pub mod vector_record;
