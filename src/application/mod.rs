pub mod import;
pub mod index_issue;
pub mod similar;
pub mod stats;
