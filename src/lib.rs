pub mod output;
pub mod parser;
pub mod record;
pub mod source;
pub mod summary;
pub mod worker;
