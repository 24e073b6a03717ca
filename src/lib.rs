pub mod ast;
pub mod ast_printer;
pub mod cursor;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;

pub use parser::parse;
