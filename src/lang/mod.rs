/// Module for tracking locations within the original source code.
pub mod source_buffer;

/// Module for turning the source code into a list of tokens with an ordered set of lexer rules.
pub mod tokenizing;

/// Module for finding the body of a `begin` … `end` block within a token list.  Conditionals,
/// loops and procedure definitions all share it.
pub mod block;
