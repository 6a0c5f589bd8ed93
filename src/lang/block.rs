use crate::{
    lang::tokenizing::{ReservedWord, Token},
    runtime::error::{self, ErrorKind, ScriptError},
};

/// The body of a `begin` … `end` block as found in a token stream.
#[derive(Debug)]
pub struct Block<'a> {
    /// The tokens between the block's `begin` and its matching `end`.
    pub body: &'a [Token],

    /// Index of the matching `end`.  Equal to the length of the token stream when the block was
    /// never closed.
    pub closer: usize,
}

impl Block<'_> {
    /// Did the scan find the matching `end`?
    pub fn is_terminated(&self, tokens: &[Token]) -> bool {
        self.closer < tokens.len()
    }
}

/// Extract one block body, starting just after its opening `begin`.
///
/// Nested `begin`/`end` pairs are kept inside the body.  If the stream runs out before the block is
/// closed the rest of the stream becomes the body, the caller decides if that is acceptable.  An
/// empty body is always an error.
pub fn extract_block(tokens: &[Token], start: usize) -> error::Result<Block<'_>> {
    let start = start.min(tokens.len());
    let mut depth = 1usize;
    let mut index = start;

    while index < tokens.len() {
        let token = &tokens[index];

        if token.is_reserved(ReservedWord::Begin) {
            depth += 1;
        } else if token.is_reserved(ReservedWord::End) {
            depth -= 1;

            if depth == 0 {
                break;
            }
        }

        index += 1;
    }

    if index == start {
        let location = start
            .checked_sub(1)
            .and_then(|opener| tokens.get(opener))
            .map(|opener| opener.location().clone());

        return ScriptError::new_as_result(
            location,
            ErrorKind::Structural,
            "Empty block body.".to_string(),
            None,
        );
    }

    Ok(Block {
        body: &tokens[start..index],
        closer: index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenizing::tokenize_from_source;
    use pretty_assertions::assert_eq;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|token| token.text()).collect()
    }

    #[test]
    fn stops_at_the_matching_end() {
        let tokens = tokenize_from_source("<test>", "begin 1 stdout end 2").unwrap();
        let block = extract_block(&tokens, 1).unwrap();

        assert_eq!(texts(block.body), vec!["1", "stdout"]);
        assert_eq!(block.closer, 3);
        assert!(block.is_terminated(&tokens));
    }

    #[test]
    fn keeps_nested_blocks_whole() {
        let source = "begin true if begin 1 end x while begin 2 end end 3";
        let tokens = tokenize_from_source("<test>", source).unwrap();
        let block = extract_block(&tokens, 1).unwrap();

        assert_eq!(
            texts(block.body),
            vec!["true", "if", "begin", "1", "end", "x", "while", "begin", "2", "end"]
        );
        assert_eq!(tokens[block.closer].text(), "end");
        assert_eq!(tokens[block.closer + 1].text(), "3");
    }

    #[test]
    fn unterminated_block_takes_the_rest() {
        let tokens = tokenize_from_source("<test>", "begin 1 begin 2 end").unwrap();
        let block = extract_block(&tokens, 1).unwrap();

        assert_eq!(texts(block.body), vec!["1", "begin", "2", "end"]);
        assert!(!block.is_terminated(&tokens));
    }

    #[test]
    fn empty_body_is_an_error() {
        let tokens = tokenize_from_source("<test>", "begin end").unwrap();
        let error = extract_block(&tokens, 1).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.location().as_ref().map(|l| l.column()), Some(1));
    }

    #[test]
    fn keyword_lookalikes_do_not_change_depth() {
        let tokens = tokenize_from_source("<test>", "begin beginning ending end").unwrap();
        let block = extract_block(&tokens, 1).unwrap();

        assert_eq!(texts(block.body), vec!["beginning", "ending"]);
    }
}
