pub trait UpToExt: Iterator + Sized {
    /// Yields items until (and including) the first one matching
    /// `stop_predicate`. Used to take a token stream up to its end of file.
    fn up_to<P>(self, stop_predicate: P) -> UpTo<Self, P>
    where
        P: FnMut(&Self::Item) -> bool;
}

impl<I: Iterator> UpToExt for I {
    fn up_to<P>(self, stop_predicate: P) -> UpTo<I, P>
    where
        P: FnMut(&I::Item) -> bool,
    {
        UpTo {
            iter: self,
            stop_predicate,
            done: false,
        }
    }
}

pub struct UpTo<I, P> {
    iter: I,
    stop_predicate: P,
    done: bool,
}

impl<I, P> Iterator for UpTo<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.iter.next()?;
        self.done = (self.stop_predicate)(&item);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        lexer::Lexer, source::UnitId, token::Token, util::iter::UpToExt,
    };

    #[test]
    fn test_up_to() {
        let items: Vec<_> = (0..10).up_to(|x| *x == 5).collect();
        assert_eq!(items, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_up_to_infinite_token_stream() {
        let tokens: Vec<_> = Lexer::new("a b", UnitId::new(0))
            .up_to(Token::is_eof)
            .collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[2].is_eof());
    }
}
