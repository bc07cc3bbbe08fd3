use std::fmt;

use crate::util::intern::Interner;

pub mod error;
pub mod tree;

/// What a [`Show`] implementation may need to render names and types.
#[derive(Clone, Copy)]
pub struct Context<'ident> {
    pub ident_interner: &'ident Interner<str>,
}

impl<'ident> Context<'ident> {
    pub fn new(ident_interner: &'ident Interner<str>) -> Self {
        Context { ident_interner }
    }
}

/// Like [`fmt::Display`], for values which only make sense next to their
/// interner. The alternate form of errors is prefixed by their span.
pub trait Show {
    fn show(&self, f: &mut fmt::Formatter<'_>, ctx: &Context<'_>) -> fmt::Result;

    fn display<'a>(&'a self, ctx: &'a Context<'a>) -> Shown<'a, Self>
    where
        Self: Sized,
    {
        Shown { value: self, ctx }
    }
}

pub struct Shown<'a, T> {
    value: &'a T,
    ctx: &'a Context<'a>,
}

impl<T: Show> fmt::Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.show(f, self.ctx)
    }
}
