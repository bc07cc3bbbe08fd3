use std::{fmt, ops::Index};

use crate::token::Span;

/// Identifies one compilation unit (one source file) inside a [`SourceMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(u32);

impl UnitId {
    /// Not associated with any unit.
    pub const NONE: UnitId = UnitId(u32::MAX);

    pub fn new(index: usize) -> UnitId {
        UnitId(u32::try_from(index).expect("too many units"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct SourceUnit {
    pub name: String,
    pub src: String,
    line_starts: Vec<u32>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> SourceUnit {
        let src = src.into();
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .map(|start| u32::try_from(start).expect("unit is too large"))
            .collect();
        SourceUnit {
            name: name.into(),
            src,
            line_starts,
        }
    }

    /// Returns the 1-based line of the given byte offset.
    pub fn lookup_line(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Returns the 1-based `(line, column)` of the given byte offset. Columns
    /// count characters, not bytes.
    pub fn lookup_location(&self, offset: u32) -> (usize, usize) {
        let line = self.lookup_line(offset);
        let line_start = self.line_starts[line - 1] as usize;
        let offset = (offset as usize).min(self.src.len());
        let column = self.src[line_start..offset].chars().count() + 1;
        (line, column)
    }
}

/// Owns the text of every unit being compiled.
#[derive(Debug, Default)]
pub struct SourceMap {
    units: Vec<SourceUnit>,
}

impl SourceMap {
    pub fn new() -> SourceMap {
        SourceMap::default()
    }

    pub fn add(&mut self, name: impl Into<String>, src: impl Into<String>) -> UnitId {
        let id = UnitId::new(self.units.len());
        self.units.push(SourceUnit::new(name, src));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&SourceUnit> {
        self.units.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &SourceUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId::new(i), unit))
    }

    /// Resolves the start of `span` into a printable position. Returns `None`
    /// for dummy spans.
    pub fn position(&self, span: Span) -> Option<Position<'_>> {
        let unit = self.get(span.unit)?;
        let (line, column) = unit.lookup_location(span.lo);
        Some(Position {
            line,
            column,
            unit: &unit.name,
        })
    }
}

impl Index<UnitId> for SourceMap {
    type Output = SourceUnit;

    fn index(&self, index: UnitId) -> &Self::Output {
        &self.units[index.index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position<'a> {
    pub line: usize,
    pub column: usize,
    pub unit: &'a str,
}

impl fmt::Display for Position<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Position { line, column, unit } = self;
        write!(f, "[Location ({line}:{column}) in file {unit}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_location() {
        let unit = SourceUnit::new("a.des", "ab\ncd\n\nçe");
        assert_eq!(unit.lookup_location(0), (1, 1));
        assert_eq!(unit.lookup_location(1), (1, 2));
        assert_eq!(unit.lookup_location(3), (2, 1));
        assert_eq!(unit.lookup_location(4), (2, 2));
        assert_eq!(unit.lookup_location(6), (3, 1));
        // `ç` takes two bytes.
        assert_eq!(unit.lookup_location(9), (4, 2));
    }

    #[test]
    fn test_position_display() {
        let mut map = SourceMap::new();
        let id = map.add("main.des", "class A {}\n  class B {}");
        let span = Span::new_of_bounds(13..18, id);
        let position = map.position(span).unwrap();
        assert_eq!(position.to_string(), "[Location (2:3) in file main.des]");
        assert_eq!(map.position(Span::DUMMY), None);
    }
}
