use std::{
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use crate::{
    ast::Program,
    parser,
    source::SourceMap,
    symbol_table::{self, Stdlib, SymbolTable},
    token::Spanned,
    type_checker::{Checker, Decorations},
    util::{
        fmt::{Context, Show},
        intern::Interner,
    },
};

pub struct Options {
    /// Accepted source file extensions, without the dot.
    pub extensions: Vec<String>,
    /// The name of the method the program starts at.
    pub entry_name: String,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            extensions: vec!["des".into(), "deslang".into()],
            entry_name: "entry".into(),
        }
    }
}

/// A message with its location, if it has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub position: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{} {position}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} doesn't have a source extension (expected one of {expected})", path.display())]
    Extension { path: PathBuf, expected: String },
    #[error("no source files were given")]
    NoUnits,
    #[error("found {} syntax errors", .0.len())]
    Syntax(Vec<Diagnostic>),
    #[error("compilation aborted")]
    Fatal(Vec<Diagnostic>),
    #[error("found {} semantic errors", .0.len())]
    Semantic(Vec<Diagnostic>),
}

impl DriverError {
    /// The diagnostics which made the compilation fail, if any.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            DriverError::Syntax(d) | DriverError::Fatal(d) | DriverError::Semantic(d) => d,
            _ => &[],
        }
    }
}

/// Everything later stages need: the decorated units and the tables they were
/// checked against. The entry class is `table.entry`.
#[derive(Debug)]
pub struct Compilation {
    pub sources: SourceMap,
    pub interner: Interner<str>,
    pub units: Vec<Program>,
    pub table: SymbolTable,
    pub decorations: Decorations,
}

impl Compilation {
    pub fn entry_class(&self) -> Option<&str> {
        self.table.entry.map(|name| self.interner.get(name))
    }
}

/// Reads every unit into memory.
pub fn load<P: AsRef<Path>>(paths: &[P], options: &Options) -> Result<SourceMap, DriverError> {
    if paths.is_empty() {
        return Err(DriverError::NoUnits);
    }
    let mut sources = SourceMap::new();
    for path in paths {
        let path = path.as_ref();
        let accepted = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| options.extensions.iter().any(|e| e == ext));
        if !accepted {
            return Err(DriverError::Extension {
                path: path.to_owned(),
                expected: options.extensions.join(", "),
            });
        }
        let src = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.to_owned(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        log::debug!("loaded {name} ({} bytes)", src.len());
        sources.add(name, src);
    }
    Ok(sources)
}

pub fn compile_files<P: AsRef<Path>>(
    paths: &[P],
    options: &Options,
) -> Result<Compilation, DriverError> {
    let sources = load(paths, options)?;
    compile(sources, options)
}

/// Runs every stage over the loaded units. Each stage only runs if the
/// previous ones succeeded, except that table errors which aren't fatal are
/// reported along with the checker's.
pub fn compile(sources: SourceMap, options: &Options) -> Result<Compilation, DriverError> {
    let mut interner = Interner::with_capacity(256);
    let mut units = Vec::with_capacity(sources.len());
    let mut syntax = Vec::new();

    for (id, unit) in sources.iter() {
        match parser::parse_program(&unit.src, id, &mut interner) {
            Ok(program) => units.push(program),
            Err((program, errors)) => {
                syntax.extend(diagnostics(&interner, &sources, &errors));
                units.push(program);
            }
        }
    }
    log::debug!("parsed {} units, {} syntax errors", units.len(), syntax.len());
    if !syntax.is_empty() {
        return Err(DriverError::Syntax(syntax));
    }

    let stdlib = Stdlib::new(&mut interner);
    let entry_name = interner.intern(&options.entry_name);
    let (table, table_errors) = symbol_table::build(&units, stdlib, entry_name);
    let mut semantic = diagnostics(&interner, &sources, &table_errors);
    log::debug!("built tables, {} errors", table_errors.len());
    if table_errors.iter().any(|e| e.inner.is_fatal()) {
        return Err(DriverError::Fatal(semantic));
    }

    let decorations = match Checker::new(&table).check(&units) {
        Ok(decorations) => decorations,
        Err((decorations, errors)) => {
            semantic.extend(diagnostics(&interner, &sources, &errors));
            decorations
        }
    };
    if !semantic.is_empty() {
        return Err(DriverError::Semantic(semantic));
    }

    let compilation = Compilation {
        sources,
        interner,
        units,
        table,
        decorations,
    };
    log::info!(
        "compiled {} units, entry class {}",
        compilation.units.len(),
        compilation.entry_class().unwrap_or("<none>")
    );
    Ok(compilation)
}

fn diagnostics<E>(interner: &Interner<str>, sources: &SourceMap, errors: &[Spanned<E>]) -> Vec<Diagnostic>
where
    Spanned<E>: Show,
{
    let ctx = Context::new(interner);
    errors
        .iter()
        .map(|error| Diagnostic {
            message: error.display(&ctx).to_string(),
            position: sources.position(error.span).map(|p| p.to_string()),
        })
        .collect()
}
