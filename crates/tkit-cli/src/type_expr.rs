//! Parser for angle-bracket type expressions.
//!
//! ```text
//! Int32                       simple type
//! System.Int32                namespace-qualified
//! List<Int32>                 constructed
//! Dictionary<String, List<T>> nested; `T` is a placeholder when in scope
//! List<>   Dictionary<,>      open generic definitions
//! ```
//!
//! Names resolve through [`SymbolTable::lookup`]. Inside a declaration's
//! scope, a bare name equal to one of its type parameters is that
//! placeholder and shadows any type of the same name.

use anyhow::{Result, anyhow, bail};
use tkit_solver::{SymbolTable, TypeArgument, TypeRef, TypeSymbol};

/// Deepest argument nesting accepted, e.g. `A<A<A<Int32>>>` nests 3 levels.
pub const MAX_NESTING: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Dot,
    Lt,
    Gt,
    Comma,
}

#[derive(Clone, Debug)]
struct Spanned {
    token: Token,
    column: usize,
}

fn tokenize(text: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let column = offset + 1;
        let token = match c {
            c if c.is_whitespace() => continue,
            '.' => Token::Dot,
            '<' => Token::Lt,
            '>' => Token::Gt,
            ',' => Token::Comma,
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !(next.is_alphanumeric() || next == '_') {
                        break;
                    }
                    ident.push(next);
                    chars.next();
                }
                Token::Ident(ident)
            }
            other => bail!("unexpected character '{other}' at column {column}"),
        };
        tokens.push(Spanned { token, column });
    }
    Ok(tokens)
}

/// Parses type expressions against one table.
pub struct TypeExprParser<'a> {
    table: &'a SymbolTable,
    scope: Option<TypeSymbol>,
}

impl<'a> TypeExprParser<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table, scope: None }
    }

    /// Resolve bare parameter names of `owner` to its placeholders.
    pub fn with_scope(mut self, owner: TypeSymbol) -> Self {
        self.scope = Some(owner);
        self
    }

    pub fn parse(&self, text: &str) -> Result<TypeRef> {
        let tokens = tokenize(text)?;
        let mut cursor = Cursor {
            tokens: &tokens,
            pos: 0,
            end_column: text.len() + 1,
            nesting: 0,
        };
        let ty = match self.parse_argument(&mut cursor)? {
            TypeArgument::Type(ty) => ty,
            TypeArgument::Param(_) => bail!("`{text}` is a type parameter, not a type"),
        };
        if let Some(extra) = cursor.peek() {
            bail!("unexpected {} at column {}", describe(&extra.token), extra.column);
        }
        Ok(ty)
    }

    fn parse_argument(&self, cursor: &mut Cursor<'_>) -> Result<TypeArgument> {
        let (name, column) = cursor.name()?;
        let has_args = cursor.eat(&Token::Lt);

        if !has_args && !name.contains('.') {
            if let Some(param) = self.scope.and_then(|owner| self.table.param_by_name(owner, &name)) {
                return Ok(TypeArgument::Param(param));
            }
        }

        let symbol = self
            .table
            .lookup(&name)
            .ok_or_else(|| anyhow!("unknown type `{name}` at column {column}"))?;
        let arity = self.table.get(symbol).map_or(0, |info| info.arity());

        if !has_args {
            if arity > 0 {
                bail!(
                    "`{name}` takes {arity} type argument(s); write `{name}<...>` or the open form `{}`",
                    open_form(&name, arity)
                );
            }
            return Ok(TypeArgument::simple(symbol));
        }

        // Open definition: only commas between the brackets
        if matches!(cursor.peek().map(|t| &t.token), Some(Token::Gt | Token::Comma)) {
            let mut slots = 1;
            while cursor.eat(&Token::Comma) {
                slots += 1;
            }
            cursor.expect(&Token::Gt)?;
            if slots != arity {
                bail!(
                    "`{name}` takes {arity} type argument(s) but the open form at column {column} has {slots}"
                );
            }
            return Ok(TypeArgument::Type(TypeRef::open(symbol, arity)));
        }

        cursor.nesting += 1;
        if cursor.nesting > MAX_NESTING {
            bail!("type arguments at column {column} nest deeper than {MAX_NESTING} levels");
        }
        let mut args = vec![self.parse_argument(cursor)?];
        while cursor.eat(&Token::Comma) {
            args.push(self.parse_argument(cursor)?);
        }
        cursor.expect(&Token::Gt)?;
        cursor.nesting -= 1;
        if args.len() != arity {
            bail!(
                "`{name}` takes {arity} type argument(s) but {} were given at column {column}",
                args.len()
            );
        }
        Ok(TypeArgument::Type(TypeRef::generic(symbol, args)))
    }
}

/// Parse `text` with no placeholders in scope.
pub fn parse_type(table: &SymbolTable, text: &str) -> Result<TypeRef> {
    TypeExprParser::new(table).parse(text)
}

fn open_form(name: &str, arity: usize) -> String {
    format!("{name}<{}>", ",".repeat(arity.saturating_sub(1)))
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("`{name}`"),
        Token::Dot => "'.'".to_string(),
        Token::Lt => "'<'".to_string(),
        Token::Gt => "'>'".to_string(),
        Token::Comma => "','".to_string(),
    }
}

struct Cursor<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    end_column: usize,
    nesting: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        match self.peek() {
            Some(t) if &t.token == token => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => bail!(
                "expected {} but found {} at column {}",
                describe(token),
                describe(&t.token),
                t.column
            ),
            None => bail!(
                "expected {} at column {} but the expression ended",
                describe(token),
                self.end_column
            ),
        }
    }

    /// Dotted identifier. Returns the name and its starting column.
    fn name(&mut self) -> Result<(String, usize)> {
        let (mut name, column) = self.ident()?;
        while self.eat(&Token::Dot) {
            let (part, _) = self.ident()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok((name, column))
    }

    fn ident(&mut self) -> Result<(String, usize)> {
        match self.peek() {
            Some(Spanned {
                token: Token::Ident(ident),
                column,
            }) => {
                self.pos += 1;
                Ok((ident.clone(), *column))
            }
            Some(t) => bail!(
                "expected a type name but found {} at column {}",
                describe(&t.token),
                t.column
            ),
            None => bail!("expected a type name at column {}", self.end_column),
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_expr_tests.rs"]
mod tests;
