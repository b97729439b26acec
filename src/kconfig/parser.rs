//! Recursive descent parser for Kconfig files.
//!
//! Builds the node arena from a root file, following `source` statements.
//! Each logical line is preprocessed, tokenized with [`super::lexer`], and
//! dispatched on its first keyword. Finalization (dependency propagation,
//! implicit menus, reverse dependencies) runs once the whole tree is read.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::error::KconfigError;
use super::expr::{Expr, RelOp, ScRef};
use super::finalize;
use super::lexer::{Token, tokenize};
use super::preprocess::{ExpandError, Location, Preprocessor};
use super::tree::{ChoiceId, Item, Kconfig, MenuNode, NodeId, Prompt, SymbolId, SymbolType};
use super::Environment;

/// Parse a Kconfig tree rooted at `entry`.
pub(crate) fn parse_file(entry: &Path, env: &dyn Environment) -> Result<Kconfig, KconfigError> {
    let srctree = env.var("srctree").filter(|s| !s.is_empty());
    let text = std::fs::read_to_string(entry).map_err(|e| KconfigError::io(entry, e))?;
    let filename = display_name(entry, srctree.as_deref());
    let mut parser = Parser::new(env, &filename, srctree);
    parser.include_path.push(canonical(entry));
    let mut reader = FileReader::new(filename, entry.to_path_buf(), &text);
    let top = parser.tree.top_node();
    parser.parse_block(&mut reader, None, top)?;
    Ok(parser.finish())
}

/// Parse Kconfig source held in memory. `source` statements still resolve
/// against the filesystem.
pub(crate) fn parse_source(
    filename: &str,
    text: &str,
    env: &dyn Environment,
) -> Result<Kconfig, KconfigError> {
    let srctree = env.var("srctree").filter(|s| !s.is_empty());
    let mut parser = Parser::new(env, filename, srctree);
    let mut reader = FileReader::new(filename.to_string(), PathBuf::from(filename), text);
    let top = parser.tree.top_node();
    parser.parse_block(&mut reader, None, top)?;
    Ok(parser.finish())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Filenames inside `$srctree` are stored relative to it.
fn display_name(path: &Path, srctree: Option<&str>) -> String {
    let relative = srctree.and_then(|tree| path.strip_prefix(tree).ok());
    relative.unwrap_or(path).to_string_lossy().replace('\\', "/")
}

// ============================================================================
// Line reading
// ============================================================================

#[derive(Debug, Clone)]
struct LogicalLine {
    linenr: u32,
    text: String,
}

/// Reads one Kconfig file as logical lines (backslash continuations joined),
/// with access to raw physical lines for help text.
struct FileReader {
    filename: String,
    path: PathBuf,
    lines: Vec<String>,
    pos: usize,
    pushed_back: Option<LogicalLine>,
}

impl FileReader {
    fn new(filename: String, path: PathBuf, text: &str) -> Self {
        Self {
            filename,
            path,
            lines: text.lines().map(str::to_string).collect(),
            pos: 0,
            pushed_back: None,
        }
    }

    fn next_line(&mut self) -> Option<LogicalLine> {
        if let Some(line) = self.pushed_back.take() {
            return Some(line);
        }
        let start = self.pos;
        let mut text = String::new();
        loop {
            let raw = self.lines.get(self.pos)?;
            self.pos += 1;
            match raw.strip_suffix('\\') {
                Some(head) => {
                    text.push_str(head);
                    if self.pos >= self.lines.len() {
                        break;
                    }
                }
                None => {
                    text.push_str(raw);
                    break;
                }
            }
        }
        Some(LogicalLine {
            linenr: start as u32 + 1,
            text,
        })
    }

    fn next_raw(&mut self) -> Option<String> {
        let raw = self.lines.get(self.pos)?.clone();
        self.pos += 1;
        Some(raw)
    }

    fn unread_raw(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    fn unread(&mut self, line: LogicalLine) {
        self.pushed_back = Some(line);
    }

    fn last_linenr(&self) -> u32 {
        self.lines.len() as u32
    }
}

// ============================================================================
// Token cursor
// ============================================================================

/// Cursor over the tokens of one logical line.
struct Tokens {
    tokens: Vec<Token>,
    pos: usize,
    filename: String,
    linenr: u32,
}

impl Tokens {
    fn error(&self, message: impl Into<String>) -> KconfigError {
        KconfigError::syntax(&self.filename, self.linenr, message)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_word(word)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_word(&mut self) -> Result<String, KconfigError> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            other => Err(self.error(format!("expected a name, got {}", describe(other.as_ref())))),
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), KconfigError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{word}'")))
        }
    }

    fn expect_str(&mut self) -> Result<String, KconfigError> {
        match self.next() {
            Some(Token::Str(s)) => Ok(s),
            other => Err(self.error(format!(
                "expected a quoted string, got {}",
                describe(other.as_ref())
            ))),
        }
    }

    fn expect_end(&self) -> Result<(), KconfigError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("extra tokens at end of line: {}", describe(Some(token))))),
        }
    }

    // ------------------------------------------------------------------
    // Expressions: expr := and ('||' expr)?, and := factor ('&&' and)?
    // ------------------------------------------------------------------

    fn parse_expr(&mut self, tree: &mut Kconfig) -> Result<Expr, KconfigError> {
        let lhs = self.parse_and(tree)?;
        if self.eat(&Token::OrOr) {
            let rhs = self.parse_expr(tree)?;
            Ok(Expr::Or(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    fn parse_and(&mut self, tree: &mut Kconfig) -> Result<Expr, KconfigError> {
        let lhs = self.parse_factor(tree)?;
        if self.eat(&Token::AndAnd) {
            let rhs = self.parse_and(tree)?;
            Ok(Expr::And(Box::new(lhs), Box::new(rhs)))
        } else {
            Ok(lhs)
        }
    }

    fn parse_factor(&mut self, tree: &mut Kconfig) -> Result<Expr, KconfigError> {
        if self.eat(&Token::Bang) {
            return Ok(Expr::Not(Box::new(self.parse_factor(tree)?)));
        }
        if self.eat(&Token::LParen) {
            let expr = self.parse_expr(tree)?;
            if !self.eat(&Token::RParen) {
                return Err(self.error("missing ')'"));
            }
            return Ok(expr);
        }

        let lhs = self.parse_sym(tree)?;
        let op = match self.peek() {
            Some(Token::Eq) => RelOp::Equal,
            Some(Token::BangEq) => RelOp::Unequal,
            Some(Token::Lt) => RelOp::Less,
            Some(Token::LtEq) => RelOp::LessEqual,
            Some(Token::Gt) => RelOp::Greater,
            Some(Token::GtEq) => RelOp::GreaterEqual,
            _ => return Ok(Expr::Sym(ScRef::Symbol(lhs))),
        };
        self.pos += 1;
        let rhs = self.parse_sym(tree)?;
        Ok(Expr::Rel(op, ScRef::Symbol(lhs), ScRef::Symbol(rhs)))
    }

    /// A symbol operand: quoted strings and `n`/`m`/`y` are constants.
    fn parse_sym(&mut self, tree: &mut Kconfig) -> Result<SymbolId, KconfigError> {
        match self.next() {
            Some(Token::Str(s)) => Ok(tree.const_sym(&s)),
            Some(Token::Word(w)) if matches!(w.as_str(), "n" | "m" | "y") => Ok(tree.const_sym(&w)),
            Some(Token::Word(w)) => Ok(tree.sym(&w)),
            other => Err(self.error(format!("expected a symbol, got {}", describe(other.as_ref())))),
        }
    }

    fn parse_nonconst_sym(&mut self, tree: &mut Kconfig) -> Result<SymbolId, KconfigError> {
        match self.next() {
            Some(Token::Word(w)) if !matches!(w.as_str(), "n" | "m" | "y") => Ok(tree.sym(&w)),
            other => Err(self.error(format!(
                "expected a non-constant symbol, got {}",
                describe(other.as_ref())
            ))),
        }
    }

    /// Optional trailing `if EXPR`, then end of line.
    fn parse_cond(&mut self, tree: &mut Kconfig) -> Result<Expr, KconfigError> {
        let cond = if self.eat_word("if") {
            self.parse_expr(tree)?
        } else {
            Expr::y()
        };
        self.expect_end()?;
        Ok(cond)
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        None => "end of line".to_string(),
        Some(Token::Word(w)) => format!("'{w}'"),
        Some(Token::Str(s)) => format!("\"{s}\""),
        Some(other) => format!("{other:?}"),
    }
}

fn type_keyword(word: &str) -> Option<SymbolType> {
    match word {
        "bool" | "boolean" | "def_bool" => Some(SymbolType::Bool),
        "tristate" | "def_tristate" => Some(SymbolType::Tristate),
        "string" | "def_string" => Some(SymbolType::String),
        "int" | "def_int" => Some(SymbolType::Int),
        "hex" | "def_hex" => Some(SymbolType::Hex),
        _ => None,
    }
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            let pad = 8 - out.chars().count() % 8;
            out.extend(std::iter::repeat_n(' ', pad));
        } else {
            out.push(c);
        }
    }
    out
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'e> {
    tree: Kconfig,
    pp: Preprocessor<'e>,
    include_path: Vec<PathBuf>,
    defined_syms: Vec<SymbolId>,
    choices: Vec<ChoiceId>,
}

impl<'e> Parser<'e> {
    fn new(env: &'e dyn Environment, top_filename: &str, srctree: Option<String>) -> Self {
        Self {
            tree: Kconfig::empty(top_filename, srctree),
            pp: Preprocessor::new(env),
            include_path: Vec::new(),
            defined_syms: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn finish(mut self) -> Kconfig {
        let mut seen = FxHashSet::default();
        self.tree.unique_defined_syms = self
            .defined_syms
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        let mut seen = FxHashSet::default();
        self.tree.unique_choices = self
            .choices
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        finalize::finalize(&mut self.tree);
        debug!(
            "parsed {} symbols, {} choices, {} menu nodes",
            self.tree.unique_defined_syms.len(),
            self.tree.unique_choices.len(),
            self.tree.nodes.len()
        );
        self.tree
    }

    fn expand_error(&self, reader: &FileReader, linenr: u32, err: ExpandError) -> KconfigError {
        match err {
            ExpandError::Unterminated => KconfigError::syntax(&reader.filename, linenr, "unterminated '$('"),
            ExpandError::TooDeep => KconfigError::syntax(&reader.filename, linenr, "macro expansion too deep"),
            ExpandError::UserError(message) => KconfigError::UserError {
                filename: reader.filename.clone(),
                linenr,
                message,
            },
        }
    }

    /// Preprocess and tokenize a line. `None` for blank lines, comments and
    /// variable assignments.
    fn tokenize_line(
        &mut self,
        reader: &FileReader,
        line: &LogicalLine,
    ) -> Result<Option<Tokens>, KconfigError> {
        let trimmed = line.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let loc = Location {
            filename: &reader.filename,
            linenr: line.linenr,
        };
        let assigned = self
            .pp
            .try_assignment(&line.text, loc)
            .map_err(|e| self.expand_error(reader, line.linenr, e))?;
        if assigned {
            return Ok(None);
        }
        let expanded = self
            .pp
            .expand(&line.text, loc)
            .map_err(|e| self.expand_error(reader, line.linenr, e))?;
        let tokens = tokenize(&expanded).map_err(|bad| {
            KconfigError::syntax(&reader.filename, line.linenr, format!("unrecognized token '{bad}'"))
        })?;
        if tokens.is_empty() {
            return Ok(None);
        }
        Ok(Some(Tokens {
            tokens,
            pos: 0,
            filename: reader.filename.clone(),
            linenr: line.linenr,
        }))
    }

    fn attach(&mut self, parent: NodeId, node: MenuNode) -> NodeId {
        let id = self.tree.push_node(node);
        self.tree.node_mut(id).parent = Some(parent);
        self.tree.node_mut(parent).children.push(id);
        id
    }

    fn parse_block(
        &mut self,
        reader: &mut FileReader,
        end: Option<&'static str>,
        parent: NodeId,
    ) -> Result<(), KconfigError> {
        loop {
            let Some(line) = reader.next_line() else {
                return match end {
                    Some(end) => Err(KconfigError::syntax(
                        &reader.filename,
                        reader.last_linenr(),
                        format!("missing '{end}'"),
                    )),
                    None => Ok(()),
                };
            };
            let Some(mut toks) = self.tokenize_line(reader, &line)? else {
                continue;
            };
            let keyword = toks.expect_word()?;
            let linenr = line.linenr;

            match keyword.as_str() {
                "config" | "menuconfig" => {
                    let name = toks.expect_word()?;
                    toks.expect_end()?;
                    let sym = self.tree.sym(&name);
                    let mut node = MenuNode::new(Item::Symbol(sym), &reader.filename, linenr);
                    node.is_menuconfig = keyword == "menuconfig";
                    let id = self.attach(parent, node);
                    self.tree.symbol_mut(sym).nodes.push(id);
                    self.defined_syms.push(sym);
                    self.parse_properties(reader, id)?;
                }
                "choice" => {
                    let name = if toks.at_end() {
                        None
                    } else {
                        Some(toks.expect_word()?)
                    };
                    toks.expect_end()?;
                    let choice = self.tree.choice_for(name.as_deref());
                    let node = MenuNode::new(Item::Choice(choice), &reader.filename, linenr);
                    let id = self.attach(parent, node);
                    self.tree.choice_mut(choice).nodes.push(id);
                    self.choices.push(choice);
                    self.parse_properties(reader, id)?;
                    self.parse_block(reader, Some("endchoice"), id)?;
                }
                "menu" => {
                    let title = toks.expect_str()?;
                    toks.expect_end()?;
                    let mut node = MenuNode::new(Item::Menu, &reader.filename, linenr);
                    node.prompt = Some(Prompt {
                        text: title,
                        cond: Expr::y(),
                    });
                    let id = self.attach(parent, node);
                    self.parse_properties(reader, id)?;
                    self.parse_block(reader, Some("endmenu"), id)?;
                }
                "comment" => {
                    let text = toks.expect_str()?;
                    toks.expect_end()?;
                    let mut node = MenuNode::new(Item::Comment, &reader.filename, linenr);
                    node.prompt = Some(Prompt {
                        text,
                        cond: Expr::y(),
                    });
                    let id = self.attach(parent, node);
                    self.parse_properties(reader, id)?;
                }
                "if" => {
                    let cond = toks.parse_expr(&mut self.tree)?;
                    toks.expect_end()?;
                    let mut node = MenuNode::new(Item::If, &reader.filename, linenr);
                    node.dep = cond;
                    let id = self.attach(parent, node);
                    self.parse_block(reader, Some("endif"), id)?;
                }
                "mainmenu" => {
                    let title = toks.expect_str()?;
                    toks.expect_end()?;
                    let top = self.tree.top_node();
                    self.tree.node_mut(top).prompt = Some(Prompt {
                        text: title,
                        cond: Expr::y(),
                    });
                }
                "source" | "rsource" | "osource" | "orsource" => {
                    let pattern = toks.expect_str()?;
                    toks.expect_end()?;
                    self.parse_source(reader, &keyword, &pattern, linenr, parent)?;
                }
                "endchoice" | "endmenu" | "endif" => {
                    toks.expect_end()?;
                    if end == Some(keyword.as_str()) {
                        return Ok(());
                    }
                    return Err(KconfigError::syntax(
                        &reader.filename,
                        linenr,
                        format!("unexpected '{keyword}'"),
                    ));
                }
                _ => {
                    return Err(KconfigError::syntax(
                        &reader.filename,
                        linenr,
                        format!("unknown statement '{keyword}'"),
                    ));
                }
            }
        }
    }

    fn parse_source(
        &mut self,
        reader: &FileReader,
        keyword: &str,
        pattern: &str,
        linenr: u32,
        parent: NodeId,
    ) -> Result<(), KconfigError> {
        let relative = keyword == "rsource" || keyword == "orsource";
        let optional = keyword.starts_with('o');

        let base = if relative {
            reader.path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            PathBuf::from(self.tree.srctree.clone().unwrap_or_default())
        };
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            base.join(pattern)
        };

        let full_pattern = full.to_string_lossy().into_owned();
        let entries = glob::glob(&full_pattern).map_err(|e| {
            KconfigError::syntax(&reader.filename, linenr, format!("invalid pattern '{pattern}': {e}"))
        })?;
        let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).filter(|p| p.is_file()).collect();
        paths.sort();

        if paths.is_empty() {
            if optional {
                debug!("{}:{}: optional source '{}' matched nothing", reader.filename, linenr, pattern);
                return Ok(());
            }
            return Err(KconfigError::SourceNotFound {
                filename: reader.filename.clone(),
                linenr,
                pattern: pattern.to_string(),
            });
        }

        for path in paths {
            let key = canonical(&path);
            if self.include_path.contains(&key) {
                return Err(KconfigError::RecursiveSource {
                    filename: reader.filename.clone(),
                    linenr,
                    path: path.to_string_lossy().into_owned(),
                });
            }
            let text = std::fs::read_to_string(&path).map_err(|e| KconfigError::io(&path, e))?;
            let filename = display_name(&path, self.tree.srctree.as_deref());
            debug!("entering {}", filename);

            self.include_path.push(key);
            let mut child = FileReader::new(filename, path, &text);
            let result = self.parse_block(&mut child, None, parent);
            self.include_path.pop();
            result?;
        }
        Ok(())
    }

    /// Parse the property lines following an entry, stopping at the first
    /// line that is not a property.
    fn parse_properties(&mut self, reader: &mut FileReader, node: NodeId) -> Result<(), KconfigError> {
        loop {
            let Some(line) = reader.next_line() else {
                return Ok(());
            };
            let Some(mut toks) = self.tokenize_line(reader, &line)? else {
                continue;
            };

            if toks.eat(&Token::HelpCompat) {
                toks.expect_end()?;
                self.parse_help(reader, node);
                continue;
            }
            let keyword = match toks.peek() {
                Some(Token::Word(w)) => w.clone(),
                _ => return Err(toks.error("expected a keyword")),
            };
            toks.pos += 1;

            if let Some(ty) = type_keyword(&keyword) {
                self.set_type(&toks, node, ty)?;
                if keyword.starts_with("def_") {
                    self.parse_default(&mut toks, node)?;
                } else if !toks.at_end() {
                    self.parse_prompt(&mut toks, node)?;
                }
                continue;
            }

            match keyword.as_str() {
                "prompt" => self.parse_prompt(&mut toks, node)?,
                "default" => self.parse_default(&mut toks, node)?,
                "depends" => {
                    toks.expect_keyword("on")?;
                    let expr = toks.parse_expr(&mut self.tree)?;
                    toks.expect_end()?;
                    let dep = std::mem::replace(&mut self.tree.node_mut(node).dep, Expr::y());
                    self.tree.node_mut(node).dep = Expr::and(dep, expr);
                }
                "select" | "imply" => {
                    if !matches!(self.tree.node(node).item, Item::Symbol(_)) {
                        return Err(toks.error(format!("'{keyword}' is only valid for symbols")));
                    }
                    let target = toks.parse_nonconst_sym(&mut self.tree)?;
                    let cond = toks.parse_cond(&mut self.tree)?;
                    let entry = (Expr::symbol(target), cond);
                    let node = self.tree.node_mut(node);
                    if keyword == "select" {
                        node.selects.push(entry);
                    } else {
                        node.implies.push(entry);
                    }
                }
                "range" => {
                    let low = toks.parse_sym(&mut self.tree)?;
                    let high = toks.parse_sym(&mut self.tree)?;
                    let cond = toks.parse_cond(&mut self.tree)?;
                    self.tree
                        .node_mut(node)
                        .ranges
                        .push((Expr::symbol(low), Expr::symbol(high), cond));
                }
                "visible" => {
                    toks.expect_keyword("if")?;
                    let expr = toks.parse_expr(&mut self.tree)?;
                    toks.expect_end()?;
                    let visibility = std::mem::replace(&mut self.tree.node_mut(node).visibility, Expr::y());
                    self.tree.node_mut(node).visibility = Expr::and(visibility, expr);
                }
                "optional" => {
                    toks.expect_end()?;
                    match self.tree.node(node).item {
                        Item::Choice(id) => self.tree.choice_mut(id).is_optional = true,
                        _ => return Err(toks.error("'optional' is only valid for choices")),
                    }
                }
                "modules" => {
                    toks.expect_end()?;
                    self.mark_modules(&toks, node)?;
                }
                "option" => {
                    if toks.eat_word("modules") {
                        self.mark_modules(&toks, node)?;
                    } else {
                        debug!("{}:{}: ignoring 'option' line", toks.filename, toks.linenr);
                    }
                }
                "transitional" => {}
                "help" => {
                    toks.expect_end()?;
                    self.parse_help(reader, node);
                }
                _ => {
                    reader.unread(line);
                    return Ok(());
                }
            }
        }
    }

    fn set_type(&mut self, toks: &Tokens, node: NodeId, ty: SymbolType) -> Result<(), KconfigError> {
        let (name, current) = match self.tree.node(node).item {
            Item::Symbol(id) => {
                let sym = self.tree.symbol_mut(id);
                let previous = sym.orig_type;
                sym.orig_type = ty;
                (sym.name.to_string(), previous)
            }
            Item::Choice(id) => {
                let choice = self.tree.choice_mut(id);
                let previous = choice.orig_type;
                choice.orig_type = ty;
                (choice.name.as_deref().unwrap_or("<choice>").to_string(), previous)
            }
            _ => return Err(toks.error("type given for a menu or comment")),
        };
        if current != SymbolType::Unknown && current != ty {
            warn!(
                "{}:{}: {} redefined from {} to {}",
                toks.filename,
                toks.linenr,
                name,
                current.as_str(),
                ty.as_str()
            );
        }
        Ok(())
    }

    fn mark_modules(&mut self, toks: &Tokens, node: NodeId) -> Result<(), KconfigError> {
        match self.tree.node(node).item {
            Item::Symbol(id) => {
                self.tree.symbol_mut(id).is_modules = true;
                Ok(())
            }
            _ => Err(toks.error("'modules' is only valid for symbols")),
        }
    }

    fn parse_prompt(&mut self, toks: &mut Tokens, node: NodeId) -> Result<(), KconfigError> {
        let raw = toks.expect_str()?;
        let cond = toks.parse_cond(&mut self.tree)?;
        let text = raw.trim();
        if text.len() != raw.len() {
            warn!("{}:{}: leading or trailing whitespace in prompt \"{}\"", toks.filename, toks.linenr, raw);
        }
        let node = self.tree.node_mut(node);
        if node.prompt.is_some() {
            warn!("{}:{}: multiple prompts on one menu node", toks.filename, toks.linenr);
        }
        node.prompt = Some(Prompt {
            text: text.to_string(),
            cond,
        });
        Ok(())
    }

    fn parse_default(&mut self, toks: &mut Tokens, node: NodeId) -> Result<(), KconfigError> {
        let value = toks.parse_expr(&mut self.tree)?;
        let cond = toks.parse_cond(&mut self.tree)?;
        self.tree.node_mut(node).defaults.push((value, cond));
        Ok(())
    }

    /// Help text runs from the first non-blank line until the first
    /// non-blank line indented less than it.
    fn parse_help(&mut self, reader: &mut FileReader, node: NodeId) {
        let first = loop {
            match reader.next_raw() {
                None => return,
                Some(raw) if raw.trim().is_empty() => continue,
                Some(raw) => break expand_tabs(&raw),
            }
        };
        let indent = indentation(&first);
        if indent == 0 {
            reader.unread_raw();
            return;
        }

        let mut lines = vec![first[indent..].to_string()];
        while let Some(raw) = reader.next_raw() {
            if raw.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            let expanded = expand_tabs(&raw);
            if indentation(&expanded) < indent {
                reader.unread_raw();
                break;
            }
            lines.push(expanded[indent..].to_string());
        }

        let help = lines.join("\n").trim_end().to_string();
        self.tree.node_mut(node).help = if help.is_empty() { None } else { Some(help) };
    }
}
