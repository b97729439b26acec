//! Kconfig boolean expressions.
//!
//! Expressions are trees over symbol/choice references. The constant
//! symbols `n`, `m` and `y` have fixed ids so the unconditional sentinels can
//! be recognized without consulting the tree.

use super::tree::{ChoiceId, SymbolId};

/// A reference to a symbol or a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScRef {
    Symbol(SymbolId),
    Choice(ChoiceId),
}

/// Relational operators usable between two symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Equal,
    Unequal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl RelOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Unequal => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        }
    }
}

/// Binary connectives, used to split expressions into clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Sym(ScRef),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Rel(RelOp, ScRef, ScRef),
}

impl Expr {
    pub fn y() -> Self {
        Expr::Sym(ScRef::Symbol(SymbolId::Y))
    }

    pub fn n() -> Self {
        Expr::Sym(ScRef::Symbol(SymbolId::N))
    }

    pub fn symbol(id: SymbolId) -> Self {
        Expr::Sym(ScRef::Symbol(id))
    }

    /// True for the unconditional-true sentinel.
    pub fn is_y(&self) -> bool {
        matches!(self, Expr::Sym(ScRef::Symbol(id)) if *id == SymbolId::Y)
    }

    /// True for the unconditional-false sentinel.
    pub fn is_n(&self) -> bool {
        matches!(self, Expr::Sym(ScRef::Symbol(id)) if *id == SymbolId::N)
    }

    /// AND two expressions, folding away the constants.
    pub fn and(lhs: Expr, rhs: Expr) -> Expr {
        if lhs.is_y() {
            return rhs;
        }
        if rhs.is_y() {
            return lhs;
        }
        if lhs.is_n() || rhs.is_n() {
            return Expr::n();
        }
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    /// OR two expressions, folding away the constants.
    pub fn or(lhs: Expr, rhs: Expr) -> Expr {
        if lhs.is_n() {
            return rhs;
        }
        if rhs.is_n() {
            return lhs;
        }
        if lhs.is_y() || rhs.is_y() {
            return Expr::y();
        }
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Flatten nested applications of `op` into their operands, left to right.
    ///
    /// `A && (B && C)` split by AND gives `[A, B, C]`; any other node is a
    /// single operand.
    pub fn split(&self, op: Connective) -> Vec<&Expr> {
        let mut operands = Vec::new();
        self.split_into(op, &mut operands);
        operands
    }

    fn split_into<'a>(&'a self, op: Connective, out: &mut Vec<&'a Expr>) {
        match (self, op) {
            (Expr::And(lhs, rhs), Connective::And) | (Expr::Or(lhs, rhs), Connective::Or) => {
                lhs.split_into(op, out);
                rhs.split_into(op, out);
            }
            _ => out.push(self),
        }
    }

    /// True if the expression is `sc`, or an AND with an operand that
    /// depends on `sc`. Used for implicit submenu detection.
    pub fn depends_on(&self, sc: ScRef) -> bool {
        match self {
            Expr::Sym(s) => *s == sc,
            Expr::And(lhs, rhs) => lhs.depends_on(sc) || rhs.depends_on(sc),
            Expr::Rel(RelOp::Unequal, lhs, rhs) => {
                (*lhs == sc && *rhs == ScRef::Symbol(SymbolId::N))
                    || (*rhs == sc && *lhs == ScRef::Symbol(SymbolId::N))
            }
            Expr::Rel(RelOp::Equal, lhs, rhs) => {
                let truthy =
                    |r: &ScRef| matches!(r, ScRef::Symbol(id) if *id == SymbolId::Y || *id == SymbolId::M);
                (*lhs == sc && truthy(rhs)) || (*rhs == sc && truthy(lhs))
            }
            _ => false,
        }
    }
}

/// Render an expression, formatting every symbol/choice through `sc_fmt`.
///
/// AND inside OR (and OR inside AND) is parenthesized, so `A && B || C`
/// renders as `(A && B) || C`.
pub fn expr_str<F>(expr: &Expr, sc_fmt: &F) -> String
where
    F: Fn(ScRef) -> String,
{
    match expr {
        Expr::Sym(sc) => sc_fmt(*sc),
        Expr::And(lhs, rhs) => format!(
            "{} && {}",
            parenthesize(lhs, Connective::Or, sc_fmt),
            parenthesize(rhs, Connective::Or, sc_fmt)
        ),
        Expr::Or(lhs, rhs) => format!(
            "{} || {}",
            parenthesize(lhs, Connective::And, sc_fmt),
            parenthesize(rhs, Connective::And, sc_fmt)
        ),
        Expr::Not(inner) => match inner.as_ref() {
            Expr::Sym(sc) => format!("!{}", sc_fmt(*sc)),
            other => format!("!({})", expr_str(other, sc_fmt)),
        },
        Expr::Rel(op, lhs, rhs) => format!("{} {} {}", sc_fmt(*lhs), op.as_str(), sc_fmt(*rhs)),
    }
}

fn parenthesize<F>(expr: &Expr, op: Connective, sc_fmt: &F) -> String
where
    F: Fn(ScRef) -> String,
{
    let matches = matches!(
        (expr, op),
        (Expr::And(..), Connective::And) | (Expr::Or(..), Connective::Or)
    );
    if matches {
        format!("({})", expr_str(expr, sc_fmt))
    } else {
        expr_str(expr, sc_fmt)
    }
}
