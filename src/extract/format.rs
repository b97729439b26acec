//! HTML rendering of symbol references and expressions.

use crate::kconfig::{Expr, Kconfig, ScRef, expr_str};

/// Renders expressions of one tree with cross-reference links.
#[derive(Clone, Copy)]
pub struct ExprFormatter<'a> {
    tree: &'a Kconfig,
}

impl<'a> ExprFormatter<'a> {
    pub fn new(tree: &'a Kconfig) -> Self {
        Self { tree }
    }

    /// Render a single symbol or choice reference.
    ///
    /// Declared symbols link to their anchor, named choices wrap the link
    /// in `&lt;choice ...&gt;`. Anything else (constants, numbers,
    /// undeclared names) uses the plain rendering.
    pub fn sc(&self, sc: ScRef) -> String {
        match sc {
            ScRef::Symbol(id) => {
                let sym = self.tree.symbol(id);
                if sym.nodes.is_empty() {
                    self.tree.standard_sc_expr_str(sc)
                } else {
                    anchor(&sym.name)
                }
            }
            ScRef::Choice(id) => match &self.tree.choice(id).name {
                Some(name) => format!("&lt;choice {}&gt;", anchor(name)),
                None => "&lt;choice&gt;".to_string(),
            },
        }
    }

    pub fn expr(&self, expr: &Expr) -> String {
        expr_str(expr, &|sc| self.sc(sc))
    }

    /// `value`, followed by ` if <cond>` unless `cond` is `y`.
    pub fn conditional(&self, value: String, cond: &Expr) -> String {
        if cond.is_y() {
            value
        } else {
            format!("{value} if {}", self.expr(cond))
        }
    }
}

fn anchor(name: &str) -> String {
    format!("<a href=\"#CONFIG_{name}\">CONFIG_{name}</a>")
}
