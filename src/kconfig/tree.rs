//! Arena representation of a parsed Kconfig tree.
//!
//! Menu nodes, symbols and choices live in flat vectors addressed by
//! copyable ids. Parent links are plain ids, so the tree carries no
//! ownership cycles.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::expr::{Expr, ScRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub const N: SymbolId = SymbolId(0);
    pub const M: SymbolId = SymbolId(1);
    pub const Y: SymbolId = SymbolId(2);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChoiceId(pub(crate) u32);

impl ChoiceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Value type of a symbol or choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolType {
    #[default]
    Unknown,
    Bool,
    Tristate,
    String,
    Int,
    Hex,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Bool => "bool",
            Self::Tristate => "tristate",
            Self::String => "string",
            Self::Int => "int",
            Self::Hex => "hex",
        }
    }
}

/// What a menu node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Symbol(SymbolId),
    Choice(ChoiceId),
    Menu,
    Comment,
    /// An `if` block. Only present while parsing; finalization removes them.
    If,
}

impl Item {
    pub fn sc(&self) -> Option<ScRef> {
        match self {
            Item::Symbol(id) => Some(ScRef::Symbol(*id)),
            Item::Choice(id) => Some(ScRef::Choice(*id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: SmolStr,
    pub orig_type: SymbolType,
    /// Quoted strings and `n`/`m`/`y`.
    pub is_constant: bool,
    pub nodes: Vec<NodeId>,
    pub choice: Option<ChoiceId>,
    /// OR of `SELECTOR && condition` over every `select` targeting this symbol.
    pub rev_dep: Expr,
    /// Same as `rev_dep`, for `imply`.
    pub weak_rev_dep: Expr,
    /// Declared with the `modules` attribute.
    pub is_modules: bool,
}

impl Symbol {
    pub(crate) fn new(name: SmolStr, is_constant: bool) -> Self {
        Self {
            name,
            orig_type: SymbolType::Unknown,
            is_constant,
            nodes: Vec::new(),
            choice: None,
            rev_dep: Expr::n(),
            weak_rev_dep: Expr::n(),
            is_modules: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub name: Option<SmolStr>,
    pub orig_type: SymbolType,
    pub nodes: Vec<NodeId>,
    /// Member symbols in declaration order.
    pub syms: Vec<SymbolId>,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub cond: Expr,
}

/// One textual occurrence of a symbol, choice, menu or comment.
///
/// `defaults`, `selects`, `implies` and `ranges` hold the properties as
/// written, without inherited dependencies. `dep` includes the
/// dependencies of enclosing menus, `if` blocks and choices.
#[derive(Debug, Clone)]
pub struct MenuNode {
    pub item: Item,
    pub filename: String,
    pub linenr: u32,
    pub prompt: Option<Prompt>,
    pub help: Option<String>,
    pub dep: Expr,
    pub visibility: Expr,
    pub defaults: Vec<(Expr, Expr)>,
    pub selects: Vec<(Expr, Expr)>,
    pub implies: Vec<(Expr, Expr)>,
    pub ranges: Vec<(Expr, Expr, Expr)>,
    pub is_menuconfig: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl MenuNode {
    pub(crate) fn new(item: Item, filename: impl Into<String>, linenr: u32) -> Self {
        Self {
            item,
            filename: filename.into(),
            linenr,
            prompt: None,
            help: None,
            dep: Expr::y(),
            visibility: Expr::y(),
            defaults: Vec::new(),
            selects: Vec::new(),
            implies: Vec::new(),
            ranges: Vec::new(),
            is_menuconfig: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A fully parsed and finalized Kconfig tree.
#[derive(Debug, Clone)]
pub struct Kconfig {
    pub(crate) nodes: Vec<MenuNode>,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) choices: Vec<Choice>,
    pub(crate) syms_by_name: FxHashMap<SmolStr, SymbolId>,
    pub(crate) const_syms: FxHashMap<SmolStr, SymbolId>,
    pub(crate) named_choices: FxHashMap<SmolStr, ChoiceId>,
    pub(crate) unique_defined_syms: Vec<SymbolId>,
    pub(crate) unique_choices: Vec<ChoiceId>,
    pub(crate) top: NodeId,
    pub(crate) srctree: Option<String>,
}

impl Kconfig {
    /// An empty tree containing only the constant symbols and the top node.
    pub(crate) fn empty(top_filename: &str, srctree: Option<String>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            symbols: Vec::new(),
            choices: Vec::new(),
            syms_by_name: FxHashMap::default(),
            const_syms: FxHashMap::default(),
            named_choices: FxHashMap::default(),
            unique_defined_syms: Vec::new(),
            unique_choices: Vec::new(),
            top: NodeId(0),
            srctree,
        };
        for name in ["n", "m", "y"] {
            tree.const_sym(name);
        }

        let mut top = MenuNode::new(Item::Menu, top_filename, 1);
        top.prompt = Some(Prompt {
            text: "Main menu".to_string(),
            cond: Expr::y(),
        });
        tree.top = tree.push_node(top);
        tree
    }

    pub fn top_node(&self) -> NodeId {
        self.top
    }

    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn choice(&self, id: ChoiceId) -> &Choice {
        &self.choices[id.index()]
    }

    /// Defined symbols in order of first definition, each once.
    pub fn unique_defined_syms(&self) -> &[SymbolId] {
        &self.unique_defined_syms
    }

    /// Choices in order of first definition, each once.
    pub fn unique_choices(&self) -> &[ChoiceId] {
        &self.unique_choices
    }

    /// Look up a non-constant symbol by name.
    pub fn lookup_symbol(&self, name: &str) -> Option<SymbolId> {
        self.syms_by_name.get(name).copied()
    }

    pub fn srctree(&self) -> Option<&str> {
        self.srctree.as_deref()
    }

    pub fn name_of(&self, sc: ScRef) -> Option<&str> {
        match sc {
            ScRef::Symbol(id) => Some(self.symbol(id).name.as_str()),
            ScRef::Choice(id) => self.choice(id).name.as_deref(),
        }
    }

    pub fn nodes_of(&self, sc: ScRef) -> &[NodeId] {
        match sc {
            ScRef::Symbol(id) => &self.symbol(id).nodes,
            ScRef::Choice(id) => &self.choice(id).nodes,
        }
    }

    fn modules_enabled(&self) -> bool {
        self.symbols.iter().any(|sym| sym.is_modules)
    }

    /// The type as presented to users: `tristate` degrades to `bool` when
    /// the tree declares no modules symbol.
    pub fn type_of(&self, sc: ScRef) -> SymbolType {
        let orig = match sc {
            ScRef::Symbol(id) => self.symbol(id).orig_type,
            ScRef::Choice(id) => self.choice(id).orig_type,
        };
        if orig == SymbolType::Tristate && !self.modules_enabled() {
            SymbolType::Bool
        } else {
            orig
        }
    }

    /// Plain textual rendering of a symbol or choice reference.
    ///
    /// Constant strings are quoted (except `n`/`m`/`y`), other symbols render
    /// as their name, choices as `<choice NAME>` or `<choice>`.
    pub fn standard_sc_expr_str(&self, sc: ScRef) -> String {
        match sc {
            ScRef::Symbol(id) => {
                let sym = self.symbol(id);
                if sym.is_constant && !matches!(sym.name.as_str(), "n" | "m" | "y") {
                    format!("\"{}\"", escape(&sym.name))
                } else {
                    sym.name.to_string()
                }
            }
            ScRef::Choice(id) => match &self.choice(id).name {
                Some(name) => format!("<choice {name}>"),
                None => "<choice>".to_string(),
            },
        }
    }

    /// Rendering of a node's item for places where it has no prompt.
    pub fn item_str(&self, item: Item) -> String {
        match item {
            Item::Symbol(id) => self.standard_sc_expr_str(ScRef::Symbol(id)),
            Item::Choice(id) => self.standard_sc_expr_str(ScRef::Choice(id)),
            Item::Menu => "menu".to_string(),
            Item::Comment => "comment".to_string(),
            Item::If => "if".to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Construction helpers used by the parser and the finalizer
    // ------------------------------------------------------------------

    pub(crate) fn push_node(&mut self, node: MenuNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut MenuNode {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub(crate) fn choice_mut(&mut self, id: ChoiceId) -> &mut Choice {
        &mut self.choices[id.index()]
    }

    /// Look up or create a non-constant symbol.
    pub(crate) fn sym(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.syms_by_name.get(name) {
            return *id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        let name = SmolStr::new(name);
        self.symbols.push(Symbol::new(name.clone(), false));
        self.syms_by_name.insert(name, id);
        id
    }

    /// Look up or create a constant symbol.
    pub(crate) fn const_sym(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.const_syms.get(name) {
            return *id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        let name = SmolStr::new(name);
        self.symbols.push(Symbol::new(name.clone(), true));
        self.const_syms.insert(name, id);
        id
    }

    /// Look up a named choice, or create a new one (anonymous choices are
    /// always new).
    pub(crate) fn choice_for(&mut self, name: Option<&str>) -> ChoiceId {
        if let Some(name) = name {
            if let Some(id) = self.named_choices.get(name) {
                return *id;
            }
        }
        let id = ChoiceId(self.choices.len() as u32);
        self.choices.push(Choice {
            name: name.map(SmolStr::new),
            orig_type: SymbolType::Unknown,
            nodes: Vec::new(),
            syms: Vec::new(),
            is_optional: false,
        });
        if let Some(name) = name {
            self.named_choices.insert(SmolStr::new(name), id);
        }
        id
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
