//! Post-parse finalization of the menu tree.
//!
//! - dependencies of menus, `if` blocks and choices are ANDed into the nodes
//!   they enclose (choice members depend on the choice itself);
//! - a symbol followed by nodes that depend on it becomes their parent
//!   (implicit submenu);
//! - children of prompt-less non-choice nodes are moved up a level and `if`
//!   nodes are dropped;
//! - choices collect their member symbols and types;
//! - reverse dependencies are built from `select`/`imply`, node by node in
//!   tree order.

use std::collections::VecDeque;

use super::expr::{Expr, ScRef};
use super::tree::{ChoiceId, Item, Kconfig, NodeId, SymbolId, SymbolType};

pub(crate) fn finalize(tree: &mut Kconfig) {
    let top = tree.top_node();
    let mut cursor = 0;
    finalize_node(tree, top, &[], &mut cursor, &Expr::y());
}

fn finalize_node(
    tree: &mut Kconfig,
    id: NodeId,
    siblings: &[NodeId],
    cursor: &mut usize,
    visible_if: &Expr,
) {
    let item = tree.node(id).item;
    if let Item::Symbol(sym) = item {
        add_reverse_deps(tree, id, sym);
    }
    let children = std::mem::take(&mut tree.node_mut(id).children);

    if !children.is_empty() {
        let visible_if = if item == Item::Menu {
            Expr::and(visible_if.clone(), tree.node(id).visibility.clone())
        } else {
            visible_if.clone()
        };
        propagate_deps(tree, id, &children, &visible_if);

        let mut i = 0;
        while i < children.len() {
            let child = children[i];
            i += 1;
            finalize_node(tree, child, &children, &mut i, &visible_if);
        }

        // Nodes swallowed by an implicit submenu changed parent
        let remaining: Vec<NodeId> = children
            .into_iter()
            .filter(|child| tree.node(*child).parent == Some(id))
            .collect();
        tree.node_mut(id).children = remaining;
    } else if let Item::Symbol(_) = item {
        let mut captured = Vec::new();
        while *cursor < siblings.len() && auto_menu_dep(tree, id, siblings[*cursor]) {
            let next = siblings[*cursor];
            *cursor += 1;
            finalize_node(tree, next, siblings, cursor, visible_if);
            tree.node_mut(next).parent = Some(id);
            captured.push(next);
        }
        tree.node_mut(id).children = captured;
    }

    if !tree.node(id).children.is_empty() {
        flatten(tree, id);
        remove_ifs(tree, id);
    }

    if let Item::Choice(choice) = item {
        finalize_choice(tree, id, choice);
    }
}

fn propagate_deps(tree: &mut Kconfig, parent: NodeId, children: &[NodeId], visible_if: &Expr) {
    let basedep = match tree.node(parent).item {
        Item::Choice(choice) => Expr::Sym(ScRef::Choice(choice)),
        _ => tree.node(parent).dep.clone(),
    };

    for &child in children {
        let node = tree.node_mut(child);
        let own = std::mem::replace(&mut node.dep, Expr::y());
        node.dep = Expr::and(own, basedep.clone());

        if matches!(node.item, Item::Symbol(_) | Item::Choice(_)) {
            let dep = node.dep.clone();
            if let Some(prompt) = node.prompt.as_mut() {
                let cond = std::mem::replace(&mut prompt.cond, Expr::y());
                prompt.cond = Expr::and(cond, Expr::and(visible_if.clone(), dep));
            }
        }
    }
}

/// Does `next` depend on the symbol of `node`? Looks at the prompt
/// condition when there is a prompt, otherwise at the dependencies.
fn auto_menu_dep(tree: &Kconfig, node: NodeId, next: NodeId) -> bool {
    let Some(sc) = tree.node(node).item.sc() else {
        return false;
    };
    let next = tree.node(next);
    match &next.prompt {
        Some(prompt) => prompt.cond.depends_on(sc),
        None => next.dep.depends_on(sc),
    }
}

fn flatten(tree: &mut Kconfig, id: NodeId) {
    let mut queue: VecDeque<NodeId> = std::mem::take(&mut tree.node_mut(id).children).into();
    let mut flat = Vec::with_capacity(queue.len());

    while let Some(child) = queue.pop_front() {
        flat.push(child);
        let node = tree.node(child);
        let hoist = !node.children.is_empty()
            && node.prompt.is_none()
            && !matches!(node.item, Item::Choice(_));
        if hoist {
            let grandchildren = std::mem::take(&mut tree.node_mut(child).children);
            for &grandchild in grandchildren.iter().rev() {
                tree.node_mut(grandchild).parent = Some(id);
                queue.push_front(grandchild);
            }
        }
    }

    tree.node_mut(id).children = flat;
}

fn remove_ifs(tree: &mut Kconfig, id: NodeId) {
    let mut children = std::mem::take(&mut tree.node_mut(id).children);
    children.retain(|child| tree.node(*child).item != Item::If);
    tree.node_mut(id).children = children;
}

fn finalize_choice(tree: &mut Kconfig, id: NodeId, choice: ChoiceId) {
    let members: Vec<SymbolId> = tree
        .node(id)
        .children
        .iter()
        .filter_map(|child| match tree.node(*child).item {
            Item::Symbol(sym) => Some(sym),
            _ => None,
        })
        .collect();

    for sym in members {
        tree.symbol_mut(sym).choice = Some(choice);
        let syms = &mut tree.choice_mut(choice).syms;
        if !syms.contains(&sym) {
            syms.push(sym);
        }
    }

    if tree.choice(choice).orig_type == SymbolType::Unknown {
        let inherited = tree
            .choice(choice)
            .syms
            .iter()
            .map(|sym| tree.symbol(*sym).orig_type)
            .find(|ty| *ty != SymbolType::Unknown);
        if let Some(ty) = inherited {
            tree.choice_mut(choice).orig_type = ty;
        }
    }

    let choice_type = tree.choice(choice).orig_type;
    for sym in tree.choice(choice).syms.clone() {
        let sym = tree.symbol_mut(sym);
        if sym.orig_type == SymbolType::Unknown {
            sym.orig_type = choice_type;
        }
    }
}

/// OR `SYMBOL && (condition && dependencies)` for each `select` and `imply`
/// of one symbol node into the reverse dependencies of its targets. Nodes
/// are visited in tree order, so clauses follow declaration order.
fn add_reverse_deps(tree: &mut Kconfig, id: NodeId, sym: SymbolId) {
    let node = tree.node(id);
    let clauses = |props: &[(Expr, Expr)]| -> Vec<(SymbolId, Expr)> {
        props
            .iter()
            .filter_map(|(target, cond)| match target {
                Expr::Sym(ScRef::Symbol(target)) => Some((
                    *target,
                    Expr::and(Expr::symbol(sym), Expr::and(cond.clone(), node.dep.clone())),
                )),
                _ => None,
            })
            .collect()
    };
    let selects = clauses(&node.selects);
    let implies = clauses(&node.implies);

    for (target, clause) in selects {
        let target = tree.symbol_mut(target);
        let rev_dep = std::mem::replace(&mut target.rev_dep, Expr::n());
        target.rev_dep = Expr::or(rev_dep, clause);
    }
    for (target, clause) in implies {
        let target = tree.symbol_mut(target);
        let weak = std::mem::replace(&mut target.weak_rev_dep, Expr::n());
        target.weak_rev_dep = Expr::or(weak, clause);
    }
}
