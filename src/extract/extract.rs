//! The extraction pass.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::format::ExprFormatter;
use super::record::{AltDefault, ExtractedRecord};
use crate::kconfig::{Connective, Expr, Kconfig, NodeId, ScRef};
use crate::project::ModulePaths;

/// Flatten the tree into database records.
///
/// Symbols come first in definition order, then choices. Nameless choices
/// are skipped, as are declarations without prompt and help. A symbol
/// declared twice at the same `file:line` yields one record.
pub fn extract(tree: &Kconfig, module_paths: &ModulePaths) -> Vec<ExtractedRecord> {
    let fmt = ExprFormatter::new(tree);
    let items = tree
        .unique_defined_syms()
        .iter()
        .map(|id| ScRef::Symbol(*id))
        .chain(tree.unique_choices().iter().map(|id| ScRef::Choice(*id)));

    let mut records = Vec::new();
    for sc in items {
        let name = match tree.name_of(sc) {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };
        extract_item(tree, &fmt, module_paths, sc, name, &mut records);
    }

    debug!("extracted {} records", records.len());
    records
}

fn extract_item(
    tree: &Kconfig,
    fmt: &ExprFormatter<'_>,
    module_paths: &ModulePaths,
    sc: ScRef,
    name: &str,
    records: &mut Vec<ExtractedRecord>,
) {
    let nodes = tree.nodes_of(sc);

    let alt_defaults: Vec<AltDefault> = nodes
        .iter()
        .map(|id| tree.node(*id))
        .filter(|node| node.filename.contains("defconfig"))
        .flat_map(|node| {
            node.defaults.iter().map(|(value, cond)| {
                AltDefault(fmt.conditional(fmt.expr(value), cond), node.filename.clone())
            })
        })
        .collect();

    let (selected_by, implied_by) = match sc {
        ScRef::Symbol(id) => {
            let sym = tree.symbol(id);
            (reverse_summary(tree, &sym.rev_dep), reverse_summary(tree, &sym.weak_rev_dep))
        }
        ScRef::Choice(_) => (Vec::new(), Vec::new()),
    };

    let choices: Vec<String> = match sc {
        ScRef::Choice(id) => tree
            .choice(id)
            .syms
            .iter()
            .map(|sym| fmt.sc(ScRef::Symbol(*sym)))
            .collect(),
        ScRef::Symbol(_) => Vec::new(),
    };

    let type_name = tree.type_of(sc).as_str();
    let mut seen = FxHashSet::default();

    for &id in nodes {
        let node = tree.node(id);
        if node.prompt.is_none() && node.help.is_none() {
            continue;
        }
        // Modules sometimes declare a symbol twice at one location
        if !seen.insert((node.filename.as_str(), node.linenr)) {
            continue;
        }

        let dependencies = if node.dep.is_y() {
            None
        } else {
            Some(fmt.expr(&node.dep))
        };

        let render = |list: &[(Expr, Expr)]| -> Vec<String> {
            list.iter()
                .map(|(value, cond)| fmt.conditional(fmt.expr(value), cond))
                .collect()
        };

        let ranges = node
            .ranges
            .iter()
            .map(|(low, high, cond)| {
                fmt.conditional(format!("[{}, {}]", fmt.expr(low), fmt.expr(high)), cond)
            })
            .collect();

        records.push(ExtractedRecord {
            name: format!("CONFIG_{name}"),
            prompt: node.prompt.as_ref().map(|p| p.text.clone()),
            type_name: type_name.to_string(),
            help: node.help.clone(),
            dependencies,
            defaults: render(&node.defaults),
            alt_defaults: alt_defaults.clone(),
            selects: render(&node.selects),
            selected_by: selected_by.clone(),
            implies: render(&node.implies),
            implied_by: implied_by.clone(),
            ranges,
            choices: choices.clone(),
            filename: module_paths.relativize(&node.filename),
            linenr: node.linenr,
            menupath: menupath(tree, id),
        });
    }
}

/// Names of the symbols in a reverse dependency.
///
/// The expression is an OR of `SELECTOR && ...` clauses; only the first
/// factor of each clause is kept.
fn reverse_summary(tree: &Kconfig, rev_dep: &Expr) -> Vec<String> {
    if rev_dep.is_n() {
        return Vec::new();
    }
    rev_dep
        .split(Connective::Or)
        .into_iter()
        .filter_map(|clause| match clause.split(Connective::And).first() {
            Some(Expr::Sym(sc)) => tree.name_of(*sc).map(|name| format!("CONFIG_{name}")),
            _ => None,
        })
        .collect()
}

/// `(Top)` followed by ` > title` for each ancestor below the top node.
fn menupath(tree: &Kconfig, id: NodeId) -> String {
    let top = tree.top_node();
    let mut titles = Vec::new();
    let mut current = tree.node(id).parent;
    while let Some(parent) = current {
        if parent == top {
            break;
        }
        let node = tree.node(parent);
        titles.push(match &node.prompt {
            Some(prompt) => prompt.text.clone(),
            None => tree.item_str(node.item),
        });
        current = node.parent;
    }

    let mut path = String::from("(Top)");
    for title in titles.iter().rev() {
        path.push_str(" > ");
        path.push_str(title);
    }
    path
}
