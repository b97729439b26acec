//! Kconfig preprocessor: variables and `$(...)` expansion.
//!
//! Variables come from assignments in Kconfig files (`NAME = value`,
//! `NAME := value`, `NAME += value`) and fall back to the environment.
//! Documentation builds have no devicetree, so the devicetree and shield
//! helpers (`$(dt_compat_enabled,...)` and friends) evaluate to placeholders
//! describing an absent node: `n`, `0`, `0x0` or the empty string.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::Environment;

#[derive(Debug, Clone)]
struct Variable {
    value: String,
    /// `=` variables are expanded on use, `:=` at definition.
    recursive: bool,
}

/// Source location for diagnostics emitted by built-in functions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Location<'a> {
    pub filename: &'a str,
    pub linenr: u32,
}

#[derive(Debug)]
pub(crate) enum ExpandError {
    Unterminated,
    TooDeep,
    UserError(String),
}

const MAX_DEPTH: usize = 64;

pub(crate) struct Preprocessor<'e> {
    env: &'e dyn Environment,
    variables: IndexMap<String, Variable>,
}

impl<'e> Preprocessor<'e> {
    pub fn new(env: &'e dyn Environment) -> Self {
        Self {
            env,
            variables: IndexMap::new(),
        }
    }

    /// Handle `NAME = value` style lines. Returns `Ok(false)` if the line is
    /// not an assignment.
    pub fn try_assignment(&mut self, line: &str, loc: Location<'_>) -> Result<bool, ExpandError> {
        let Some((name, op, value)) = split_assignment(line) else {
            return Ok(false);
        };
        let name = self.expand(name, loc)?;
        let value = value.trim_start();
        match op {
            "=" => {
                self.variables.insert(
                    name,
                    Variable {
                        value: value.to_string(),
                        recursive: true,
                    },
                );
            }
            ":=" => {
                let value = self.expand(value, loc)?;
                self.variables.insert(
                    name,
                    Variable {
                        value,
                        recursive: false,
                    },
                );
            }
            _ => {
                let appended = match self.variables.get(&name) {
                    Some(var) if !var.recursive => self.expand(value, loc)?,
                    _ => value.to_string(),
                };
                match self.variables.get_mut(&name) {
                    Some(var) => {
                        if !var.value.is_empty() {
                            var.value.push(' ');
                        }
                        var.value.push_str(&appended);
                    }
                    None => {
                        self.variables.insert(
                            name,
                            Variable {
                                value: appended,
                                recursive: true,
                            },
                        );
                    }
                }
            }
        }
        Ok(true)
    }

    /// Expand every `$(...)` reference in `text`.
    pub fn expand(&self, text: &str, loc: Location<'_>) -> Result<String, ExpandError> {
        self.expand_depth(text, loc, 0)
    }

    fn expand_depth(&self, text: &str, loc: Location<'_>, depth: usize) -> Result<String, ExpandError> {
        if depth > MAX_DEPTH {
            return Err(ExpandError::TooDeep);
        }
        if !text.contains("$(") {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("$(") {
            out.push_str(&rest[..start]);
            let body_start = start + 2;
            let end = matching_paren(&rest[body_start..]).ok_or(ExpandError::Unterminated)?;
            let body = &rest[body_start..body_start + end];
            out.push_str(&self.call(body, loc, depth)?);
            rest = &rest[body_start + end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn call(&self, body: &str, loc: Location<'_>, depth: usize) -> Result<String, ExpandError> {
        let mut args = Vec::new();
        for part in split_args(body) {
            args.push(self.expand_depth(part, loc, depth + 1)?);
        }
        let name = args.first().map(|s| s.trim().to_string()).unwrap_or_default();

        if args.len() == 1 {
            if let Some(var) = self.variables.get(&name) {
                return if var.recursive {
                    self.expand_depth(&var.value, loc, depth + 1)
                } else {
                    Ok(var.value.clone())
                };
            }
        }

        match name.as_str() {
            "info" => {
                info!("{}:{}: {}", loc.filename, loc.linenr, args[1..].join(","));
                Ok(String::new())
            }
            "warning" => {
                warn!("{}:{}: {}", loc.filename, loc.linenr, args[1..].join(","));
                Ok(String::new())
            }
            "warning-if" => {
                if args.get(1).map(String::as_str) == Some("y") {
                    warn!("{}:{}: {}", loc.filename, loc.linenr, args[2..].join(","));
                }
                Ok(String::new())
            }
            "error-if" => {
                if args.get(1).map(String::as_str) == Some("y") {
                    Err(ExpandError::UserError(args[2..].join(",")))
                } else {
                    Ok(String::new())
                }
            }
            "filename" => Ok(loc.filename.to_string()),
            "lineno" => Ok(loc.linenr.to_string()),
            _ if args.len() == 1 => Ok(self.env.var(&name).unwrap_or_default()),
            _ => {
                let value = doc_mode_value(&name);
                debug!(
                    "{}:{}: '{}' evaluates to \"{}\" in documentation mode",
                    loc.filename, loc.linenr, name, value
                );
                Ok(value.to_string())
            }
        }
    }
}

/// Suffixes of helpers answering a yes/no question about the devicetree.
const BOOL_SUFFIXES: &[&str] = &[
    "_enabled",
    "_contains",
    "_bool_prop",
    "_has_prop",
    "_has_compat",
    "_with_compat",
    "_on_bus",
    "_equals",
];

/// Placeholder result of a helper function, chosen from its name.
fn doc_mode_value(function: &str) -> &'static str {
    if function.ends_with("_int") {
        "0"
    } else if function.ends_with("_hex") {
        "0x0"
    } else if BOOL_SUFFIXES.iter().any(|suffix| function.ends_with(suffix)) {
        "n"
    } else {
        ""
    }
}

/// Byte offset of the `)` closing a `$(` whose body starts at `text[0]`.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split a call body at top-level commas.
fn split_args(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Recognize `NAME op value` where op is `=`, `:=` or `+=`.
fn split_assignment(line: &str) -> Option<(&str, &'static str, &str)> {
    let trimmed = line.trim_start();
    let name_len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$' | '(' | ')')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    if name_len == 0 {
        return None;
    }
    let name = &trimmed[..name_len];
    let after = trimmed[name_len..].trim_start();
    for op in [":=", "+=", "="] {
        if let Some(value) = after.strip_prefix(op) {
            // `depends on A = B` style lines never start with a bare name
            if op == "=" && after.starts_with("==") {
                return None;
            }
            return Some((name, op, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    const LOC: Location<'static> = Location {
        filename: "Kconfig",
        linenr: 1,
    };

    fn env() -> HashMap<String, String> {
        HashMap::from([("BOARD_DIR".to_string(), "boards/*/*".to_string())])
    }

    #[test]
    fn test_expand_environment_variable() {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert_eq!(
            pp.expand("source \"$(BOARD_DIR)/Kconfig\"", LOC).unwrap(),
            "source \"boards/*/*/Kconfig\""
        );
    }

    #[test]
    fn test_undefined_variable_is_empty() {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert_eq!(pp.expand("a$(NOPE)b", LOC).unwrap(), "ab");
    }

    #[test]
    fn test_assignments() {
        let env = env();
        let mut pp = Preprocessor::new(&env);
        assert!(pp.try_assignment("DT_COMPAT := vnd,uart", LOC).unwrap());
        assert!(pp.try_assignment("LAZY = $(DT_COMPAT)-x", LOC).unwrap());
        assert!(pp.try_assignment("LAZY += y", LOC).unwrap());
        assert!(!pp.try_assignment("config FOO", LOC).unwrap());
        assert!(!pp.try_assignment("default A = B", LOC).unwrap());
        assert_eq!(pp.expand("$(DT_COMPAT)", LOC).unwrap(), "vnd,uart");
        assert_eq!(pp.expand("$(LAZY)", LOC).unwrap(), "vnd,uart-x y");
    }

    #[rstest]
    #[case("def_bool $(dt_compat_enabled,$(X))", "def_bool n")]
    #[case("default $(dt_nodelabel_enabled_with_compat,uart0,vnd,uart)", "default n")]
    #[case("default $(shields_list_contains,x_nucleo)", "default n")]
    #[case("default $(dt_chosen_reg_size_int,zephyr,flash,0,K)", "default 0")]
    #[case("default $(dt_node_reg_addr_hex,/soc/flash,0)", "default 0x0")]
    #[case("default \"$(dt_chosen_path,zephyr,console)\"", "default \"\"")]
    fn test_helpers_evaluate_to_doc_mode_placeholders(#[case] line: &str, #[case] expected: &str) {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert_eq!(pp.expand(line, LOC).unwrap(), expected);
    }

    #[test]
    fn test_location_builtins() {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert_eq!(pp.expand("$(filename):$(lineno)", LOC).unwrap(), "Kconfig:1");
    }

    #[test]
    fn test_error_if() {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert!(pp.expand("$(error-if,n,boom)", LOC).is_ok());
        assert!(matches!(
            pp.expand("$(error-if,y,boom)", LOC),
            Err(ExpandError::UserError(msg)) if msg == "boom"
        ));
    }

    #[test]
    fn test_unterminated_call() {
        let env = env();
        let pp = Preprocessor::new(&env);
        assert!(matches!(pp.expand("$(FOO", LOC), Err(ExpandError::Unterminated)));
    }
}
