//! Usage strings.
//!
//! Two renderings are offered. [`all_usage`](CommandDispatcher::all_usage)
//! lists every executable path below a node, one line each.
//! [`smart_usage`](CommandDispatcher::smart_usage) collapses each child of a
//! node into a single line, wrapping alternatives in groups: optional groups
//! when the parent is itself executable, required ones otherwise.

use indexmap::{IndexMap, IndexSet};

use super::CommandDispatcher;
use crate::tree::NodeId;

impl<S> CommandDispatcher<S> {
    /// Every executable path below `node`, in tree order.
    ///
    /// With `restricted`, branches `source` cannot use are left out.
    pub fn all_usage(&self, node: NodeId, source: &S, restricted: bool) -> Vec<String> {
        let mut result = Vec::new();
        self.collect_usage(node, source, restricted, "", &mut result);
        result
    }

    fn collect_usage(
        &self,
        id: NodeId,
        source: &S,
        restricted: bool,
        prefix: &str,
        result: &mut Vec<String>,
    ) {
        let node = self.tree.node(id);
        if restricted && !node.can_use(source) {
            return;
        }
        if node.command().is_some() {
            result.push(prefix.to_string());
        }
        if let Some(target) = node.redirect() {
            let redirect = self.redirect_usage(target);
            if prefix.is_empty() {
                result.push(format!("{} {redirect}", node.usage_text()));
            } else {
                result.push(format!("{prefix} {redirect}"));
            }
            return;
        }
        for child in node.children() {
            let text = self.tree.node(child).usage_text();
            let next = if prefix.is_empty() {
                text
            } else {
                format!("{prefix} {text}")
            };
            self.collect_usage(child, source, restricted, &next, result);
        }
    }

    /// One collapsed usage line per child of `node` that `source` can use.
    pub fn smart_usage(&self, node: NodeId, source: &S) -> IndexMap<NodeId, String> {
        let optional = self.tree.node(node).command().is_some();
        self.tree
            .children(node)
            .filter_map(|child| {
                self.smart(child, source, optional, false)
                    .map(|usage| (child, usage))
            })
            .collect()
    }

    fn smart(&self, id: NodeId, source: &S, optional: bool, deep: bool) -> Option<String> {
        let syntax = &self.config.usage;
        let node = self.tree.node(id);
        if !node.can_use(source) {
            return None;
        }

        let this = if optional {
            format!(
                "{}{}{}",
                syntax.optional_open,
                node.usage_text(),
                syntax.optional_close
            )
        } else {
            node.usage_text()
        };
        if deep {
            return Some(this);
        }
        if let Some(target) = node.redirect() {
            return Some(format!("{this} {}", self.redirect_usage(target)));
        }

        let child_optional = node.command().is_some();
        let (open, close) = if child_optional {
            (&syntax.optional_open, &syntax.optional_close)
        } else {
            (&syntax.required_open, &syntax.required_close)
        };
        let children: Vec<NodeId> = node
            .children()
            .filter(|&child| self.tree.node(child).can_use(source))
            .collect();

        match children.as_slice() {
            [] => Some(this),
            [only] => match self.smart(*only, source, child_optional, child_optional) {
                Some(usage) => Some(format!("{this} {usage}")),
                None => Some(this),
            },
            many => {
                let distinct: IndexSet<String> = many
                    .iter()
                    .filter_map(|&child| self.smart(child, source, child_optional, true))
                    .collect();
                if distinct.len() == 1 {
                    // Already wrapped by the deep call when optional.
                    let usage = distinct.first().map_or("", String::as_str);
                    return Some(format!("{this} {usage}"));
                }
                let alternatives: Vec<String> = many
                    .iter()
                    .map(|&child| self.tree.node(child).usage_text())
                    .collect();
                Some(format!(
                    "{this} {open}{}{close}",
                    alternatives.join(&syntax.or)
                ))
            }
        }
    }

    fn redirect_usage(&self, target: NodeId) -> String {
        let syntax = &self.config.usage;
        if target == self.root() {
            syntax.root_redirect.clone()
        } else {
            format!(
                "{} {}",
                syntax.redirect_arrow,
                self.tree.node(target).usage_text()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::literal;
    use crate::config::{DispatcherConfig, UsageSyntax};

    fn config_with_or(or: &str) -> DispatcherConfig {
        let mut usage = UsageSyntax::default();
        usage.or = or.to_string();
        usage.required_open = "<<".to_string();
        usage.required_close = ">>".to_string();
        DispatcherConfig::default().with_usage(usage)
    }

    #[test]
    fn empty_tree_has_no_usage() {
        let dispatcher = CommandDispatcher::<()>::new();
        assert!(dispatcher.all_usage(dispatcher.root(), &(), true).is_empty());
        assert!(dispatcher.smart_usage(dispatcher.root(), &()).is_empty());
    }

    #[test]
    fn unrestricted_usage_includes_hidden_commands() {
        let mut dispatcher = CommandDispatcher::<()>::new();
        dispatcher
            .register(literal("hidden").requires(|_| false).executes(|_| Ok(1)))
            .unwrap();
        let root = dispatcher.root();
        assert!(dispatcher.all_usage(root, &(), true).is_empty());
        assert_eq!(dispatcher.all_usage(root, &(), false), ["hidden"]);
    }

    #[test]
    fn custom_syntax_is_used_for_groups() {
        let mut dispatcher = CommandDispatcher::<()>::with_config(config_with_or(" / "));
        dispatcher
            .register(
                literal("pick")
                    .then(literal("left").executes(|_| Ok(1)))
                    .then(literal("right").executes(|_| Ok(2))),
            )
            .unwrap();
        let usage = dispatcher.smart_usage(dispatcher.root(), &());
        assert_eq!(usage.values().collect::<Vec<_>>(), ["pick <<left / right>>"]);
    }
}
