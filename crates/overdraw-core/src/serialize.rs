//! Markup serialization through the `svg` crate's element tree.

use indexmap::IndexMap;
use svg::node::{Comment, Node as SvgNode, Text, element::Element};

use crate::{
    namespace,
    scene::{Node, NodeType},
};

/// Attribute namespace URIs mapped to the prefixes used for them.
type Prefixes = IndexMap<String, String>;

pub(crate) fn to_markup(node: &Node) -> String {
    let prefixes = collect_prefixes(node);
    build(node, None, &prefixes, true)
        .iter()
        .map(|built| built.to_string())
        .collect()
}

fn build(
    node: &Node,
    parent_namespace: Option<&str>,
    prefixes: &Prefixes,
    top_level: bool,
) -> Vec<Box<dyn SvgNode>> {
    match node.node_type() {
        NodeType::Element => vec![Box::new(build_element(
            node,
            parent_namespace,
            prefixes,
            top_level,
        ))],
        NodeType::Text => node
            .character_data()
            .map(|text| Box::new(Text::new(text)) as Box<dyn SvgNode>)
            .into_iter()
            .collect(),
        NodeType::Comment => node
            .character_data()
            .map(|text| Box::new(Comment::new(text)) as Box<dyn SvgNode>)
            .into_iter()
            .collect(),
        NodeType::Fragment | NodeType::Document => node
            .children()
            .iter()
            .flat_map(|child| build(child, parent_namespace, prefixes, top_level))
            .collect(),
    }
}

fn build_element(
    node: &Node,
    parent_namespace: Option<&str>,
    prefixes: &Prefixes,
    top_level: bool,
) -> Element {
    let own_namespace = node.namespace_uri();
    let mut element = Element::new(node.tag_name().unwrap_or_default());

    if top_level || own_namespace.as_deref() != parent_namespace {
        match &own_namespace {
            Some(uri) => element.assign("xmlns", uri.as_str()),
            None if parent_namespace.is_some() => element.assign("xmlns", ""),
            None => {}
        }
    }

    if top_level {
        for (uri, prefix) in prefixes {
            if prefix != "xml" {
                element.assign(format!("xmlns:{prefix}"), uri.as_str());
            }
        }
    }

    for attribute in node.attributes() {
        let name = match attribute.namespace().and_then(|uri| prefixes.get(uri)) {
            Some(prefix) => format!("{prefix}:{}", attribute.name()),
            None => attribute.name().to_string(),
        };
        element.assign(name, attribute.value());
    }

    let style = node
        .style_declarations()
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    if !style.is_empty() {
        element.assign("style", style);
    }

    for child in node.children() {
        for built in build(&child, own_namespace.as_deref(), prefixes, false) {
            element.append(built);
        }
    }

    element
}

fn collect_prefixes(node: &Node) -> Prefixes {
    let mut prefixes = Prefixes::new();
    let mut pending = vec![node.clone()];

    while let Some(current) = pending.pop() {
        for attribute in current.attributes() {
            if let Some(uri) = attribute.namespace() {
                if !prefixes.contains_key(uri) {
                    let prefix = namespace::prefix_for(uri)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("ns{}", prefixes.len() + 1));
                    prefixes.insert(uri.to_string(), prefix);
                }
            }
        }
        pending.extend(current.children().into_iter().rev());
    }

    prefixes
}
