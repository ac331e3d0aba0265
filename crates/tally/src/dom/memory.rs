// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Write};
use std::rc::Rc;

use super::{Dom, Event, Handler};

/// Handle to a node in a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

enum Kind {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<NodeId>,
    },
    Text(String),
}

struct NodeData {
    kind: Kind,
    parent: Option<NodeId>,
    listeners: Vec<(Event, Rc<dyn Fn()>)>,
}

/// A retained document tree living in Rust memory.
///
/// Nodes are never freed, a `MemoryDom` is expected to live as long as the app it renders.
/// Writes through a [`NodeId`] that does not belong to this document are ignored.
#[derive(Default)]
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    root: Cell<Option<NodeId>>,
    text_writes: Cell<usize>,
}

impl MemoryDom {
    pub fn new() -> Self {
        MemoryDom::default()
    }

    /// The node attached with [`Dom::mount`], if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root.get()
    }

    pub fn tag(&self, node: NodeId) -> Option<&'static str> {
        match self.nodes.borrow().get(node.0 as usize)?.kind {
            Kind::Element { tag, .. } => Some(tag),
            Kind::Text(_) => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();

        match &nodes.get(node.0 as usize)?.kind {
            Kind::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr, _)| *attr == name)
                .map(|(_, value)| value.clone()),
            Kind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node.0 as usize)?.parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.nodes.borrow().get(node.0 as usize).map(|n| &n.kind) {
            Some(Kind::Element { children, .. }) => children.clone(),
            _ => Vec::new(),
        }
    }

    /// Concatenated text of the node and all of its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();

        self.collect_text(node, &mut out);

        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let children = {
            let nodes = self.nodes.borrow();

            match nodes.get(node.0 as usize).map(|n| &n.kind) {
                Some(Kind::Text(text)) => {
                    out.push_str(text);
                    return;
                }
                Some(Kind::Element { children, .. }) => children.clone(),
                None => return,
            }
        };

        for child in children {
            self.collect_text(child, out);
        }
    }

    /// All mounted elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.root().into_iter().collect();

        while let Some(node) = stack.pop() {
            if self.tag(node) == Some(tag) {
                found.push(node);
            }

            stack.extend(self.children(node).into_iter().rev());
        }

        found
    }

    /// First mounted element with the given tag, in document order.
    pub fn find(&self, tag: &str) -> Option<NodeId> {
        self.find_all(tag).into_iter().next()
    }

    /// First mounted element with the given tag and exact text content.
    pub fn find_by_text(&self, tag: &str, text: &str) -> Option<NodeId> {
        self.find_all(tag)
            .into_iter()
            .find(|&node| self.text_content(node) == text)
    }

    /// Dispatch a click on `node`. Returns `false` if nothing was listening.
    ///
    /// Unlike in a browser the event does not bubble.
    pub fn click(&self, node: NodeId) -> bool {
        self.dispatch(node, Event::Click)
    }

    pub fn dispatch(&self, node: NodeId, event: Event) -> bool {
        // Handlers will update views, which write back into `nodes`.
        let handlers = match self.nodes.borrow().get(node.0 as usize) {
            Some(data) => data
                .listeners
                .iter()
                .filter(|(e, _)| *e == event)
                .map(|(_, handler)| handler.clone())
                .collect::<Vec<_>>(),
            None => return false,
        };

        for handler in &handlers {
            handler();
        }

        !handlers.is_empty()
    }

    /// Number of [`Dom::set_text`] calls so far.
    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }

    /// Serialize the mounted tree to HTML. Empty if nothing is mounted.
    pub fn to_html(&self) -> String {
        let mut out = String::new();

        if let Some(root) = self.root() {
            // Writing to a `String` never fails.
            let _ = self.write_html(root, &mut out);
        }

        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) -> fmt::Result {
        let (tag, children) = {
            let nodes = self.nodes.borrow();

            match nodes.get(node.0 as usize).map(|n| &n.kind) {
                Some(Kind::Text(text)) => return write_escaped(out, text),
                Some(Kind::Element {
                    tag,
                    attrs,
                    children,
                }) => {
                    write!(out, "<{tag}")?;

                    for (name, value) in attrs {
                        write!(out, " {name}=\"")?;
                        write_escaped(out, value)?;
                        out.push('"');
                    }

                    out.push('>');

                    (*tag, children.clone())
                }
                None => return Ok(()),
            }
        };

        for child in children {
            self.write_html(child, out)?;
        }

        write!(out, "</{tag}>")
    }

    fn push(&self, kind: Kind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len() as u32);

        nodes.push(NodeData {
            kind,
            parent: None,
            listeners: Vec::new(),
        });

        id
    }
}

fn write_escaped(out: &mut String, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }

    Ok(())
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element(&self, tag: &'static str) -> NodeId {
        self.push(Kind::Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        })
    }

    fn text(&self, text: &str) -> NodeId {
        self.push(Kind::Text(text.to_owned()))
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let idx = node.0 as usize;

        let Some(data) = nodes.get_mut(idx) else {
            return;
        };

        let replaced = match &mut data.kind {
            Kind::Text(old) => {
                old.clear();
                old.push_str(text);
                None
            }
            Kind::Element { children, .. } => Some(std::mem::take(children)),
        };

        // Same as `textContent`: all children are replaced by a single text node.
        if let Some(replaced) = replaced {
            for child in replaced {
                nodes[child.0 as usize].parent = None;
            }

            let id = NodeId(nodes.len() as u32);

            nodes.push(NodeData {
                kind: Kind::Text(text.to_owned()),
                parent: Some(*node),
                listeners: Vec::new(),
            });

            if let Kind::Element { children, .. } = &mut nodes[idx].kind {
                children.push(id);
            }
        }

        self.text_writes.set(self.text_writes.get() + 1);
    }

    fn set_attr(&self, node: &NodeId, name: &'static str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();

        if let Some(NodeData {
            kind: Kind::Element { attrs, .. },
            ..
        }) = nodes.get_mut(node.0 as usize)
        {
            match attrs.iter_mut().find(|(attr, _)| *attr == name) {
                Some((_, old)) => {
                    old.clear();
                    old.push_str(value);
                }
                None => attrs.push((name, value.to_owned())),
            }
        }
    }

    fn append(&self, parent: &NodeId, child: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();

        let parent_is_element = matches!(
            nodes.get(parent.0 as usize),
            Some(NodeData {
                kind: Kind::Element { .. },
                ..
            })
        );

        if !parent_is_element || nodes.get(child.0 as usize).is_none() {
            return;
        }

        let old_parent = nodes[child.0 as usize].parent.take();

        if let Some(old) = old_parent {
            if let Kind::Element { children, .. } = &mut nodes[old.0 as usize].kind {
                children.retain(|c| c != child);
            }
        }

        if let Kind::Element { children, .. } = &mut nodes[parent.0 as usize].kind {
            children.push(*child);
        }

        nodes[child.0 as usize].parent = Some(*parent);
    }

    fn listen(&self, node: &NodeId, event: Event, handler: Handler) {
        if let Some(data) = self.nodes.borrow_mut().get_mut(node.0 as usize) {
            data.listeners.push((event, Rc::from(handler)));
        }
    }

    fn mount(&self, root: &NodeId) {
        self.root.set(Some(*root));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(dom: &MemoryDom) -> NodeId {
        let ul = dom.element("ul");

        for text in ["foo", "bar & <baz>"] {
            let li = dom.element("li");
            let t = dom.text(text);

            dom.append(&li, &t);
            dom.append(&ul, &li);
        }

        dom.set_attr(&ul, "class", "\"quoted\"");
        dom.mount(&ul);

        ul
    }

    #[test]
    fn serialize_html() {
        let dom = MemoryDom::new();

        assert_eq!(dom.to_html(), "");

        list(&dom);

        assert_eq!(
            dom.to_html(),
            "<ul class=\"&quot;quoted&quot;\"><li>foo</li><li>bar &amp; &lt;baz&gt;</li></ul>"
        );
    }

    #[test]
    fn queries() {
        let dom = MemoryDom::new();
        let ul = list(&dom);

        let items = dom.find_all("li");

        assert_eq!(items.len(), 2);
        assert_eq!(dom.find("ul"), Some(ul));
        assert_eq!(dom.find("li"), Some(items[0]));
        assert_eq!(dom.find_by_text("li", "foo"), Some(items[0]));
        assert_eq!(dom.find_by_text("li", "nope"), None);
        assert_eq!(dom.parent(items[1]), Some(ul));
        assert_eq!(dom.text_content(ul), "foobar & <baz>");
        assert_eq!(dom.attr(ul, "class").as_deref(), Some("\"quoted\""));
        assert_eq!(dom.tag(dom.children(items[0])[0]), None);
    }

    #[test]
    fn append_moves_nodes() {
        let dom = MemoryDom::new();
        let ul = list(&dom);
        let items = dom.find_all("li");

        dom.append(&ul, &items[0]);

        assert_eq!(dom.children(ul), vec![items[1], items[0]]);
    }

    #[test]
    fn set_text_replaces_children() {
        let dom = MemoryDom::new();
        let ul = list(&dom);

        dom.set_text(&ul, "empty");

        assert_eq!(dom.to_html(), "<ul class=\"&quot;quoted&quot;\">empty</ul>");
        assert!(dom.find("li").is_none());
        assert_eq!(dom.text_writes(), 1);
    }

    #[test]
    fn click_calls_listeners() {
        let dom = MemoryDom::new();
        let ul = list(&dom);
        let clicks = Rc::new(Cell::new(0));

        let counter = clicks.clone();
        dom.listen(&ul, Event::Click, Box::new(move || counter.set(counter.get() + 1)));

        assert!(dom.click(ul));
        assert!(dom.click(ul));
        assert!(!dom.click(dom.find("li").unwrap()));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn foreign_nodes_are_ignored() {
        let other = MemoryDom::new();
        list(&other);
        let item = other.find("li").unwrap();

        let dom = MemoryDom::new();
        let div = dom.element("div");

        dom.set_text(&item, "nope");
        dom.set_attr(&item, "id", "nope");
        dom.listen(&item, Event::Click, Box::new(|| {}));
        dom.append(&div, &item);
        dom.append(&item, &div);
        dom.mount(&div);

        assert_eq!(dom.to_html(), "<div></div>");
        assert_eq!(dom.text_writes(), 0);
        assert!(!dom.click(item));
    }
}
