use indexmap::IndexMap;

/// A fully in-memory XML document. The save file is small enough that the
/// whole tree is parsed up front and mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// One XML element. Attribute order is preserved so the namespace
/// declarations on the save root round-trip exactly. Names keep their
/// namespace prefixes verbatim; no expansion is performed.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// A child node: a nested element or a run of character data.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Direct child elements in document order, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text of this element: the first direct text child. `None` for an
    /// element with no character data, which is distinct from empty text
    /// (`<a></a>` parses without a text child; `<a> </a>` keeps its space).
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            Content::Text(t) => Some(t.as_str()),
            Content::Element(_) => None,
        })
    }

    /// Remove all direct text children and return the first one.
    pub fn take_text(&mut self) -> Option<String> {
        let mut taken = None;
        self.children.retain_mut(|c| match c {
            Content::Text(t) => {
                if taken.is_none() {
                    taken = Some(std::mem::take(t));
                }
                false
            }
            Content::Element(_) => true,
        });
        taken
    }

    /// Replace this element's character data. `None` leaves it with no text
    /// child at all.
    pub fn set_text(&mut self, text: Option<String>) {
        self.take_text();
        if let Some(t) = text {
            self.children.push(Content::Text(t));
        }
    }

    /// Index into `children` of the `n`-th direct child element.
    pub fn nth_element_index(&self, n: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Content::Element(_)))
            .nth(n)
            .map(|(i, _)| i)
    }
}
