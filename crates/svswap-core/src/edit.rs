use crate::error::CoreError;
use crate::model::{Content, Element};

/// An optional attribute qualifier for a structural lookup: the child must
/// carry the named attribute with exactly this value.
pub type AttribFilter<'a> = (&'a str, &'a str);

/// Find exactly one direct child element of `parent` with the given tag.
///
/// The save format nests similarly-named containers, so lookups are always
/// scoped to the direct children of a known parent, never the whole
/// document. Zero matches is [`CoreError::ElementNotFound`]; two or more is
/// [`CoreError::DuplicateElement`], because an ambiguous document cannot be
/// edited safely.
pub fn find_one_child<'a>(
    parent: &'a Element,
    tag: &str,
    attrib: Option<AttribFilter<'_>>,
) -> Result<&'a Element, CoreError> {
    let index = find_one_child_index(parent, tag, attrib)?;
    match &parent.children[index] {
        Content::Element(e) => Ok(e),
        Content::Text(_) => Err(CoreError::not_found(tag, &parent.name)),
    }
}

pub fn find_one_child_mut<'a>(
    parent: &'a mut Element,
    tag: &str,
    attrib: Option<AttribFilter<'_>>,
) -> Result<&'a mut Element, CoreError> {
    let index = find_one_child_index(parent, tag, attrib)?;
    match &mut parent.children[index] {
        Content::Element(e) => Ok(e),
        Content::Text(_) => Err(CoreError::not_found(tag, &parent.name)),
    }
}

/// Index into `parent.children` of the unique matching child element.
pub fn find_one_child_index(
    parent: &Element,
    tag: &str,
    attrib: Option<AttribFilter<'_>>,
) -> Result<usize, CoreError> {
    match attrib {
        None => log::debug!("Searching for <{}> in <{}>", tag, parent.name),
        Some((name, value)) => log::debug!(
            "Searching for <{} {}={}> in <{}>",
            tag,
            name,
            value,
            parent.name
        ),
    }
    let mut found: Option<usize> = None;
    for (i, child) in parent.children.iter().enumerate() {
        let Content::Element(e) = child else { continue };
        if e.name != tag {
            continue;
        }
        if let Some((name, value)) = attrib
            && e.attribute(name) != Some(value)
        {
            continue;
        }
        if found.is_some() {
            return Err(CoreError::duplicate(tag, &parent.name));
        }
        found = Some(i);
    }
    found.ok_or_else(|| CoreError::not_found(tag, &parent.name))
}
