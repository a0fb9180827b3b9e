//! Read-only view of a rendered element tree.

/// A rooted, ordered tree of elements with per-node visibility and
/// attributes. Implemented by the host for its live document.
pub trait ElementTree {
    /// Cheap handle to one element.
    type Element: Copy + Eq + std::fmt::Debug;

    /// Parent element, `None` at the root.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// First child element in document order.
    fn first_child(&self, element: Self::Element) -> Option<Self::Element>;

    /// Sibling immediately before `element`.
    fn previous_sibling(&self, element: Self::Element) -> Option<Self::Element>;

    /// Sibling immediately after `element`.
    fn next_sibling(&self, element: Self::Element) -> Option<Self::Element>;

    /// `false` when the computed style is `display: none` or
    /// `visibility: hidden`.
    fn is_rendered(&self, element: Self::Element) -> bool;

    /// Tag name as written; callers compare case-insensitively.
    fn tag_name(&self, element: Self::Element) -> &str;

    /// Attribute value, `None` when absent.
    fn attribute(&self, element: Self::Element, name: &str) -> Option<&str>;
}
