//! Fixed markdown template for extracted documentation.

use crate::ObjectDoc;

/// Render an object's documentation as markdown.
///
/// The template is fixed so repeated extraction from unchanged data is
/// byte-identical (the synchronizer's idempotence check depends on this):
/// a title heading, the signature as inline code, a thematic break, then
/// the docstring body. The thematic break makes the signature and the
/// docstring land in separate notebook cells.
#[must_use]
pub fn extract(doc: &ObjectDoc) -> String {
    let params = doc
        .parameters
        .iter()
        .map(|(name, type_name)| format!("{name}: {type_name}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "# {name}\n\n`{name}({params})`\n\n---\n\n{docstring}\n",
        name = doc.name,
        docstring = doc.docstring.trim_end(),
    )
}
