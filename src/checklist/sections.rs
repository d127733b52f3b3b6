use crate::catalog::ChecklistItem;

/// A header with the plain items that follow it.
///
/// Items that come before the first header form a section with no header.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub header: Option<&'a ChecklistItem>,
    pub children: Vec<&'a ChecklistItem>,
}

impl<'a> Section<'a> {
    pub fn header_id(&self) -> Option<&'a str> {
        self.header.map(|h| h.id.as_str())
    }
}

/// Single grouping pass over a flat item list
pub fn group_sections(items: &[ChecklistItem]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for item in items {
        if item.is_header {
            sections.push(Section {
                header: Some(item),
                children: Vec::new(),
            });
        } else {
            match sections.last_mut() {
                Some(section) => section.children.push(item),
                None => sections.push(Section {
                    header: None,
                    children: vec![item],
                }),
            }
        }
    }

    sections
}
