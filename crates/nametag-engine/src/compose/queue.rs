//! The ordered list of badges a run produces
//!
//! Real roster entries come first, followed by blank fillers. Blanks
//! continue from the last real slot, so a page may mix the roster tail
//! with blank badges.

use crate::model::{RosterEntry, Template};
use crate::options::{BlankFill, GenerationRequest};
use std::borrow::Cow;

/// One badge to render
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedEntry<'a> {
    pub entry: Cow<'a, RosterEntry>,
    /// Synthetic filler without data
    pub is_blank: bool,
}

impl<'a> QueuedEntry<'a> {
    fn roster(entry: &'a RosterEntry) -> Self {
        Self {
            entry: Cow::Borrowed(entry),
            is_blank: false,
        }
    }

    fn blank(index: usize, template_id: &str) -> Self {
        Self {
            entry: Cow::Owned(RosterEntry::blank(index, Some(template_id.to_string()))),
            is_blank: true,
        }
    }
}

/// Template the shared grid is sized for.
pub fn reference_template(request: &GenerationRequest) -> Option<&Template> {
    request.default_template()
}

/// Roster entries followed by blank fillers.
///
/// - [`BlankFill::Count`]: that many blanks pinned to the default template
/// - [`BlankFill::PerTemplate`]: blanks pinned to each template, in template
///   list order, each template's blanks kept together
pub fn build_entry_queue(request: &GenerationRequest) -> Vec<QueuedEntry<'_>> {
    let mut queue: Vec<QueuedEntry<'_>> = request.roster.iter().map(QueuedEntry::roster).collect();
    let mut blank_index = 0;

    match &request.export().blank_fill {
        BlankFill::Count(count) => {
            if let Some(template) = request.default_template() {
                for _ in 0..*count {
                    queue.push(QueuedEntry::blank(blank_index, &template.id));
                    blank_index += 1;
                }
            }
        }
        BlankFill::PerTemplate(counts) => {
            for id in counts.keys() {
                if request.find_template(id).is_none() {
                    log::warn!("Ignoring blank badges for unknown template '{}'", id);
                }
            }
            for template in &request.templates {
                let count = counts.get(&template.id).copied().unwrap_or(0);
                for _ in 0..count {
                    queue.push(QueuedEntry::blank(blank_index, &template.id));
                    blank_index += 1;
                }
            }
        }
    }

    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ProjectSettings;
    use std::collections::BTreeMap;

    fn roster(n: usize) -> Vec<RosterEntry> {
        (0..n)
            .map(|i| RosterEntry::new(i.to_string()).with_field("Name", format!("Person {i}")))
            .collect()
    }

    fn templates() -> Vec<Template> {
        vec![
            Template::image("a", "a.png", vec![0u8], 300, 200),
            Template::image("b", "b.png", vec![0u8], 300, 200),
            Template::image("c", "c.png", vec![0u8], 300, 200),
        ]
    }

    #[test]
    fn test_count_blanks_use_default_template() {
        let mut settings = ProjectSettings::default();
        settings.export.blank_fill = BlankFill::Count(3);
        settings.selected_template_id = Some("b".to_string());
        let request = GenerationRequest::new(templates(), roster(10), settings);

        let queue = build_entry_queue(&request);
        assert_eq!(queue.len(), 13);
        assert!(queue[..10].iter().all(|q| !q.is_blank));
        for q in &queue[10..] {
            assert!(q.is_blank);
            assert_eq!(q.entry.template_id.as_deref(), Some("b"));
            assert!(q.entry.fields.is_empty());
        }
        assert_eq!(queue[12].entry.id, "blank-2");
    }

    #[test]
    fn test_per_template_blanks_in_template_order() {
        let mut counts = BTreeMap::new();
        counts.insert("c".to_string(), 2);
        counts.insert("a".to_string(), 1);
        counts.insert("missing".to_string(), 5);
        let mut settings = ProjectSettings::default();
        settings.export.blank_fill = BlankFill::PerTemplate(counts);
        let request = GenerationRequest::new(templates(), roster(2), settings);

        let queue = build_entry_queue(&request);
        let pinned: Vec<_> = queue[2..]
            .iter()
            .map(|q| q.entry.template_id.as_deref().unwrap())
            .collect();
        assert_eq!(pinned, vec!["a", "c", "c"]);
    }

    #[test]
    fn test_no_blanks() {
        let request = GenerationRequest::new(templates(), roster(4), ProjectSettings::default());
        assert_eq!(build_entry_queue(&request).len(), 4);
    }
}
