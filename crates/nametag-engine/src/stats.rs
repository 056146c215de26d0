use crate::compose::{build_entry_queue, reference_template};
use crate::layout::{LayoutPlan, plan_layout};
use crate::options::{GenerationRequest, GridPreset};
use crate::types::*;

/// Summary of a run, computed without rendering anything
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStatistics {
    pub layout: LayoutPlan,
    pub per_page: usize,
    /// Roster entries
    pub entries: usize,
    /// Synthetic blank badges
    pub blank_entries: usize,
    /// Badge slots filled across all pages
    pub total_slots: usize,
    pub pages: usize,
    /// Whether more than one uploaded template is in play
    pub multi_template: bool,
}

/// Pages needed for `person_count` badges on a grid preset. Never zero.
pub fn calculate_page_count(person_count: usize, preset: GridPreset) -> usize {
    person_count.div_ceil(preset.per_page()).max(1)
}

/// Calculate statistics for a request
pub fn calculate_statistics(request: &GenerationRequest) -> Result<GenerationStatistics> {
    request.validate()?;

    let reference = reference_template(request).ok_or(NametagError::NoTemplate)?;
    let layout = plan_layout(request.export(), reference.aspect_ratio())?;

    let queue = build_entry_queue(request);
    let blank_entries = queue.len() - request.roster.len();
    let per_page = layout.per_page();
    let pages = layout.page_count(queue.len());

    Ok(GenerationStatistics {
        per_page,
        entries: request.roster.len(),
        blank_entries,
        total_slots: queue.len(),
        pages,
        multi_template: request.is_multi_template(),
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(calculate_page_count(10, GridPreset::TwoByTwo), 3);
        assert_eq!(calculate_page_count(12, GridPreset::TwoByThree), 2);
        assert_eq!(calculate_page_count(13, GridPreset::TwoByThree), 3);
        assert_eq!(calculate_page_count(9, GridPreset::ThreeByThree), 1);
        assert_eq!(calculate_page_count(17, GridPreset::TwoByFour), 3);
    }

    #[test]
    fn test_zero_people_is_one_page() {
        assert_eq!(calculate_page_count(0, GridPreset::TwoByTwo), 1);
    }
}
