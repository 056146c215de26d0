//! Template and header-color resolution per roster entry
//!
//! Resolution order for templates:
//! 1. The entry's direct template override, when it names a known template
//! 2. The role mapping for the entry's value in the template column
//! 3. The [`NO_ROLE_KEY`] mapping when that value is the empty string
//! 4. The default template
//!
//! Missing or dangling mappings fall through to the next rule.

use crate::constants::NO_ROLE_KEY;
use crate::model::{RoleColorMap, RoleMapping, RosterEntry, Template};
use crate::options::GenerationRequest;
use crate::types::Rgb;

/// Everything needed to pick a template for an entry
#[derive(Debug, Clone, Copy)]
pub struct RoleContext<'a> {
    pub templates: &'a [Template],
    pub role_mapping: &'a RoleMapping,
    pub role_colors: &'a RoleColorMap,
    pub template_column: Option<&'a str>,
    pub default_template: &'a Template,
}

impl<'a> RoleContext<'a> {
    /// Build a context from a request. `None` when the request has no templates.
    pub fn from_request(request: &'a GenerationRequest) -> Option<Self> {
        Some(Self {
            templates: &request.templates,
            role_mapping: &request.settings.role_mapping,
            role_colors: &request.settings.role_colors,
            template_column: request.settings.template_column.as_deref(),
            default_template: request.default_template()?,
        })
    }

    fn find(&self, id: &str) -> Option<&'a Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    fn role_value<'e>(&self, entry: &'e RosterEntry) -> Option<&'e str> {
        self.template_column.map(|column| entry.value(column))
    }
}

/// Pick the template for one entry.
pub fn resolve_template<'a>(entry: &RosterEntry, ctx: &RoleContext<'a>) -> &'a Template {
    if let Some(template) = entry.template_id.as_deref().and_then(|id| ctx.find(id)) {
        return template;
    }

    if let Some(role) = ctx.role_value(entry) {
        let key = if role.is_empty() { NO_ROLE_KEY } else { role };
        if let Some(template) = ctx.role_mapping.get(key).and_then(|id| ctx.find(id)) {
            return template;
        }
    }

    ctx.default_template
}

/// Header color override for the built-in template, when role colors apply.
pub fn resolve_header_color(
    entry: &RosterEntry,
    template: &Template,
    ctx: &RoleContext<'_>,
) -> Option<Rgb> {
    if !template.is_builtin() || ctx.role_colors.is_empty() {
        return None;
    }
    let role = ctx.role_value(entry)?;
    if role.is_empty() {
        return None;
    }
    ctx.role_colors.get(role).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Vec<Template> {
        vec![
            Template::builtin(),
            Template::image("staff", "staff.png", vec![0u8], 300, 200),
            Template::image("guest", "guest.png", vec![0u8], 300, 200),
            Template::image("none", "none.png", vec![0u8], 300, 200),
        ]
    }

    fn mapping() -> RoleMapping {
        let mut mapping = RoleMapping::new();
        mapping.insert("Staff".to_string(), "staff".to_string());
        mapping.insert("Guest".to_string(), "guest".to_string());
        mapping.insert("Ghost".to_string(), "deleted-template".to_string());
        mapping.insert(NO_ROLE_KEY.to_string(), "none".to_string());
        mapping
    }

    fn entry(role: &str) -> RosterEntry {
        RosterEntry::new("p").with_field("Name", "Ada").with_field("Role", role)
    }

    #[test]
    fn test_override_beats_role() {
        let templates = templates();
        let mapping = mapping();
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        let person = entry("Staff").with_template("guest");
        assert_eq!(resolve_template(&person, &ctx).id, "guest");
    }

    #[test]
    fn test_unknown_override_falls_through() {
        let templates = templates();
        let mapping = mapping();
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        let person = entry("Staff").with_template("missing");
        assert_eq!(resolve_template(&person, &ctx).id, "staff");
    }

    #[test]
    fn test_role_mapping() {
        let templates = templates();
        let mapping = mapping();
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        assert_eq!(resolve_template(&entry("Guest"), &ctx).id, "guest");
        assert_eq!(resolve_template(&entry(""), &ctx).id, "none");
        // Whitespace is a role value of its own, not a missing one
        assert_eq!(resolve_template(&entry("  "), &ctx).id, "default-template");
    }

    #[test]
    fn test_unmapped_role_uses_default() {
        let templates = templates();
        let mapping = mapping();
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        assert_eq!(resolve_template(&entry("Speaker"), &ctx).id, "default-template");
        // Mapping to a template that no longer exists
        assert_eq!(resolve_template(&entry("Ghost"), &ctx).id, "default-template");
    }

    #[test]
    fn test_without_template_column() {
        let templates = templates();
        let mapping = mapping();
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: None,
            default_template: &templates[1],
        };

        assert_eq!(resolve_template(&entry("Guest"), &ctx).id, "staff");
        assert_eq!(resolve_template(&entry(""), &ctx).id, "staff");
    }

    #[test]
    fn test_empty_role_without_no_role_key() {
        let templates = templates();
        let mut mapping = mapping();
        mapping.remove(NO_ROLE_KEY);
        let colors = RoleColorMap::new();
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        assert_eq!(resolve_template(&entry(""), &ctx).id, "default-template");
    }

    #[test]
    fn test_header_color_only_for_builtin() {
        let templates = templates();
        let mapping = RoleMapping::new();
        let mut colors = RoleColorMap::new();
        colors.insert("Staff".to_string(), Rgb::new(220, 38, 38));
        let ctx = RoleContext {
            templates: &templates,
            role_mapping: &mapping,
            role_colors: &colors,
            template_column: Some("Role"),
            default_template: &templates[0],
        };

        let staff = entry("Staff");
        assert_eq!(
            resolve_header_color(&staff, &templates[0], &ctx),
            Some(Rgb::new(220, 38, 38))
        );
        assert_eq!(resolve_header_color(&staff, &templates[1], &ctx), None);
        assert_eq!(resolve_header_color(&entry("Guest"), &templates[0], &ctx), None);
        assert_eq!(resolve_header_color(&entry(""), &templates[0], &ctx), None);
    }
}
