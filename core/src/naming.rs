//! Name and display-template derivation from physical identifiers.
//!
//! Table and column names arrive in snake_case; the metadata model exposes
//! human-readable labels ("first_name" → "First Name") and `#{code}` display
//! templates derived from the leading non-hidden fields.

use crate::meta::{FieldMeta, TitleFormat};

/// Derives a human-readable label from a snake_case identifier.
///
/// Each underscore-separated segment is capitalized and the segments are
/// joined with spaces. Consecutive underscores collapse; the identifier is
/// otherwise taken as-is.
///
/// # Examples
///
/// ```
/// use data_domain_core::display_name;
///
/// assert_eq!(display_name("first_name"), "First Name");
/// assert_eq!(display_name("user"), "User");
/// assert_eq!(display_name("birth__date"), "Birth Date");
/// ```
pub fn display_name(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives display templates from an entity's fields.
///
/// The title references the first 2 non-hidden fields and the subtitle the
/// first 3, in declaration order, each rendered as `#{code}` and joined
/// with spaces.
///
/// # Examples
///
/// ```
/// use data_domain_core::{derive_title_format, FieldMeta, FieldType};
///
/// let fields: Vec<FieldMeta> = ["first_name", "last_name", "birth_date"]
///     .iter()
///     .map(|code| FieldMeta {
///         id: None,
///         code: code.to_string(),
///         column: code.to_string(),
///         name: code.to_string(),
///         placeholder: None,
///         field_type: FieldType::String,
///         identifier: false,
///         hidden: false,
///         mandatory: false,
///         generated: false,
///     })
///     .collect();
///
/// let format = derive_title_format(&fields);
/// assert_eq!(format.title, "#{first_name} #{last_name}");
/// assert_eq!(format.subtitle, "#{first_name} #{last_name} #{birth_date}");
/// ```
pub fn derive_title_format(fields: &[FieldMeta]) -> TitleFormat {
    TitleFormat {
        title: template_of(fields, 2),
        subtitle: template_of(fields, 3),
    }
}

fn template_of(fields: &[FieldMeta], count: usize) -> String {
    fields
        .iter()
        .filter(|f| !f.hidden)
        .take(count)
        .map(|f| format!("#{{{}}}", f.code))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::FieldType;

    fn field(code: &str, hidden: bool) -> FieldMeta {
        FieldMeta {
            id: None,
            code: code.to_string(),
            column: code.to_string(),
            name: display_name(code),
            placeholder: None,
            field_type: FieldType::String,
            identifier: hidden,
            hidden,
            mandatory: false,
            generated: false,
        }
    }

    #[test]
    fn test_display_name_single_segment() {
        assert_eq!(display_name("user"), "User");
    }

    #[test]
    fn test_display_name_multiple_segments() {
        assert_eq!(display_name("middle_name"), "Middle Name");
        assert_eq!(display_name("created_at_time"), "Created At Time");
    }

    #[test]
    fn test_display_name_collapses_empty_segments() {
        assert_eq!(display_name("a__b"), "A B");
        assert_eq!(display_name("_leading"), "Leading");
    }

    #[test]
    fn test_title_format_skips_hidden_fields() {
        let fields = vec![
            field("id", true),
            field("first_name", false),
            field("middle_name", false),
            field("last_name", false),
        ];
        let format = derive_title_format(&fields);
        assert_eq!(format.title, "#{first_name} #{middle_name}");
        assert_eq!(
            format.subtitle,
            "#{first_name} #{middle_name} #{last_name}"
        );
    }

    #[test]
    fn test_title_format_with_fewer_fields_than_requested() {
        let fields = vec![field("id", true), field("name", false)];
        let format = derive_title_format(&fields);
        assert_eq!(format.title, "#{name}");
        assert_eq!(format.subtitle, "#{name}");
    }

    #[test]
    fn test_title_format_with_no_visible_fields() {
        let fields = vec![field("id", true)];
        let format = derive_title_format(&fields);
        assert_eq!(format.title, "");
        assert_eq!(format.subtitle, "");
    }
}
