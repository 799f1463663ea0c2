use serde::Deserialize;

use super::DeckError;

/// YAML header of a deck file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
    #[serde(default)]
    pub tooltips: Vec<TooltipSpec>,
    #[serde(default)]
    pub modals: Vec<ModalSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSpec {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub pairs: Vec<PairSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub requires: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairSpec {
    pub units: [String; 2],
    pub outcome: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TooltipSpec {
    pub id: String,
    pub trigger: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Image,
    Qr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModalSpec {
    pub id: String,
    pub kind: ModalKind,
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Split a `---` delimited YAML header from the deck body.
///
/// A deck without a header gets `Frontmatter::default()` and the whole input as body.
pub fn extract(content: &str) -> Result<(Frontmatter, String), DeckError> {
    let content = content.trim_start_matches('\u{feff}');
    let normalized = content.replace("\r\n", "\n");

    let Some(rest) = normalized.strip_prefix("---\n") else {
        return Ok((Frontmatter::default(), normalized));
    };

    let Some(end) = find_closing(rest) else {
        return Err(DeckError::UnterminatedFrontmatter);
    };

    let yaml = &rest[..end];
    let body = rest[end..]
        .split_once('\n')
        .map(|(_, body)| body)
        .unwrap_or_default();

    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    Ok((frontmatter, body.to_string()))
}

/// Byte offset of the line holding the closing `---`.
fn find_closing(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = extract("# Hello").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, "# Hello");
    }

    #[test]
    fn test_basic_fields() {
        let (fm, body) = extract("---\ntitle: Fagvalg\ntheme: dark\n---\n# One").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fagvalg"));
        assert_eq!(fm.theme.as_deref(), Some("dark"));
        assert_eq!(body, "# One");
    }

    #[test]
    fn test_widget_spec() {
        let src = "---\nwidgets:\n  - id: w\n    units:\n      - { id: a, label: A }\n      - { id: b, label: B, requires: a }\n    pairs:\n      - { units: [a, b], outcome: Done }\n---\n";
        let (fm, _) = extract(src).unwrap();
        assert_eq!(fm.widgets.len(), 1);
        assert_eq!(fm.widgets[0].units[1].requires.as_deref(), Some("a"));
        assert_eq!(fm.widgets[0].pairs[0].units, ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_modal_kind() {
        let src = "---\nmodals:\n  - { id: q, kind: qr, label: Vis, url: 'https://x.example' }\n---\n";
        let (fm, _) = extract(src).unwrap();
        assert_eq!(fm.modals[0].kind, ModalKind::Qr);
        assert!(fm.modals[0].image.is_none());
    }

    #[test]
    fn test_unterminated() {
        assert!(matches!(
            extract("---\ntitle: x\n# body"),
            Err(DeckError::UnterminatedFrontmatter)
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(
            extract("---\ntitel: x\n---\n"),
            Err(DeckError::Frontmatter(_))
        ));
    }
}
