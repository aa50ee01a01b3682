//! Reconciliation of the model's markdown answer with its place citations.
//!
//! The model is asked to emit one `### <name>` section per restaurant with
//! four labeled fields. Grounding chunks arrive separately, so each place
//! citation is bound to its section by scanning the text for a heading that
//! contains the place title. The scan is best effort: a citation whose
//! section or fields are missing still yields a record, filled with fixed
//! fallback values. Everything here is a pure function of `(text, chunks)`,
//! with no dependency on a live model.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{GroundingChunk, MapsChunk};

/// Rating used when the section has no parseable `**Rating**` field
pub const DEFAULT_RATING: &str = "4.5";
/// Budget used when the section has no `**Budget**` field
pub const DEFAULT_BUDGET: &str = "N/A";
/// Feature tags used when the section has no `**Features**` field
pub const DEFAULT_FEATURES: &[&str] = &["Nice Ambience", "Delicious"];
/// Description used when no section matched the place at all
pub const NO_DESCRIPTION: &str = "No detailed description available.";

static RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Rating\*\*:\s*([\d.]+)").unwrap());
static BUDGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Budget\*\*:\s*(.+?)\n").unwrap());
static FEATURES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Features\*\*:\s*(.+?)\n").unwrap());
static INTRO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\*\*Intro\*\*:\s*(.+)").unwrap());

/// One recommended restaurant, reconciled from text and citation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantRecord {
    /// Stable place id when the citation carries one, else `temp-<index>`
    pub id: String,
    /// Display name, taken from the citation
    pub name: String,
    /// Rating as the model printed it
    pub rating: String,
    /// Price range as the model printed it
    pub budget: String,
    /// Short feature tags
    pub features: Vec<String>,
    /// Narrative description
    pub description: String,
    /// The originating place citation, carrying the map link
    pub map_source: MapsChunk,
}

/// Filter a chunk list down to its place citations, preserving order
pub fn place_references(chunks: &[GroundingChunk]) -> Vec<&MapsChunk> {
    chunks.iter().filter_map(|c| c.maps.as_ref()).collect()
}

/// Build one record per place citation
///
/// The output always has the same length and order as the place citations in
/// `chunks`, regardless of what `text` contains.
pub fn assemble(text: &str, chunks: &[GroundingChunk]) -> Vec<RestaurantRecord> {
    place_references(chunks)
        .into_iter()
        .enumerate()
        .map(|(index, maps)| {
            let fields = match section_for(text, &maps.title) {
                Some(block) => extract_fields(block),
                None => Fields::fallback(),
            };
            RestaurantRecord {
                id: maps
                    .place_id
                    .clone()
                    .unwrap_or_else(|| format!("temp-{index}")),
                name: maps.title.clone(),
                rating: fields.rating,
                budget: fields.budget,
                features: fields.features,
                description: fields.description,
                map_source: maps.clone(),
            }
        })
        .collect()
}

/// Locate the text block belonging to one place
///
/// Looks for a `###` heading whose line contains `title` as a literal,
/// case-insensitive substring and returns everything up to the next heading
/// or the end of the text. The first matching heading wins; a title sharing
/// a substring with an earlier heading can therefore be misattributed, which
/// is accepted as part of the best-effort contract.
fn section_for<'a>(text: &'a str, title: &str) -> Option<&'a str> {
    let pattern = format!(
        r"(?is)###\s*[^\n]*?{}[^\n]*?\n(.*?)(?:###|\z)",
        regex::escape(title)
    );
    // The title is escaped, so the pattern always compiles.
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

struct Fields {
    rating: String,
    budget: String,
    features: Vec<String>,
    description: String,
}

impl Fields {
    /// Field values for a place whose section was not found at all
    fn fallback() -> Self {
        Self {
            rating: DEFAULT_RATING.to_string(),
            budget: DEFAULT_BUDGET.to_string(),
            features: DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect(),
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

/// Pull the four labeled fields out of a matched section
///
/// A missing `**Intro**` label falls back to the whole trimmed block rather
/// than the fixed no-description sentence; that sentence is reserved for
/// places with no section at all.
fn extract_fields(block: &str) -> Fields {
    let rating = RATING_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_RATING.to_string());

    let budget = BUDGET_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_BUDGET.to_string());

    let features = FEATURES_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split([',', '、'])
                .map(|s| s.trim().to_string())
                .collect()
        })
        .unwrap_or_else(|| DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect());

    let description = INTRO_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| block.trim().to_string());

    Fields {
        rating,
        budget,
        features,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(title: &str, place_id: Option<&str>) -> GroundingChunk {
        GroundingChunk {
            maps: Some(MapsChunk {
                source_id: None,
                title: title.to_string(),
                uri: format!("https://maps.google.com/?q={title}"),
                place_id: place_id.map(|s| s.to_string()),
                place_answer_sources: None,
            }),
            web: None,
        }
    }

    fn web(title: &str) -> GroundingChunk {
        GroundingChunk {
            maps: None,
            web: Some(crate::models::WebChunk {
                uri: Some("https://example.com".to_string()),
                title: Some(title.to_string()),
            }),
        }
    }

    #[test]
    fn well_formed_section_yields_verbatim_fields() {
        let text = "### Sushi Dai\n**Rating**: 4.8\n**Budget**: ¥3,000~¥6,000\n**Features**: Fresh, Authentic, Busy\n**Intro**: Famous stall.\n";
        let records = assemble(text, &[place("Sushi Dai", Some("p1"))]);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "p1");
        assert_eq!(r.name, "Sushi Dai");
        assert_eq!(r.rating, "4.8");
        assert_eq!(r.budget, "¥3,000~¥6,000");
        assert_eq!(r.features, vec!["Fresh", "Authentic", "Busy"]);
        assert_eq!(r.description, "Famous stall.");
    }

    #[test]
    fn no_place_citations_yields_no_records() {
        let text = "### Sushi Dai\n**Rating**: 4.8\n";
        assert!(assemble(text, &[]).is_empty());
        assert!(assemble(text, &[web("Sushi Dai")]).is_empty());
    }

    #[test]
    fn missing_section_takes_all_defaults() {
        let text = "### Somewhere Else\n**Rating**: 3.0\n**Intro**: Not it.\n";
        let records = assemble(text, &[place("Sushi Dai", None)]);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "temp-0");
        assert_eq!(r.name, "Sushi Dai");
        assert_eq!(r.rating, DEFAULT_RATING);
        assert_eq!(r.budget, DEFAULT_BUDGET);
        assert_eq!(r.features, DEFAULT_FEATURES);
        assert_eq!(r.description, NO_DESCRIPTION);
    }

    #[test]
    fn missing_intro_falls_back_to_whole_block() {
        let text = "### Sushi Dai\n**Rating**: 4.8\nA cramped counter by the market.\n";
        let records = assemble(text, &[place("Sushi Dai", None)]);

        assert_eq!(
            records[0].description,
            "**Rating**: 4.8\nA cramped counter by the market."
        );
        assert_eq!(records[0].rating, "4.8");
        assert_eq!(records[0].budget, DEFAULT_BUDGET);
    }

    #[test]
    fn regex_metacharacters_in_title_match_literally() {
        let title = "Tom & Jerry's (Cafe)";
        let text = "### Tom & Jerry's (Cafe)\n**Rating**: 4.2\n**Intro**: Cozy.\n";
        let records = assemble(text, &[place(title, None)]);

        assert_eq!(records[0].rating, "4.2");
        assert_eq!(records[0].description, "Cozy.");
    }

    #[test]
    fn features_split_on_ascii_and_ideographic_comma() {
        let text = "### Sushi Dai\n**Features**: 新鮮、道地, Busy\n**Intro**: x\n";
        let records = assemble(text, &[place("Sushi Dai", None)]);

        assert_eq!(records[0].features, vec!["新鮮", "道地", "Busy"]);
    }

    #[test]
    fn heading_match_is_case_insensitive_substring() {
        let text = "### 1. SUSHI DAI (Tsukiji)\n**Rating**: 4.8\n**Intro**: ok\n";
        let records = assemble(text, &[place("Sushi Dai", None)]);

        assert_eq!(records[0].rating, "4.8");
    }

    #[test]
    fn first_matching_heading_wins() {
        let text = "### Sushi Dai Annex\n**Rating**: 4.0\n**Intro**: annex\n### Sushi Dai\n**Rating**: 4.8\n**Intro**: main\n";
        let records = assemble(text, &[place("Sushi Dai", None)]);

        assert_eq!(records[0].rating, "4.0");
        assert_eq!(records[0].description, "annex");
    }

    #[test]
    fn record_count_matches_place_citations_even_with_empty_text() {
        let chunks = vec![
            place("A", None),
            web("ignored"),
            place("B", Some("pb")),
            place("C", None),
        ];
        let records = assemble("", &chunks);

        assert_eq!(records.len(), 3);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["temp-0", "pb", "temp-2"]);
        assert_eq!(
            records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn section_ends_at_next_heading() {
        let text = "### A\n**Intro**: first\n### B\n**Intro**: second\n";
        let records = assemble(text, &[place("A", None), place("B", None)]);

        assert_eq!(records[0].description, "first");
        assert_eq!(records[1].description, "second");
    }

    #[test]
    fn rating_is_kept_verbatim_as_text() {
        let text = "### A\n**Rating**: 4.50\n**Intro**: x\n";
        let records = assemble(text, &[place("A", None)]);

        assert_eq!(records[0].rating, "4.50");
    }

    #[test]
    fn place_references_preserves_order_and_skips_web() {
        let chunks = vec![web("w"), place("A", None), place("B", None)];
        let refs = place_references(&chunks);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].title, "A");
        assert_eq!(refs[1].title, "B");
    }
}
