/*!
 * Glossary term matching.
 *
 * A glossary maps source-language terms to their fixed target-language
 * translations. The full term table can be large; each document only carries
 * the subset of terms that literally occur in its body, found with a single
 * multi-pattern pass over the text. That subset is computed once per document,
 * before segmentation, and shared read-only by every segment call.
 */

use std::collections::BTreeMap;
use std::path::Path;

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use log::{info, warn};

/// Multi-pattern matcher over a glossary term table
pub struct GlossaryMatcher {
    automaton: AhoCorasick,
    terms: Vec<(String, String)>,
}

impl GlossaryMatcher {
    /// Build a matcher from `(source term, target term)` pairs
    pub fn from_terms(terms: Vec<(String, String)>) -> Result<Self> {
        let terms: Vec<(String, String)> =
            terms.into_iter().filter(|(source, _)| !source.is_empty()).collect();
        let automaton = AhoCorasick::new(terms.iter().map(|(source, _)| source))
            .context("Failed to build glossary automaton")?;
        Ok(Self { automaton, terms })
    }

    /// A matcher with no terms; every lookup returns an empty mapping
    pub fn empty() -> Self {
        Self::from_terms(Vec::new()).expect("empty automaton is always valid")
    }

    /// Number of terms in the table
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the table has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Return the subset of the term table whose source terms occur in `text`
    pub fn matched_terms(&self, text: &str) -> BTreeMap<String, String> {
        let mut matched = BTreeMap::new();
        for found in self.automaton.find_overlapping_iter(text) {
            let (source, target) = &self.terms[found.pattern().as_usize()];
            matched.entry(source.clone()).or_insert_with(|| target.clone());
        }
        matched
    }
}

/// Parse a Markdown glossary table into term pairs.
///
/// The expected layout is a two-column table (`| source | target | ... |`)
/// with a header row and a `|:---|` style separator row, both skipped. Rows
/// with fewer than two non-empty columns are ignored.
pub fn parse_glossary_table(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .skip(2)
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with("|:---"))
        .filter_map(|line| {
            let columns: Vec<&str> = line
                .split('|')
                .map(str::trim)
                .filter(|col| !col.is_empty())
                .collect();
            match columns.as_slice() {
                [source, target, ..] => Some(((*source).to_string(), (*target).to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Load a glossary matcher from an optional URL or local file.
///
/// A failed download degrades to an empty glossary with a warning rather than
/// aborting the batch; glossary substitution is an enhancement, not a
/// prerequisite.
pub async fn load_glossary(url: Option<&str>, path: Option<&Path>) -> Result<GlossaryMatcher> {
    let content = match (url, path) {
        (Some(url), _) => match download_glossary(url).await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Failed to download glossary from {}: {}", url, e);
                None
            }
        },
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read glossary file: {:?}", path))?,
        ),
        (None, None) => None,
    };

    let matcher = match content {
        Some(content) => {
            let terms = parse_glossary_table(&content);
            info!("Loaded glossary with {} terms", terms.len());
            GlossaryMatcher::from_terms(terms)?
        }
        None => GlossaryMatcher::empty(),
    };

    Ok(matcher)
}

async fn download_glossary(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch glossary: {}", url))?;
    if !response.status().is_success() {
        anyhow::bail!("Glossary fetch returned status {}", response.status());
    }
    response.text().await.context("Failed to read glossary response body")
}
