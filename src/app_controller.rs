use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::glossary::{self, GlossaryMatcher};
use crate::markdown::front_matter::{prepend_front_matter, split_front_matter};
use crate::markdown::headings::{extract_headings, inject_anchors};
use crate::markdown::reassemble::join_segments;
use crate::markdown::{SegmentOptions, Segmenter, TokenCounter};
use crate::translation::{SegmentDispatcher, TranslationService};
use crate::vars;

// @module: Application controller for Markdown translation

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Token-bounded segmenter
    segmenter: Segmenter,
    // @field: Per-document glossary matcher
    glossary: GlossaryMatcher,
    // @field: Primary translation service
    primary: TranslationService,
    // @field: Service tried when the primary fails a document
    fallback: Option<TranslationService>,
}

impl Controller {
    /// Create a controller from configuration, loading the glossary and
    /// building the provider clients
    pub async fn with_config(config: Config) -> Result<Self> {
        let glossary = glossary::load_glossary(
            config.glossary.url.as_deref(),
            config.glossary.path.as_deref().map(Path::new),
        )
        .await?;

        let primary = TranslationService::from_config(&config.translation, &config.translation.provider)?;
        let fallback = match &config.translation.fallback_provider {
            Some(provider) => Some(TranslationService::from_config(&config.translation, provider)?),
            None => None,
        };

        Self::with_services(config, glossary, primary, fallback)
    }

    /// Create a controller around prebuilt services (used by tests)
    pub fn with_services(
        config: Config,
        glossary: GlossaryMatcher,
        primary: TranslationService,
        fallback: Option<TranslationService>,
    ) -> Result<Self> {
        let counter = TokenCounter::new()?;
        let options = SegmentOptions {
            max_tokens: config.segmentation.max_tokens,
            ..SegmentOptions::default()
        };
        let segmenter = Segmenter::new(counter, options);

        Ok(Self { config, segmenter, glossary, primary, fallback })
    }

    /// Translate a single file to its mirrored output path
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<()> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let relative = FileManager::relative_path(&self.config.input_dir, &input_file)
            .ok()
            .or_else(|| input_file.file_name().map(PathBuf::from))
            .ok_or_else(|| anyhow!("Cannot determine output name for {:?}", input_file))?;

        self.process_file(&input_file, &relative, force_overwrite).await
    }

    /// Translate every Markdown file under a directory.
    ///
    /// Documents are the unit of success and failure: one document's error is
    /// logged with its path and the batch moves on.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_markdown_files(&input_dir)?;
        info!("Found {} Markdown file(s) under {:?}", files.len(), input_dir);

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );

        let mut translated = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for file in &files {
            let relative = FileManager::relative_path(&input_dir, file)?;
            progress.set_message(relative.display().to_string());

            let relative_str = relative.to_string_lossy();
            if self.config.skip.is_skipped(&relative_str) {
                info!("Skipping excluded file: {}", relative_str);
                skipped += 1;
                progress.inc(1);
                continue;
            }

            match self.process_file(file, &relative, force_overwrite).await {
                Ok(()) => translated += 1,
                Err(e) => {
                    error!("Failed to translate {:?}: {}", file, e);
                    failed += 1;
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!(
            "Batch finished: {} translated, {} skipped, {} failed",
            translated, skipped, failed
        );

        Ok(())
    }

    /// Run the full pipeline for one file and write its output.
    ///
    /// Writing is the very last step; a document that fails anywhere in the
    /// pipeline leaves no partial output behind.
    async fn process_file(
        &self,
        input_file: &Path,
        relative: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        let output_path = FileManager::mirrored_output_path(&self.config.output_dir, relative);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, output already exists (use -f to force overwrite)",
                relative
            );
            return Ok(());
        }

        let raw = FileManager::read_to_string(input_file)?;

        let content = match self.translate_document(&raw, &self.primary).await {
            Ok(content) => content,
            Err(primary_error) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        "Primary provider failed for {:?} ({}), trying fallback",
                        relative, primary_error
                    );
                    self.translate_document(&raw, fallback)
                        .await
                        .with_context(|| format!("Fallback provider also failed for {:?}", relative))?
                }
                None => return Err(primary_error),
            },
        };

        FileManager::write_to_file(&output_path, &content)?;
        info!("Translated {:?} -> {:?}", relative, output_path);

        Ok(())
    }

    /// The per-document pipeline: preprocess, split front matter, record
    /// headings, segment, translate concurrently, rejoin, re-stamp anchors,
    /// restore front matter.
    async fn translate_document(&self, raw: &str, service: &TranslationService) -> Result<String> {
        let variables_file = self.config.variables_file.as_deref().map(Path::new);
        let preprocessed = vars::preprocess(raw, variables_file)?;

        let (front, body) = split_front_matter(&preprocessed);

        let glossary_terms = self.glossary.matched_terms(body);
        let headings = extract_headings(body);
        let segments = self.segmenter.segment(body)?;

        let dispatcher = SegmentDispatcher::new(service.clone());
        let outputs = dispatcher.translate_segments(&segments, &glossary_terms).await?;

        let joined = join_segments(&outputs);
        let anchored = inject_anchors(&joined, &headings)?;

        let mut content = prepend_front_matter(&anchored, front);
        if !content.ends_with('\n') {
            content.push('\n');
        }
        Ok(content)
    }
}
