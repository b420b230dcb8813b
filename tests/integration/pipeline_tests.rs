/*!
 * End-to-end pipeline tests driving the controller over real files: anchor
 * re-injection, front matter and code passthrough, failure isolation and
 * output overwrite rules.
 */

use std::fs;
use std::path::PathBuf;

use mdxlate::app_config::Config;
use mdxlate::providers::mock::MockProvider;

use crate::common;

struct Workspace {
    _dir: tempfile::TempDir,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input_dir = dir.path().join("markdowns");
        let output_dir = dir.path().join("output");
        fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        Self { _dir: dir, input_dir, output_dir }
    }

    fn write_input(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.input_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create input subdir");
        }
        fs::write(&path, content).expect("Failed to write input file");
        path
    }

    fn config(&self) -> Config {
        let mut config = common::mock_config();
        config.input_dir = self.input_dir.to_string_lossy().into_owned();
        config.output_dir = self.output_dir.to_string_lossy().into_owned();
        config
    }

    fn output(&self, relative: &str) -> PathBuf {
        self.output_dir.join(relative)
    }
}

#[tokio::test]
async fn translates_a_file_and_reinjects_the_source_anchor() {
    let ws = Workspace::new();
    let input = ws.write_input("hello.md", "# Title\n\nHello world.\n");

    let service = common::service_with(MockProvider::working().with_response(common::pseudo_french));
    let controller = common::controller_with(ws.config(), service, None);

    controller.run(input, false).await.unwrap();

    let output = fs::read_to_string(ws.output("hello.md")).unwrap();
    assert_eq!(output, "# Titre {#title}\n\nBonjour le monde.\n");
}

#[tokio::test]
async fn front_matter_and_code_blocks_pass_through_untouched() {
    let ws = Workspace::new();
    let source = "\
---
title: Build guide
summary: how to build the project from source
---

# Build guide

Intro paragraph describing the build process in enough words that the two \
prose sections of this document cannot share a single segment under a small ceiling.

```bash
echo untouched
make install
```

# Troubleshooting

Closing paragraph with advice about rerunning the failing step and reading its log output.
";
    let input = ws.write_input("build.md", source);

    let mut config = ws.config();
    config.segmentation.max_tokens = 40;

    let service = common::service_with(MockProvider::working().with_response(common::pseudo_french));
    let controller = common::controller_with(config, service, None);

    controller.run(input, false).await.unwrap();

    let output = fs::read_to_string(ws.output("build.md")).unwrap();
    assert!(output.starts_with("---\ntitle: Build guide\nsummary: how to build the project from source\n---\n"));
    assert!(output.contains("# Build guide {#build-guide}"));
    assert!(output.contains("# Troubleshooting {#troubleshooting}"));
    assert!(output.contains("Paragraphe d'introduction"));
    assert!(output.contains("```bash\necho untouched\nmake install\n```"));
    assert!(output.ends_with('\n'));
}

#[tokio::test]
async fn failed_document_leaves_no_partial_output() {
    let ws = Workspace::new();
    let input = ws.write_input("doomed.md", "# Title\n\nHello world.\n");

    let controller =
        common::controller_with(ws.config(), common::service_with(MockProvider::failing()), None);

    let result = controller.run(input, false).await;
    assert!(result.is_err());
    assert!(!ws.output("doomed.md").exists());
}

#[tokio::test]
async fn fallback_service_recovers_a_failed_document() {
    let ws = Workspace::new();
    let input = ws.write_input("hello.md", "# Title\n\nHello world.\n");

    let controller = common::controller_with(
        ws.config(),
        common::service_with(MockProvider::failing()),
        Some(common::echo_service()),
    );

    controller.run(input, false).await.unwrap();

    let output = fs::read_to_string(ws.output("hello.md")).unwrap();
    assert_eq!(output, "# Title {#title}\n\nHello world.\n");
}

#[tokio::test]
async fn dropped_heading_aborts_the_document() {
    let ws = Workspace::new();
    let input = ws.write_input("guide.md", "# Guide\n\nText.\n\n## Details\n\nMore text.\n");

    let service =
        common::service_with(MockProvider::working().with_response(common::drop_subheadings));
    let controller = common::controller_with(ws.config(), service, None);

    let result = controller.run(input, false).await;
    assert!(result.is_err());
    assert!(!ws.output("guide.md").exists());
}

#[tokio::test]
async fn batch_continues_past_failing_documents() {
    let ws = Workspace::new();
    ws.write_input("a.md", "# First\n\nSome text.\n");
    ws.write_input("nested/b.md", "# Second\n\nMore text.\n");

    let controller =
        common::controller_with(ws.config(), common::service_with(MockProvider::failing()), None);

    // Every document fails, but the batch itself completes.
    controller.run_folder(ws.input_dir.clone(), false).await.unwrap();

    assert!(!ws.output("a.md").exists());
    assert!(!ws.output("nested/b.md").exists());
}

#[tokio::test]
async fn batch_skips_excluded_files_and_mirrors_the_tree() {
    let ws = Workspace::new();
    ws.write_input("overview.md", "# Overview\n\nText.\n");
    ws.write_input("reference/TOC.md", "# TOC\n\nDo not translate.\n");
    ws.write_input("reference/api.md", "# API\n\nReference text.\n");

    let mut config = ws.config();
    config.skip.patterns.push("**/TOC.md".to_string());

    let controller = common::controller_with(config, common::echo_service(), None);

    controller.run_folder(ws.input_dir.clone(), false).await.unwrap();

    assert!(ws.output("overview.md").exists());
    assert!(ws.output("reference/api.md").exists());
    assert!(!ws.output("reference/TOC.md").exists());
}

#[tokio::test]
async fn existing_output_is_kept_unless_forced() {
    let ws = Workspace::new();
    let input = ws.write_input("hello.md", "# Title\n\nHello world.\n");

    fs::create_dir_all(&ws.output_dir).unwrap();
    fs::write(ws.output("hello.md"), "previous translation\n").unwrap();

    let controller = common::controller_with(ws.config(), common::echo_service(), None);

    controller.run(input.clone(), false).await.unwrap();
    assert_eq!(fs::read_to_string(ws.output("hello.md")).unwrap(), "previous translation\n");

    controller.run(input, true).await.unwrap();
    assert_eq!(
        fs::read_to_string(ws.output("hello.md")).unwrap(),
        "# Title {#title}\n\nHello world.\n"
    );
}
