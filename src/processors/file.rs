//! File and directory translation

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::client::OpenAiClient;
use crate::core::dispatcher::{ChatEndpoint, FixedDelayPacer, Pacer};
use crate::core::errors::{Result, TranslationError};
use crate::core::translator::DocumentTranslator;

/// Extensions picked up when scanning directories
const TRANSLATABLE_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Translates text files on disk through a [`DocumentTranslator`]
pub struct FileProcessor<E = OpenAiClient, P = FixedDelayPacer> {
    translator: DocumentTranslator<E, P>,
}

impl<E: ChatEndpoint, P: Pacer> FileProcessor<E, P> {
    pub fn new(translator: DocumentTranslator<E, P>) -> Self {
        Self { translator }
    }

    /// Find translatable files directly inside `dir`
    pub fn find_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_dir(dir)?;

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_translatable_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Find translatable files under `dir`, descending into subdirectories
    pub fn find_files_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_dir(dir)?;

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_translatable_file(p))
            .collect();

        files.sort();
        Ok(files)
    }

    /// Translate one file and write the result to `output`
    pub async fn translate_file(&self, input: &Path, output: &Path, target_lang: &str) -> Result<()> {
        debug!("Translating: {}", input.display());

        let content = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| TranslationError::FileError {
                path: input.display().to_string(),
                message: e.to_string(),
            })?;

        let translated = self.translator.translate(&content, target_lang).await?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| TranslationError::FileError {
                        path: parent.display().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        tokio::fs::write(output, translated)
            .await
            .map_err(|e| TranslationError::FileError {
                path: output.display().to_string(),
                message: e.to_string(),
            })?;

        info!("Translated: {} -> {}", input.display(), output.display());
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(TranslationError::FileError {
            path: dir.display().to_string(),
            message: "Not a directory".to_string(),
        })
    }
}

/// Check if a file has a translatable extension
pub fn is_translatable_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            TRANSLATABLE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Default output location when none is given.
///
/// `notes.md` becomes `notes_translated.md`; a directory gets a
/// `translated` subdirectory.
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.join("translated");
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_translated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_translated", stem),
    };
    input.with_file_name(name)
}

/// Mirror `file`'s position under `input_root` into `output_root`.
///
/// A single input file written to an existing directory keeps its name
/// inside that directory.
pub fn output_path_for(file: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
    match file.strip_prefix(input_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => output_root.join(relative),
        _ if output_root.is_dir() => match file.file_name() {
            Some(name) => output_root.join(name),
            None => output_root.to_path_buf(),
        },
        _ => output_root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::Dispatcher;
    use crate::core::models::{ChatCompletionRequest, ChatCompletionResponse};
    use crate::core::tokenizer::CharCountEncoder;
    use async_trait::async_trait;

    struct UppercaseEndpoint;

    #[async_trait]
    impl ChatEndpoint for UppercaseEndpoint {
        async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
            Ok(ChatCompletionResponse::with_content(
                request.messages[1].content.to_uppercase(),
            ))
        }
    }

    struct NoPause;

    #[async_trait]
    impl Pacer for NoPause {
        async fn pause(&self) {}
    }

    fn processor() -> FileProcessor<UppercaseEndpoint, NoPause> {
        FileProcessor::new(DocumentTranslator::new(
            Dispatcher::new(UppercaseEndpoint, "gpt-3.5-turbo", 0.5),
            NoPause,
            CharCountEncoder,
        ))
    }

    #[test]
    fn test_is_translatable_file() {
        assert!(is_translatable_file(Path::new("test.md")));
        assert!(is_translatable_file(Path::new("test.MD")));
        assert!(is_translatable_file(Path::new("test.markdown")));
        assert!(is_translatable_file(Path::new("notes.txt")));
        assert!(!is_translatable_file(Path::new("test.rs")));
        assert!(!is_translatable_file(Path::new("README")));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("docs/notes.md")),
            PathBuf::from("docs/notes_translated.md")
        );
        assert_eq!(
            default_output_path(Path::new("CHANGELOG")),
            PathBuf::from("CHANGELOG_translated")
        );
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("in/a/b.md"), Path::new("in"), Path::new("out")),
            PathBuf::from("out/a/b.md")
        );
        assert_eq!(
            output_path_for(Path::new("in.md"), Path::new("in.md"), Path::new("out.md")),
            PathBuf::from("out.md")
        );
    }

    #[test]
    fn test_single_file_into_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        assert_eq!(output_path_for(&input, &input, &out_dir), out_dir.join("notes.md"));
    }

    #[tokio::test]
    async fn test_translate_file_into_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        let out_dir = dir.path().join("out");
        std::fs::write(&input, "Body").unwrap();
        std::fs::create_dir(&out_dir).unwrap();

        let target = output_path_for(&input, &input, &out_dir);
        processor().translate_file(&input, &target, "French").await.unwrap();

        assert!(out_dir.is_dir());
        assert_eq!(std::fs::read_to_string(out_dir.join("notes.md")).unwrap(), "BODY");
    }

    #[test]
    fn test_find_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("skip.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.markdown"), "c").unwrap();

        let processor = processor();

        let flat = processor.find_files(dir.path()).unwrap();
        assert_eq!(flat, vec![dir.path().join("a.txt"), dir.path().join("b.md")]);

        let deep = processor.find_files_recursive(dir.path()).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&dir.path().join("nested/c.markdown")));
    }

    #[test]
    fn test_find_files_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.md");
        std::fs::write(&file, "a").unwrap();

        let result = processor().find_files(&file);
        assert!(matches!(result, Err(TranslationError::FileError { .. })));
    }

    #[tokio::test]
    async fn test_translate_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        let output = dir.path().join("out/deep/notes.md");
        std::fs::write(&input, "# Title\n\nBody text").unwrap();

        processor()
            .translate_file(&input, &output, "French")
            .await
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "# TITLE\n\nBODY TEXT");
    }

    #[tokio::test]
    async fn test_translate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = processor()
            .translate_file(&dir.path().join("missing.md"), &dir.path().join("out.md"), "French")
            .await;

        assert!(matches!(result, Err(TranslationError::FileError { .. })));
    }
}
