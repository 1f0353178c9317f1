use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::store;
use crate::catalog::types::{normalize_category, Author, PhotoDraft};
use crate::config::ViewfinderConfig;
use crate::embedding::{self, InputType};
use crate::imaging;

/// Extensions worth attempting to decode. Anything else is skipped
/// silently during the directory walk.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Bulk-import every decodable image under a directory.
///
/// Titles come from file stems; all photos in one run share the given
/// category and author. Files that fail to decode or embed are reported
/// and skipped.
pub async fn import(
    config: &ViewfinderConfig,
    dir: &Path,
    category: &str,
    author: &str,
) -> Result<()> {
    anyhow::ensure!(dir.is_dir(), "not a directory: {}", dir.display());

    let category = normalize_category(Some(category)).map_err(|e| anyhow::anyhow!(e))?;
    let author = Author::from_name(author);

    // Collect candidates up front so the progress bar has a length
    let mut files = Vec::new();
    collect_images(dir, &mut files)?;
    files.sort();

    if files.is_empty() {
        println!("No image files found under {}", dir.display());
        return Ok(());
    }

    let db_path = config.resolved_db_path();
    let mut conn = crate::db::open_database(&db_path)?;

    let provider = embedding::create_provider(&config.embedding)?;
    let provider: Arc<dyn embedding::EmbeddingProvider> = Arc::from(provider);

    println!(
        "Importing {} images from {} (category: {category})...",
        files.len(),
        dir.display()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut imported = 0u64;
    let mut failed = 0u64;

    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(name);

        match import_one(&mut conn, &provider, path, &category, &author).await {
            Ok(()) => imported += 1,
            Err(e) => {
                failed += 1;
                pb.println(format!("  Failed {}: {e}", path.display()));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Record which model produced the vectors we just wrote
    if imported > 0 {
        crate::db::migrations::set_embedding_model(&conn, provider.model_id())?;
    }

    println!("Import complete:");
    println!("  Imported: {imported}");
    if failed > 0 {
        println!("  Failed:   {failed}");
    }

    Ok(())
}

/// Process, embed, and store one image file.
async fn import_one(
    conn: &mut rusqlite::Connection,
    provider: &Arc<dyn embedding::EmbeddingProvider>,
    path: &Path,
    category: &str,
    author: &Author,
) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let processed = imaging::process_image(&bytes)?;

    let draft = PhotoDraft {
        title: title_from_path(path),
        description: String::new(),
        image_uri: processed.image_uri,
        thumbnail_uri: processed.thumbnail_uri,
        category: category.to_string(),
        tags: vec![],
        author: Some(author.clone()),
        width: processed.width,
        height: processed.height,
        size_bytes: processed.size_bytes,
    };

    let text = draft.embedding_text();
    let text_embedding = provider.embed_text(&text, InputType::Document).await?;
    let image_embedding = provider
        .embed_image(&draft.image_uri, None, InputType::Document)
        .await?;

    store::add_photo(conn, &draft, &text_embedding, &image_embedding)?;
    Ok(())
}

/// Derive a human-readable title from a file path:
/// `shots/golden_gate-dusk.jpg` becomes `golden gate dusk`.
fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .replace(['_', '-'], " ")
        .trim()
        .to_string()
}

/// Recursively collect image files under a directory.
fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            collect_images(&path, out)?;
        } else if is_image_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.jpg")));
        assert!(is_image_file(Path::new("a.JPEG")));
        assert!(is_image_file(Path::new("dir/b.png")));
        assert!(is_image_file(Path::new("c.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(
            title_from_path(Path::new("shots/golden_gate-dusk.jpg")),
            "golden gate dusk"
        );
        assert_eq!(title_from_path(Path::new("IMG 0042.png")), "IMG 0042");
    }

    #[test]
    fn test_collect_images_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(sub.join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let mut files = Vec::new();
        collect_images(dir.path(), &mut files).unwrap();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.jpg"));
        assert!(files[1].ends_with("nested/b.png"));
    }
}
