use super::Session;
use anyhow::{bail, Context};
use std::path::PathBuf;

/// Read image files in order; any unreadable file aborts the whole batch
pub async fn read_images(paths: &[PathBuf]) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut blobs = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("could not read image {}", path.display()))?;
        if bytes.is_empty() {
            bail!("image {} is empty", path.display());
        }
        blobs.push(bytes);
    }
    Ok(blobs)
}

pub async fn attach(session: &Session, id: &str, paths: &[PathBuf]) -> anyhow::Result<()> {
    let blobs = read_images(paths).await?;
    let added = blobs.len();

    let store = session.open_store().await?;
    let entry = store
        .modify(id, |entry| entry.images.extend(blobs))
        .await?;
    println!(
        "Attached {} image(s) to {}, {} total",
        added,
        entry.id(),
        entry.images.len()
    );
    Ok(())
}

pub async fn detach(session: &Session, id: &str, image: usize) -> anyhow::Result<()> {
    let store = session.open_store().await?;
    let entry = store
        .get(id)
        .await
        .with_context(|| format!("no entry with id {}", id))?;
    if image >= entry.images.len() {
        bail!(
            "entry {} has {} image(s), no image {}",
            id,
            entry.images.len(),
            image
        );
    }

    let entry = store
        .modify(id, |entry| {
            if image < entry.images.len() {
                entry.images.remove(image);
            }
        })
        .await?;
    println!(
        "Removed image {} from {}, {} left",
        image,
        entry.id(),
        entry.images.len()
    );
    Ok(())
}
