//! Writing the generated file set to the output directory.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::html::OutputFile;

/// Remove previously generated pages so renamed symbols leave no stale
/// files behind. Only touches `*.html` and `*.json`.
fn clean_output(out_dir: &Path) -> anyhow::Result<()> {
    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        let generated = path
            .extension()
            .is_some_and(|ext| ext == "html" || ext == "json");
        if path.is_file() && generated {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}

pub fn write_files(out_dir: &Path, files: &[OutputFile], clean: bool) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    if clean {
        clean_output(out_dir)?;
    }

    for file in files {
        info!("writing {}", file.name);
        fs::write(out_dir.join(&file.name), &file.content)
            .with_context(|| format!("failed to write {}", file.name))?;
    }
    Ok(())
}
