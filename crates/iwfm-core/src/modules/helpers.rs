use crate::domain::{IwfmError, IwfmResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a whole input file as lines. `role` names the file in diagnostics.
pub fn read_lines(path: &Path, role: &str) -> IwfmResult<Vec<String>> {
    require_file(path, role)?;
    let source = fs::read_to_string(path).map_err(|source| {
        IwfmError::io_system(
            "IO.INPUT_READ",
            format!(
                "failed to read {} '{}': {}",
                role,
                path.display(),
                source
            ),
        )
    })?;
    Ok(source.lines().map(str::to_string).collect())
}

/// Join `lines` with newlines plus a trailing empty line and write them,
/// creating the parent directory when needed.
pub fn write_lines(path: &Path, lines: &[String], role: &str) -> IwfmResult<()> {
    ensure_parent(path, role)?;
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text).map_err(|source| {
        IwfmError::io_system(
            "IO.OUTPUT_WRITE",
            format!(
                "failed to write {} '{}': {}",
                role,
                path.display(),
                source
            ),
        )
    })
}

/// Copy a companion file unchanged to its submodel name.
pub fn copy_verbatim(old: &Path, new: &Path, role: &str) -> IwfmResult<()> {
    require_file(old, role)?;
    ensure_parent(new, role)?;
    fs::copy(old, new).map_err(|source| {
        IwfmError::io_system(
            "IO.OUTPUT_WRITE",
            format!(
                "failed to copy {} '{}' to '{}': {}",
                role,
                old.display(),
                new.display(),
                source
            ),
        )
    })?;
    tracing::info!(role, from = %old.display(), to = %new.display(), "copied");
    Ok(())
}

pub fn require_file(path: &Path, role: &str) -> IwfmResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IwfmError::missing_file(path, role))
    }
}

/// Resolve a file name read from a model file against the directory of the
/// file that referenced it. Windows separators are normalised first.
pub fn resolve_reference(base_dir: &Path, name: &str) -> PathBuf {
    let normalised = name.replace('\\', "/");
    let candidate = Path::new(&normalised);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn ensure_parent(path: &Path, role: &str) -> IwfmResult<()> {
    let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|source| {
        IwfmError::io_system(
            "IO.OUTPUT_DIRECTORY",
            format!(
                "failed to create {} directory '{}': {}",
                role,
                parent.display(),
                source
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{copy_verbatim, read_lines, resolve_reference, write_lines};
    use crate::domain::IwfmErrorCategory;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn written_buffer_round_trips_with_trailing_line() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("nested").join("out.dat");
        let lines = vec!["C header".to_string(), "1 2 3".to_string()];

        write_lines(&path, &lines, "test output").expect("write should succeed");
        let text = std::fs::read_to_string(&path).expect("output should exist");
        assert_eq!(text, "C header\n1 2 3\n");
        assert_eq!(read_lines(&path, "test output").expect("read back"), lines);
    }

    #[test]
    fn missing_input_is_reported_as_missing_file() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = read_lines(&temp.path().join("absent.dat"), "groundwater file")
            .expect_err("absent file");
        assert_eq!(error.category(), IwfmErrorCategory::MissingFile);
        assert!(error.message().starts_with("groundwater file"));

        let error = copy_verbatim(
            &temp.path().join("absent.dat"),
            &temp.path().join("copy.dat"),
            "rates file",
        )
        .expect_err("absent source");
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn backslash_references_resolve_against_the_model_directory() {
        let resolved = resolve_reference(Path::new("model"), r"GW\Groundwater.dat");
        assert_eq!(resolved, Path::new("model/GW/Groundwater.dat"));
    }
}
