use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe en un fichero temporal junto al destino y lo renombra encima.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn replaces_existing_file_and_leaves_no_tmp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("cadence.toml");

    atomic_write_str(&path, "a = 1\n").unwrap();
    atomic_write_str(&path, "a = 2\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a = 2\n");
    assert!(!path.with_extension("tmp").exists());
  }
}
