//! Grid directory layout.
//!
//! | file | content |
//! |---|---|
//! | `Nx.txt`, `Nz.txt` | cell counts as plain text |
//! | `xe`, `xc`, `delx` | horizontal edges, centers, widths |
//! | `ze`, `zc`, `delz` | vertical edges, centers, widths |
//! | `ztope`, `ztopc` | topography at horizontal edges and centers |
//!
//! Arrays are headerless little-endian float64; lengths follow from the
//! counts (`N + 1` edges, `N` centers and widths).

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{GridSet, HorizontalGrid, VerticalGrid};
use crate::constants::{
    DELX_FILE, DELZ_FILE, NX_FILE, NZ_FILE, XC_FILE, XE_FILE, ZC_FILE, ZE_FILE, ZTOPC_FILE,
    ZTOPE_FILE,
};
use crate::error::{GridError, Result};
use crate::raw_array::{encode_f64, read_f64_file};

/// Where and how a grid set is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pub dir: PathBuf,
    /// Remove existing entries not starting with `.` or `_` first
    pub clear: bool,
}

fn is_protected(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

fn staging_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!(".{}.partial", name))
}

/// Create the directory, or clear it when asked, and drop staging entries
/// left over from an earlier failed write.
fn prepare_dir(options: &WriterOptions, names: &[&str]) -> Result<()> {
    let dir = &options.dir;
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| GridError::io(dir, e))?;
        info!("grid directory created: {}", dir.display());
    } else if options.clear {
        let mut removed = 0;
        for entry in fs::read_dir(dir).map_err(|e| GridError::io(dir, e))? {
            let entry = entry.map_err(|e| GridError::io(dir, e))?;
            if is_protected(&entry.file_name().to_string_lossy()) {
                continue;
            }
            remove_entry(&entry.path())?;
            removed += 1;
        }
        info!("cleared {} entries from {}", removed, dir.display());
    }

    for name in names {
        let staged = staging_path(dir, name);
        if staged.symlink_metadata().is_ok() {
            warn!("removing stale staging entry {}", staged.display());
            remove_entry(&staged)?;
        }
    }
    Ok(())
}

fn remove_entry(path: &Path) -> Result<()> {
    let is_dir = path
        .symlink_metadata()
        .map_err(|e| GridError::io(path, e))?
        .is_dir();
    if is_dir {
        fs::remove_dir_all(path).map_err(|e| GridError::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| GridError::io(path, e))
    }
}

/// Undo a failed write: staged files and whatever was already renamed.
fn discard(dir: &Path, names: &[&str], renamed: &[&str]) {
    for name in names {
        let _ = fs::remove_file(staging_path(dir, name));
    }
    for name in renamed {
        let _ = fs::remove_file(dir.join(name));
    }
}

fn read_count(dir: &Path, name: &str) -> Result<usize> {
    let path = dir.join(name);
    let text = fs::read_to_string(&path).map_err(|e| GridError::io(&path, e))?;
    text.trim()
        .parse::<usize>()
        .map_err(|e| GridError::MalformedGridFile {
            path,
            message: format!("expected a cell count: {}", e),
        })
}

/// Number of edges for a cell count read from `name`.
fn edge_count(dir: &Path, name: &str, cells: usize) -> Result<usize> {
    cells.checked_add(1).ok_or_else(|| GridError::MalformedGridFile {
        path: dir.join(name),
        message: format!("cell count {} is out of range", cells),
    })
}

fn read_array(dir: &Path, name: &str, expected: usize) -> Result<Vec<f64>> {
    let path = dir.join(name);
    let values = read_f64_file(&path)?;
    if values.len() != expected {
        return Err(GridError::MalformedGridFile {
            path,
            message: format!("expected {} values, found {}", expected, values.len()),
        });
    }
    Ok(values)
}

impl GridSet {
    /// Every output file name with its encoded content, count files last.
    fn encode(&self) -> Vec<(&'static str, Vec<u8>)> {
        let h = &self.horizontal;
        let v = &self.vertical;
        vec![
            (XE_FILE, encode_f64(&h.edges)),
            (XC_FILE, encode_f64(&h.centers)),
            (DELX_FILE, encode_f64(&h.widths)),
            (ZE_FILE, encode_f64(&v.edges)),
            (ZC_FILE, encode_f64(&v.centers)),
            (DELZ_FILE, encode_f64(&v.widths)),
            (ZTOPE_FILE, encode_f64(&h.edge_elevations)),
            (ZTOPC_FILE, encode_f64(&h.center_elevations)),
            (NX_FILE, h.cell_count().to_string().into_bytes()),
            (NZ_FILE, v.cell_count().to_string().into_bytes()),
        ]
    }

    /// Write the full file set.
    ///
    /// All files are staged under hidden names and only renamed into place
    /// once every one of them was written. On failure the staged files and
    /// any already renamed ones are removed, so no mix of old and new arrays
    /// with mismatched lengths is left behind.
    pub fn write(&self, options: &WriterOptions) -> Result<()> {
        let files = self.encode();
        let names: Vec<&str> = files.iter().map(|(name, _)| *name).collect();
        prepare_dir(options, &names)?;
        let dir = options.dir.as_path();

        for (name, bytes) in &files {
            let staged = staging_path(dir, name);
            if let Err(e) = fs::write(&staged, bytes) {
                discard(dir, &names, &[]);
                return Err(GridError::io(staged, e));
            }
        }
        for (i, name) in names.iter().enumerate() {
            let staged = staging_path(dir, name);
            if let Err(e) = fs::rename(&staged, dir.join(name)) {
                discard(dir, &names, &names[..i]);
                return Err(GridError::io(staged, e));
            }
        }

        info!("wrote {} grid files to {}", files.len(), dir.display());
        Ok(())
    }

    /// Load a grid directory, checking every array against the counts.
    pub fn read<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let nz = read_count(dir, NZ_FILE)?;
        let vertical = VerticalGrid {
            edges: read_array(dir, ZE_FILE, edge_count(dir, NZ_FILE, nz)?)?,
            centers: read_array(dir, ZC_FILE, nz)?,
            widths: read_array(dir, DELZ_FILE, nz)?,
        };

        let nx = read_count(dir, NX_FILE)?;
        let nxe = edge_count(dir, NX_FILE, nx)?;
        let horizontal = HorizontalGrid {
            edges: read_array(dir, XE_FILE, nxe)?,
            centers: read_array(dir, XC_FILE, nx)?,
            widths: read_array(dir, DELX_FILE, nx)?,
            edge_elevations: read_array(dir, ZTOPE_FILE, nxe)?,
            center_elevations: read_array(dir, ZTOPC_FILE, nx)?,
        };

        info!(
            "loaded grid from {}: x in [{}, {}] with {} cells, z in [{}, 0] with {} cells",
            dir.display(),
            horizontal.edges[0],
            horizontal.edges[nx],
            nx,
            vertical.edges[0],
            nz
        );
        Ok(GridSet {
            horizontal,
            vertical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerticalConfig;
    use crate::raw_array::write_f64_file;
    use tempfile::tempdir;

    fn sample_set() -> GridSet {
        let bump = |x: f64| (x / 3.0).sin() * 40.0 - 100.0;
        GridSet {
            horizontal: HorizontalGrid::from_edges(vec![-10.0, -2.5, 0.1, 4.0, 10.0], &bump),
            vertical: VerticalGrid::build(&VerticalConfig {
                zdepth: 50.0,
                delz0: 0.5,
                fdelz: 1.2,
            })
            .unwrap(),
        }
    }

    fn bits(values: &[f64]) -> Vec<u64> {
        values.iter().map(|v| v.to_bits()).collect()
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let dir = tempdir().unwrap();
        let options = WriterOptions {
            dir: dir.path().join("grid"),
            clear: true,
        };
        let set = sample_set();
        set.write(&options).unwrap();

        assert_eq!(fs::read_to_string(options.dir.join("Nx.txt")).unwrap(), "4");
        assert_eq!(
            fs::read_to_string(options.dir.join("Nz.txt")).unwrap(),
            set.vertical.cell_count().to_string()
        );

        let back = GridSet::read(&options.dir).unwrap();
        assert_eq!(bits(&back.horizontal.edges), bits(&set.horizontal.edges));
        assert_eq!(bits(&back.horizontal.center_elevations), bits(&set.horizontal.center_elevations));
        assert_eq!(bits(&back.vertical.edges), bits(&set.vertical.edges));
        assert_eq!(bits(&back.vertical.widths), bits(&set.vertical.widths));
        assert_eq!(back, set);
    }

    #[test]
    fn no_staging_files_are_left_behind() {
        let dir = tempdir().unwrap();
        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: false,
        };
        sample_set().write(&options).unwrap();

        assert_eq!(
            entry_names(dir.path()),
            vec!["Nx.txt", "Nz.txt", "delx", "delz", "xc", "xe", "zc", "ze", "ztopc", "ztope"]
        );
    }

    #[test]
    fn clearing_keeps_hidden_and_underscore_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("stale_output"), "old").unwrap();
        fs::write(dir.path().join(".keep"), "").unwrap();
        fs::write(dir.path().join("_settings.txt"), "k = v").unwrap();
        fs::create_dir(dir.path().join("old_run")).unwrap();

        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: true,
        };
        sample_set().write(&options).unwrap();

        assert!(!dir.path().join("stale_output").exists());
        assert!(!dir.path().join("old_run").exists());
        assert!(dir.path().join(".keep").exists());
        assert!(dir.path().join("_settings.txt").exists());
        assert!(dir.path().join("xe").exists());
    }

    #[test]
    fn without_clear_other_files_survive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes"), "keep me").unwrap();
        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: false,
        };
        sample_set().write(&options).unwrap();
        assert!(dir.path().join("notes").exists());
    }

    #[test]
    fn reader_rejects_inconsistent_arrays() {
        let dir = tempdir().unwrap();
        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: false,
        };
        sample_set().write(&options).unwrap();
        write_f64_file(dir.path().join("xc"), &[1.0, 2.0]).unwrap();

        assert!(matches!(
            GridSet::read(dir.path()),
            Err(GridError::MalformedGridFile { .. })
        ));
    }

    #[test]
    fn reader_rejects_bad_counts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Nz.txt"), "twelve").unwrap();
        assert!(matches!(
            GridSet::read(dir.path()),
            Err(GridError::MalformedGridFile { .. })
        ));
        assert!(matches!(
            GridSet::read(dir.path().join("absent")),
            Err(GridError::Io { .. })
        ));
    }

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn failed_rename_leaves_no_files_behind() {
        let dir = tempdir().unwrap();
        // a directory where a late array belongs makes its rename fail
        fs::create_dir(dir.path().join("ztopc")).unwrap();
        fs::write(dir.path().join("ztopc").join("held"), "x").unwrap();
        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: false,
        };

        let result = sample_set().write(&options);
        assert!(matches!(result, Err(GridError::Io { .. })));
        assert_eq!(entry_names(dir.path()), vec!["ztopc"]);
        assert!(GridSet::read(dir.path()).is_err());
    }

    #[test]
    fn stale_staging_entries_do_not_block_writing() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".xe.partial")).unwrap();
        fs::write(dir.path().join(".xe.partial").join("junk"), "x").unwrap();
        fs::write(dir.path().join(".Nz.txt.partial"), "7").unwrap();
        fs::write(dir.path().join(".keep"), "").unwrap();

        for clear in [false, true] {
            let options = WriterOptions {
                dir: dir.path().to_path_buf(),
                clear,
            };
            let set = sample_set();
            set.write(&options).unwrap();
            assert_eq!(GridSet::read(dir.path()).unwrap(), set);

            let names = entry_names(dir.path());
            assert!(names.iter().all(|n| !n.ends_with(".partial")));
            assert!(names.contains(&".keep".to_string()));
        }
    }

    #[test]
    fn reader_rejects_overflowing_counts() {
        let dir = tempdir().unwrap();
        let options = WriterOptions {
            dir: dir.path().to_path_buf(),
            clear: false,
        };
        sample_set().write(&options).unwrap();

        fs::write(dir.path().join("Nz.txt"), usize::MAX.to_string()).unwrap();
        assert!(matches!(
            GridSet::read(dir.path()),
            Err(GridError::MalformedGridFile { .. })
        ));

        sample_set().write(&options).unwrap();
        fs::write(dir.path().join("Nx.txt"), usize::MAX.to_string()).unwrap();
        assert!(matches!(
            GridSet::read(dir.path()),
            Err(GridError::MalformedGridFile { .. })
        ));
    }

    #[test]
    fn counts_tolerate_surrounding_whitespace() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Nx.txt"), " 17\n").unwrap();
        assert_eq!(read_count(dir.path(), "Nx.txt").unwrap(), 17);
    }
}
