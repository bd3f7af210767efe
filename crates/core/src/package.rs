//! Per-family TTC and zip packages, and the final collection archive.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use iosevka_font_collection::build_collection;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    config::TTF_DIRNAME,
    error::{Error, Result},
    io::{file_name, glob_files, glob_fonts, list_dirs, read_file, write_file},
    options::OutputOptions,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FamilyPackage {
    pub ttc: Option<PathBuf>,
    pub zip: Option<PathBuf>,
}

/// Write `<Family>.ttc` and `<Family>.zip` next to the family's `TTF/`.
///
/// Families without fonts are skipped.
pub fn package_family(family_dir: &Path, options: &OutputOptions) -> Result<FamilyPackage> {
    let name = file_name(family_dir)?;
    let ttf_dir = family_dir.join(TTF_DIRNAME);
    if !ttf_dir.is_dir() {
        return Ok(FamilyPackage::default());
    }
    let fonts = glob_fonts(&ttf_dir)?;
    if fonts.is_empty() {
        return Ok(FamilyPackage::default());
    }

    let ttc_path = family_dir.join(format!("{name}.ttc"));
    let zip_path = family_dir.join(format!("{name}.zip"));

    let (ttc, zip) = rayon::join(
        || -> Result<Option<PathBuf>> {
            if !options.ttc {
                return Ok(None);
            }
            write_collection(&fonts, &ttc_path)?;
            Ok(Some(ttc_path.clone()))
        },
        || -> Result<Option<PathBuf>> {
            if !options.zip {
                return Ok(None);
            }
            let entries = glob_files(&ttf_dir, "*")?;
            write_zip(&zip_path, &entries)?;
            Ok(Some(zip_path.clone()))
        },
    );
    Ok(FamilyPackage { ttc: ttc?, zip: zip? })
}

/// Combine fonts into one TrueType collection file.
pub fn write_collection(fonts: &[PathBuf], output: &Path) -> Result<()> {
    let data = fonts.iter().map(read_file).collect::<Result<Vec<_>>>()?;
    let collection = build_collection(&data).map_err(|e| {
        Error::font(format!("failed to build collection {}", output.display()), e)
    })?;
    write_file(output, collection)?;
    println!("  Created {} ({} fonts)", output.display(), fonts.len());
    Ok(())
}

/// `dist/all-ttc.zip` with every `<Family>/<Family>.ttc`. Returns how many
/// collections were archived; no archive is written when there are none.
pub fn archive_collections(dist_dir: &Path, output: &Path) -> Result<usize> {
    let mut collections = Vec::new();
    for family in list_dirs(dist_dir)? {
        let name = file_name(&family)?;
        let ttc = family.join(format!("{name}.ttc"));
        if ttc.is_file() {
            collections.push(ttc);
        }
    }
    if collections.is_empty() {
        return Ok(0);
    }
    write_zip(output, &collections)?;
    Ok(collections.len())
}

/// Zip regular files, each stored under its file name.
pub fn write_zip(output: &Path, files: &[PathBuf]) -> Result<()> {
    let archive_error = |source| Error::Archive { path: output.to_path_buf(), source };

    let file = File::create(output).map_err(|e| Error::io("create", output, e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files.iter().filter(|p| p.is_file()) {
        let data = read_file(path)?;
        writer.start_file(file_name(path)?, options).map_err(archive_error)?;
        writer.write_all(&data).map_err(|e| Error::io("write", output, e))?;
    }
    writer.finish().map_err(archive_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use read_fonts::FileRef;
    use tempfile::tempdir;
    use zip::ZipArchive;

    use super::*;

    fn zip_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn family_with_fonts(root: &Path, name: &str) -> PathBuf {
        let family = root.join(name);
        let ttf = family.join("TTF");
        fs::create_dir_all(&ttf).unwrap();
        fs::write(ttf.join(format!("{name}-Regular.ttf")), font_test_data::SIMPLE_GLYF).unwrap();
        fs::write(ttf.join(format!("{name}-Bold.ttf")), font_test_data::CMAP12_FONT1).unwrap();
        family
    }

    #[test]
    fn test_package_family_writes_ttc_and_zip() {
        let temp = tempdir().unwrap();
        let family = family_with_fonts(temp.path(), "Iosevka");

        let package = package_family(&family, &OutputOptions::default()).unwrap();

        let ttc = package.ttc.unwrap();
        assert_eq!(ttc, family.join("Iosevka.ttc"));
        let data = fs::read(&ttc).unwrap();
        match FileRef::new(&data).unwrap() {
            FileRef::Collection(collection) => assert_eq!(collection.len(), 2),
            FileRef::Font(_) => panic!("expected a collection"),
        }

        let zip = package.zip.unwrap();
        assert_eq!(zip_names(&zip), ["Iosevka-Bold.ttf", "Iosevka-Regular.ttf"]);
    }

    #[test]
    fn test_package_respects_switches() {
        let temp = tempdir().unwrap();
        let family = family_with_fonts(temp.path(), "Iosevka");
        let options = OutputOptions { ttc: false, archive: false, ..OutputOptions::default() };

        let package = package_family(&family, &options).unwrap();
        assert!(package.ttc.is_none());
        assert!(package.zip.is_some());
        assert!(!family.join("Iosevka.ttc").exists());
    }

    #[test]
    fn test_family_without_fonts_is_skipped() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Empty/TTF")).unwrap();
        let package =
            package_family(&temp.path().join("Empty"), &OutputOptions::default()).unwrap();
        assert_eq!(package, FamilyPackage::default());
    }

    #[test]
    fn test_invalid_font_is_a_font_error() {
        let temp = tempdir().unwrap();
        let bogus = temp.path().join("bogus.ttf");
        fs::write(&bogus, b"not a font").unwrap();
        let err = write_collection(&[bogus], &temp.path().join("out.ttc")).unwrap_err();
        assert!(matches!(err, Error::Font { .. }));
    }

    #[test]
    fn test_archive_collections() {
        let temp = tempdir().unwrap();
        for name in ["A", "B"] {
            let family = family_with_fonts(temp.path(), name);
            package_family(&family, &OutputOptions::default()).unwrap();
        }
        fs::create_dir_all(temp.path().join("NoCollection")).unwrap();

        let output = temp.path().join("all-ttc.zip");
        assert_eq!(archive_collections(temp.path(), &output).unwrap(), 2);
        assert_eq!(zip_names(&output), ["A.ttc", "B.ttc"]);
    }

    #[test]
    fn test_archive_without_collections_writes_nothing() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("all-ttc.zip");
        assert_eq!(archive_collections(temp.path(), &output).unwrap(), 0);
        assert!(!output.exists());
    }
}
