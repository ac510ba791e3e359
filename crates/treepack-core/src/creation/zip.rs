//! ZIP archive writing.
//!
//! The writer consumes a lazy sequence of [`PackEntry`] values and streams
//! each file into a Deflate-compressed ZIP entry before pulling the next one,
//! so at most one file is in flight at a time.

use crate::PackError;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::config::PackConfig;
use crate::creation::report::PackReport;
use crate::creation::walker::PackEntry;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Size of the reusable copy buffer.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Entries at or above this size need ZIP64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Writes `entries` into a fresh archive at `output`.
///
/// 1. Deletes any file already at `output` (absence is fine).
/// 2. Creates `output` exclusively; a file reappearing in between is an
///    error, never silently overwritten.
/// 3. For each entry, in order: reads the file at
///    `<packaging_root>/<relative>` and appends it under its relative path.
/// 4. Finalizes the archive.
///
/// The first error aborts the run. The partially written file is left in
/// place and is not a valid archive.
///
/// # Examples
///
/// ```no_run
/// use treepack_core::NoopProgress;
/// use treepack_core::PackConfig;
/// use treepack_core::creation::walker::FilteredWalker;
/// use treepack_core::creation::zip::pack;
///
/// let config = PackConfig::new("/build/MyMod").with_source_root("/build/MyMod/GameData");
/// let walker = FilteredWalker::new(&config)?.skip_path(&config.output_path);
/// let report = pack(&config.output_path, walker.walk(), &config, &mut NoopProgress)?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
///
/// # Errors
///
/// - `PackError::OutputIsDirectory` / `RemoveOutput` if the old output
///   cannot be deleted
/// - `PackError::OutputExists` / `CreateOutput` if the new output cannot be
///   created exclusively
/// - any error yielded by `entries`
/// - `PackError::ReadFile` if a source file cannot be read
/// - `PackError::Io` / `PackError::Zip` on write or finalization failure
pub fn pack<I>(
    output: &Path,
    entries: I,
    config: &PackConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<PackReport>
where
    I: IntoIterator<Item = Result<PackEntry>>,
{
    let start = Instant::now();
    let mut report = PackReport::new();
    report.output_path = output.to_path_buf();

    report.replaced_existing = remove_existing_output(output)?;
    let file = create_output(output)?;
    info!(output = %output.display(), "writing archive");

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(config.compression_level)));

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    for (idx, entry) in entries.into_iter().enumerate() {
        let entry = entry?;

        progress.on_entry_start(&entry.relative, idx + 1);
        let bytes = add_file_to_zip(&mut zip, &entry, config, &options, &mut buffer, progress)?;
        progress.on_entry_complete(&entry.relative);

        if bytes != entry.size {
            warn!(
                path = %entry.relative,
                listed = entry.size,
                read = bytes,
                "file size changed while packaging"
            );
            report.add_warning(format!(
                "{} changed size while packaging ({} bytes listed, {} bytes read)",
                entry.relative, entry.size, bytes
            ));
        }

        report.files_added += 1;
        report.bytes_read += bytes;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    report.archive_size = file.metadata()?.len();
    report.duration = start.elapsed();

    info!(
        output = %output.display(),
        files = report.files_added,
        bytes = report.bytes_read,
        "archive finalized"
    );
    progress.on_complete();

    Ok(report)
}

/// Deletes the file at `path` if one exists.
///
/// Returns `true` if a file was removed and `false` if there was nothing to
/// remove.
///
/// # Errors
///
/// - `PackError::OutputIsDirectory` if `path` is a directory
/// - `PackError::RemoveOutput` if the file exists but cannot be deleted
pub fn remove_existing_output(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(PackError::OutputIsDirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(PackError::RemoveOutput {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous archive");
            Ok(true)
        }
        // Someone else removed it first; the goal is met.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(PackError::RemoveOutput {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Creates `path`, failing if anything already exists there.
///
/// # Errors
///
/// - `PackError::OutputExists` if a file is already present
/// - `PackError::CreateOutput` for any other failure
pub fn create_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| {
            if source.kind() == ErrorKind::AlreadyExists {
                PackError::OutputExists {
                    path: path.to_path_buf(),
                }
            } else {
                PackError::CreateOutput {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
}

/// Appends one file and returns the number of bytes read from it.
fn add_file_to_zip<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &PackEntry,
    config: &PackConfig,
    options: &SimpleFileOptions,
    buffer: &mut [u8],
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let source_path = entry.relative.resolve(&config.packaging_root);
    let read_error = |source| PackError::ReadFile {
        path: source_path.clone(),
        source,
    };

    let mut file = File::open(&source_path).map_err(read_error)?;

    let file_options = if config.preserve_permissions {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = file.metadata().map_err(read_error)?;
            options.unix_permissions(metadata.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            *options
        }
    } else {
        *options
    };
    let file_options = file_options.large_file(entry.size >= ZIP64_THRESHOLD);

    zip.start_file(entry.relative.as_str(), file_options)?;

    let mut bytes_read = 0u64;
    loop {
        let n = match file.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        zip.write_all(&buffer[..n])?;
        bytes_read += n as u64;
        progress.on_bytes_written(n as u64);
    }

    debug!(path = %entry.relative, bytes = bytes_read, "added");
    Ok(bytes_read)
}
