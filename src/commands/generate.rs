use crate::HashtoolContext;
use crate::cli::GenerateArgs;
use crate::crawler::{GenerateOptions, GenerateReport, Generator};
use crate::output;
use anyhow::Result;

/// Combine command-line arguments with the loaded configuration.
#[must_use]
pub fn build_options(ctx: &HashtoolContext, args: &GenerateArgs) -> GenerateOptions {
    let mut options = GenerateOptions::new(args.algorithm);
    options.recursive = args.recursive;
    options.basedir_only = args.basedir;
    if let Some(filename) = &args.filename {
        options.filename.clone_from(filename);
    }
    options.overwrite.clone_from(&args.overwrite);
    options.backup = ctx.config.generate.backup && !args.no_backup;
    options.include = ctx.config.merge_include(&args.filter.include);
    options.exclude = ctx.config.merge_exclude(&args.filter.exclude);
    options
}

/// Write manifests under every requested directory.
///
/// # Errors
///
/// Returns an error if a glob is invalid, a root is not a directory, or any
/// file cannot be read or written.
pub fn execute(ctx: &HashtoolContext, args: &GenerateArgs) -> Result<GenerateReport> {
    let generator = Generator::new(build_options(ctx, args))?;
    let mut total = GenerateReport::default();

    super::for_each_root(&generator, &args.directories, |root, report| {
        output::info(&format!(
            "{}: {} files hashed, {} checksum files written",
            root.display(),
            report.files_hashed,
            report.manifests.len()
        ));
        total.merge(report);
    })?;

    Ok(total)
}
