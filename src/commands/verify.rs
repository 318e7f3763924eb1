use crate::HashtoolContext;
use crate::cli::VerifyArgs;
use crate::crawler::{EntryStatus, VerifyOptions, VerifyReport, Verifier};
use crate::output;
use anyhow::Result;

/// Combine command-line arguments with the loaded configuration.
#[must_use]
pub fn build_options(ctx: &HashtoolContext, args: &VerifyArgs) -> VerifyOptions {
    let mut options = VerifyOptions::new(args.algorithm);
    options.recursive = args.recursive;
    if !args.checkfiles.is_empty() {
        options.checkfiles.clone_from(&args.checkfiles);
    }
    options.include = ctx.config.merge_include(&args.filter.include);
    options.exclude = ctx.config.merge_exclude(&args.filter.exclude);
    options
}

/// Verify every manifest found under the requested directories.
///
/// Failed entries are part of the returned report, not errors; callers turn
/// [`VerifyReport::is_ok`] into the exit status.
///
/// # Errors
///
/// Returns an error if a glob is invalid, a root is not a directory, or a
/// manifest or listed file cannot be read.
pub fn execute(ctx: &HashtoolContext, args: &VerifyArgs) -> Result<VerifyReport> {
    let verifier = Verifier::new(build_options(ctx, args))?;
    let mut total = VerifyReport::default();

    super::for_each_root(&verifier, &args.directories, |root, report| {
        let summary = format!(
            "{}: {} checksum files verified, {} failed ({} ok, {} missing, {} invalid, {} skipped)",
            root.display(),
            report.manifests.len(),
            report.failed_manifests(),
            report.count(EntryStatus::Ok),
            report.count(EntryStatus::Missing),
            report.count(EntryStatus::Invalid),
            report.count(EntryStatus::Skipped),
        );
        if report.is_ok() {
            output::success(&summary);
        } else {
            output::info(&summary);
        }
        total.merge(report);
    })?;

    Ok(total)
}
