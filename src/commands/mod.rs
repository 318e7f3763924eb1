pub mod generate;
pub mod unchecked;
pub mod verify;

use crate::crawler::DirectoryCrawler;
use crate::output;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Exit status when every manifest verified (or nothing needed verifying).
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status when at least one manifest had a missing or invalid entry.
pub const EXIT_VERIFY_FAILED: i32 = 1;

/// Exit status for errors that aborted the run.
pub const EXIT_FATAL: i32 = 2;

/// Run `crawler` over each root in order, handing every root's report to
/// `on_report`. The first failing root aborts the remaining ones.
///
/// # Errors
///
/// Returns the first error raised by the crawler.
pub fn for_each_root<C, F>(crawler: &C, roots: &[PathBuf], mut on_report: F) -> Result<()>
where
    C: DirectoryCrawler,
    F: FnMut(&Path, C::Report),
{
    for root in roots {
        output::debug(&format!("Processing root {} ...", root.display()));
        let report = crawler.process_directory(root)?;
        on_report(root, report);
    }
    Ok(())
}
