//! Include/exclude glob filtering on bare file names.

use crate::error::HashtoolError;
use glob::Pattern;
use std::ffi::OsStr;

/// A pair of glob lists deciding which file names take part in an operation.
///
/// Exclude globs win over include globs. An empty include list matches
/// everything that is not excluded.
#[derive(Debug, Clone, Default)]
pub struct GlobFilter {
    /// Names must match at least one of these (unless empty)
    include: Vec<Pattern>,
    /// Names matching any of these are rejected
    exclude: Vec<Pattern>,
}

impl GlobFilter {
    /// Compile a filter from include and exclude glob strings.
    ///
    /// # Errors
    ///
    /// Returns [`HashtoolError::InvalidGlob`] for the first pattern that
    /// does not compile.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, HashtoolError> {
        Ok(Self {
            include: compile_globs(include)?,
            exclude: compile_globs(exclude)?,
        })
    }

    /// Filter that only includes names matching `globs` and excludes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HashtoolError::InvalidGlob`] if a pattern does not compile.
    pub fn including<S: AsRef<str>>(globs: &[S]) -> Result<Self, HashtoolError> {
        Ok(Self {
            include: compile_globs(globs)?,
            exclude: Vec::new(),
        })
    }

    /// Whether `name` passes the filter.
    ///
    /// Names that are not valid UTF-8 are matched in their lossy form.
    #[must_use]
    pub fn matches<N: AsRef<OsStr>>(&self, name: N) -> bool {
        let name = name.as_ref().to_string_lossy();
        if self.exclude.iter().any(|glob| glob.matches(&name)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|glob| glob.matches(&name))
    }
}

/// Compile each glob string, failing on the first bad one.
///
/// # Errors
///
/// Returns [`HashtoolError::InvalidGlob`] naming the offending pattern.
pub fn compile_globs<S: AsRef<str>>(globs: &[S]) -> Result<Vec<Pattern>, HashtoolError> {
    globs
        .iter()
        .map(|glob| {
            let glob = glob.as_ref();
            Pattern::new(glob).map_err(|e| HashtoolError::InvalidGlob {
                pattern: glob.to_string(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}
