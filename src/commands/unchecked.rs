use crate::HashtoolContext;
use crate::cli::UncheckedArgs;
use crate::crawler::{UncheckedFinder, UncheckedOptions, UncheckedReport};
use crate::output;
use anyhow::Result;

/// Combine command-line arguments with the loaded configuration.
///
/// `--scope` wins over `[unchecked] scope`.
#[must_use]
pub fn build_options(ctx: &HashtoolContext, args: &UncheckedArgs) -> UncheckedOptions {
    let mut options = UncheckedOptions::new(args.checkfiles.clone());
    options.recursive = args.recursive;
    options.scope = args.scope.unwrap_or(ctx.config.unchecked.scope);
    options.include = ctx.config.merge_include(&args.filter.include);
    options.exclude = ctx.config.merge_exclude(&args.filter.exclude);
    options
}

/// Report files under the requested directories that no manifest references.
///
/// # Errors
///
/// Returns an error if no checkfile glob is given, a glob is invalid, a root
/// is not a directory, or a manifest cannot be read.
pub fn execute(ctx: &HashtoolContext, args: &UncheckedArgs) -> Result<UncheckedReport> {
    let finder = UncheckedFinder::new(build_options(ctx, args))?;
    let mut total = UncheckedReport::default();

    super::for_each_root(&finder, &args.directories, |root, report| {
        output::info(&format!(
            "{}: {} files considered, {} unchecked",
            root.display(),
            report.files.len(),
            report.unchecked().len()
        ));
        total.merge(report);
    })?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FilterArgs;
    use crate::config::Config;
    use crate::crawler::CompareScope;
    use crate::test_utils::fixtures::TestTree;

    fn args(tree: &TestTree) -> UncheckedArgs {
        UncheckedArgs {
            checkfiles: vec!["*.sha256".into()],
            recursive: true,
            scope: None,
            filter: FilterArgs::default(),
            directories: vec![tree.root().to_path_buf()],
        }
    }

    #[test]
    fn test_scope_from_config_unless_flag_given() -> Result<()> {
        let tree = TestTree::new()?;
        let mut config = Config::default();
        config.unchecked.scope = CompareScope::Directory;
        let ctx = HashtoolContext::from_config(config);

        let mut args = args(&tree);
        assert_eq!(build_options(&ctx, &args).scope, CompareScope::Directory);

        args.scope = Some(CompareScope::Tree);
        assert_eq!(build_options(&ctx, &args).scope, CompareScope::Tree);
        Ok(())
    }

    #[test]
    fn test_execute_lists_unreferenced_files() -> Result<()> {
        let tree = TestTree::sample()?;
        tree.create_file("SUMS.sha256", "00 *a.txt\n00 *b.txt\n00 *sub/c.txt\n")?;
        let ctx = HashtoolContext::from_config(Config::default());

        let report = execute(&ctx, &args(&tree))?;

        assert_eq!(
            report.unchecked(),
            vec![tree.root().join("sub/deeper/d.txt").as_path()]
        );
        Ok(())
    }
}
