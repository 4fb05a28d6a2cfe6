#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Build every update but leave the database untouched.
    pub dry_run: bool,
    /// Stop after this many rows on the configured platform.
    pub limit: Option<usize>,
}
