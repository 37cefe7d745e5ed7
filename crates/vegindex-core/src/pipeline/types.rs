/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Listing,
    Measuring,
    Merging,
    Summarizing,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listing => write!(f, "Listing images"),
            Self::Measuring => write!(f, "Measuring images"),
            Self::Merging => write!(f, "Merging RGB and IR"),
            Self::Summarizing => write!(f, "Summarizing periods"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Progress reporting for long-running steps.
///
/// Implementors can use this to drive progress bars or logging. All methods
/// have default no-op implementations.
pub trait ProgressReporter {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g., image count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Progress reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Counts reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Candidate images (or rows) examined.
    pub processed: usize,
    /// Rows produced and added to the output.
    pub added: usize,
    /// Rows in the output file, zero on a dry run.
    pub total: usize,
}

/// Options shared by every run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute everything but write nothing.
    pub dry_run: bool,
}
