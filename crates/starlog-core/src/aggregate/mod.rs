mod orchestrator;
mod runner;
mod types;

pub use orchestrator::{run_aggregation, run_aggregation_reported};
pub use runner::{
    spawn_aggregation, AggregationController, AggregationHandle, CancellationToken,
    ChannelProgressReporter,
};
pub use types::{
    AggregationEvent, AggregationOutcome, AggregationResult, AggregationStage, Diagnostics,
    ProgressReporter, SessionReport, StatusCounts,
};
