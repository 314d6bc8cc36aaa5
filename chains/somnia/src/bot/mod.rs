pub mod pipeline;

pub use pipeline::{
    BatchReport, PipelineServices, Stage, StopReason, WalletPipeline, WalletRunRecord,
    MIN_BALANCE_WEI,
};
