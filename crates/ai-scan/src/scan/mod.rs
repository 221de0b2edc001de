//! Maturity scan scoring: answers in, per-domain and overall scores out.
//!
//! Every stage is a pure function of the survey and the answer sheet. Nothing
//! here performs I/O except the survey loaders, which exist for callers that
//! read the question tree from disk.

pub mod answers;
pub mod level;
pub mod normalizer;
pub mod report;
pub mod result;
pub mod scoring;
pub mod survey;

pub use answers::{AnswerSheet, RawAnswer};
pub use level::{MaturityLevel, ScoreBand};
pub use normalizer::{normalize, Normalized};
pub use report::{
    DomainAdvice, DomainRecommendation, ExportError, HeatmapEntry, WeakSpot, CSV_HEADER,
};
pub use result::{DomainResult, ItemResult, ScanResult};
pub use scoring::{
    score_overall, RuleOutcome, ScanScorer, ScoreOptions, ScoringConfig, ScoringConfigError,
    ScoringRule,
};
pub use survey::{AnswerOption, Domain, Question, SurveyDefinition, SurveyError};
