pub mod job;
pub mod record;
pub mod report;

pub use record::{Evaluation, ResumeRecord};
pub use report::{EvaluationReport, ScoreBand, SkillScore, Verdict};
