// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The qualification taxonomy and the qualification → pipeline-stage classifier.
//!
//! This module is the single source of truth for the taxonomy: the stage
//! mapping and the counter-family predicates live here and nowhere else.
//! Classification is total -- any input string resolves to exactly one stage,
//! with unrecognized qualifications falling back to [`PipelineStage::ColdCall`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The outcome a caller reports after a call.
///
/// Closed enum over the sixteen known wire strings. Unknown strings are
/// handled at the boundary via [`Qualification::parse_lenient`], not deep in
/// the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    Interested,
    Qualified,
    MeetingScheduled,
    MeetingRequested,
    RdvScheduled,
    Appointment,
    DemoScheduled,
    DemoRequested,
    Callback,
    FollowUp,
    EmailSent,
    NotInterested,
    Disqualified,
    Nrp,
    NoAnswer,
    WrongNumber,
}

impl Qualification {
    /// Parse a reported qualification string, returning `None` for unknown values.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        Self::from_str(raw).ok()
    }

    /// Whether this outcome counts as an obtained meeting (meeting/demo family).
    pub fn is_meeting(self) -> bool {
        matches!(
            self,
            Self::MeetingScheduled
                | Self::MeetingRequested
                | Self::RdvScheduled
                | Self::Appointment
                | Self::DemoScheduled
                | Self::DemoRequested
        )
    }

    /// Whether this outcome counts as documentation sent.
    pub fn is_doc_sent(self) -> bool {
        matches!(self, Self::EmailSent)
    }

    /// Whether this outcome disqualifies the lead.
    pub fn is_disqualifying(self) -> bool {
        matches!(self, Self::Disqualified | Self::NotInterested)
    }

    /// Whether this outcome counts toward the no-response bucket.
    ///
    /// Only the literal `nrp` qualification increments the counter;
    /// `no_answer` and `wrong_number` classify into the nrp stage but do
    /// not count.
    pub fn is_nrp(self) -> bool {
        matches!(self, Self::Nrp)
    }
}

/// Current sales-funnel classification of a lead within a campaign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    ColdCall,
    Qualified,
    HighlyQualified,
    Proposal,
    ToFollowUp,
    Nrp,
    OutOfScope,
    Won,
    Lost,
}

impl PipelineStage {
    /// Terminal stages are excluded from the remaining-leads queue.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Map a known qualification to its pipeline stage.
pub fn stage_for(qualification: Qualification) -> PipelineStage {
    use Qualification as Q;
    match qualification {
        Q::Interested | Q::Qualified => PipelineStage::Qualified,
        Q::MeetingScheduled | Q::MeetingRequested | Q::RdvScheduled | Q::Appointment => {
            PipelineStage::HighlyQualified
        }
        Q::DemoScheduled | Q::DemoRequested => PipelineStage::Proposal,
        Q::Callback | Q::FollowUp | Q::EmailSent => PipelineStage::ToFollowUp,
        Q::NotInterested => PipelineStage::Nrp,
        Q::Disqualified => PipelineStage::OutOfScope,
        Q::Nrp | Q::NoAnswer | Q::WrongNumber => PipelineStage::Nrp,
    }
}

/// Classify a raw qualification string into a stage.
///
/// Total: unrecognized strings resolve to [`PipelineStage::ColdCall`].
pub fn classify(raw: &str) -> PipelineStage {
    Qualification::parse_lenient(raw)
        .map(stage_for)
        .unwrap_or(PipelineStage::ColdCall)
}
