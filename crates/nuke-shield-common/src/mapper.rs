//! CloudFormation to aws-nuke resource type mapping
//!
//! CloudFormation reports hierarchical types such as `AWS::IAM::Role`, while
//! aws-nuke uses flat names such as `IAMRole`. Mapping strips the provider
//! namespace, joins progressively shorter suffixes of the remaining segments
//! and searches the catalog for each one:
//!
//! - an exact catalog hit on any candidate wins immediately
//! - otherwise every substring hit is collected and offered to an operator
//! - with no hits at all the type is unmatched
//!
//! Candidate computation ([`resolve`]) is pure. The operator decision comes
//! from an injected [`MappingPrompt`], so mapping is testable without a
//! terminal.

use crate::catalog::TargetTypeCatalog;
use crate::defaults::{PROVIDER_NAMESPACE, TYPE_SEPARATOR};
use indexmap::IndexSet;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Result of searching the catalog for a source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A candidate equals a catalog entry
    Exact(String),
    /// Only substring matches, deduplicated in discovery order
    Ambiguous(Vec<String>),
    NoMatch,
}

/// Final mapping decision for a source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// Unambiguous catalog match, no prompt shown
    Exact(String),
    /// Operator picked a partial match
    Chosen(String),
    /// Operator refused every candidate with `-1`
    Declined { candidates: Vec<String> },
    /// Operator input was not a valid choice; treated as declined
    InvalidChoice {
        input: String,
        candidates: Vec<String>,
    },
    /// Nothing in the catalog resembles the type
    Unmatched,
}

impl Mapping {
    /// The aws-nuke type to write filters under, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Mapping::Exact(t) | Mapping::Chosen(t) => Some(t),
            _ => None,
        }
    }
}

/// Operator decision for an ambiguous mapping.
///
/// Implementations return the raw operator answer: a 1-based candidate
/// number, or `-1` to refuse all candidates. Interpretation happens in
/// [`TypeMapper`] so every implementation gets the same validation.
pub trait MappingPrompt {
    /// Ask the operator to pick one of `candidates` for `source_type`
    fn ask(&mut self, source_type: &str, candidates: &[String]) -> std::io::Result<String>;

    /// Observe the final decision for a source type. No-op by default.
    fn report(&mut self, _source_type: &str, _mapping: &Mapping) {}
}

/// Refuses every ambiguous mapping without asking anyone
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

impl MappingPrompt for DeclineAll {
    fn ask(&mut self, _source_type: &str, _candidates: &[String]) -> std::io::Result<String> {
        Ok("-1".to_string())
    }
}

/// Replays queued answers, declining once they run out.
/// Records every question asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<(String, Vec<String>)>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Every `(source_type, candidates)` presented so far
    pub fn asked(&self) -> &[(String, Vec<String>)] {
        &self.asked
    }
}

impl MappingPrompt for ScriptedPrompt {
    fn ask(&mut self, source_type: &str, candidates: &[String]) -> std::io::Result<String> {
        self.asked
            .push((source_type.to_string(), candidates.to_vec()));
        Ok(self.answers.pop_front().unwrap_or_else(|| "-1".to_string()))
    }
}

/// Interpreted operator answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based candidate index
    Chosen(usize),
    Declined,
    Invalid,
}

/// Interpret an operator answer against `count` candidates numbered from 1
pub fn interpret_choice(input: &str, count: usize) -> Selection {
    match input.trim().parse::<i64>() {
        Ok(-1) => Selection::Declined,
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Selection::Chosen(n as usize - 1),
        _ => Selection::Invalid,
    }
}

/// Search strings for a source type, fullest suffix first.
///
/// `AWS::ApiGateway::RestApi` yields `ApiGatewayRestApi`, then `RestApi`.
pub fn search_candidates(source_type: &str) -> Vec<String> {
    let cleaned = source_type
        .strip_prefix(PROVIDER_NAMESPACE)
        .unwrap_or(source_type);
    let segments: Vec<&str> = cleaned
        .split(TYPE_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();

    (0..segments.len())
        .map(|start| segments[start..].concat())
        .collect()
}

/// Search the catalog for `source_type` without involving an operator
pub fn resolve(source_type: &str, catalog: &TargetTypeCatalog) -> MatchOutcome {
    let mut partial: IndexSet<&str> = IndexSet::new();

    for candidate in search_candidates(source_type) {
        let matches: Vec<&str> = catalog.containing(&candidate).collect();
        debug!(source_type, candidate = %candidate, matches = ?matches, "Searched catalog");

        if let Some(exact) = matches.iter().find(|m| **m == candidate) {
            return MatchOutcome::Exact((*exact).to_string());
        }
        partial.extend(matches);
    }

    if partial.is_empty() {
        MatchOutcome::NoMatch
    } else {
        MatchOutcome::Ambiguous(partial.into_iter().map(str::to_string).collect())
    }
}

/// Maps source types against a catalog, consulting the operator for
/// ambiguous matches
pub struct TypeMapper<'a> {
    catalog: &'a TargetTypeCatalog,
    prompt: &'a mut dyn MappingPrompt,
}

impl<'a> TypeMapper<'a> {
    pub fn new(catalog: &'a TargetTypeCatalog, prompt: &'a mut dyn MappingPrompt) -> Self {
        Self { catalog, prompt }
    }

    /// Map one source type. Never fails: every problem degrades to a
    /// declined or unmatched mapping.
    pub fn map(&mut self, source_type: &str) -> Mapping {
        let mapping = match resolve(source_type, self.catalog) {
            MatchOutcome::Exact(target) => {
                info!(source_type, target = %target, "Mapped resource type");
                Mapping::Exact(target)
            }
            MatchOutcome::NoMatch => {
                warn!(source_type, "No aws-nuke resource type matches");
                Mapping::Unmatched
            }
            MatchOutcome::Ambiguous(candidates) => self.ask_operator(source_type, candidates),
        };
        self.prompt.report(source_type, &mapping);
        mapping
    }

    fn ask_operator(&mut self, source_type: &str, candidates: Vec<String>) -> Mapping {
        let input = match self.prompt.ask(source_type, &candidates) {
            Ok(input) => input,
            Err(e) => {
                warn!(source_type, error = %e, "Failed to read mapping choice, declining");
                return Mapping::InvalidChoice {
                    input: String::new(),
                    candidates,
                };
            }
        };

        match interpret_choice(&input, candidates.len()) {
            Selection::Chosen(index) => {
                let target = candidates[index].clone();
                info!(source_type, target = %target, "Operator chose resource type");
                Mapping::Chosen(target)
            }
            Selection::Declined => {
                info!(source_type, "Operator declined all mapping candidates");
                Mapping::Declined { candidates }
            }
            Selection::Invalid => {
                warn!(source_type, input = %input.trim(), "Invalid mapping choice, declining");
                Mapping::InvalidChoice {
                    input: input.trim().to_string(),
                    candidates,
                }
            }
        }
    }
}
