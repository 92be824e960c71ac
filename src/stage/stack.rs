//! Canonical, memoized stage chains

use std::sync::Arc;

use tracing::debug;

use crate::validation::CHAIN_SEPARATOR;

use super::error::ConfigError;
use super::registry::Registry;
use super::session::Session;
use super::types::{Entry, StageRef};

/// One chain element after resolution
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    /// Chain text claimed by the entry (one or more segments)
    pub segment: String,
    /// Chain prefix ending with this element
    pub path: String,
    pub entry: Entry,
}

impl ResolvedSegment {
    pub fn stage(&self) -> Option<StageRef> {
        self.entry.as_stage()
    }
}

/// The canonical object for one chain key.
///
/// Obtain stacks through [`StageStack::get`]; within one [`Session`] the
/// same key always yields the same `Arc`, so stacks can be compared with
/// `Arc::ptr_eq` and used as de-duplication keys.
#[derive(Debug)]
pub struct StageStack {
    key: String,
    chain: Vec<String>,
}

impl StageStack {
    /// Memoized stack for `chain_key`, built on first request.
    pub fn get(session: &Session, chain_key: &str) -> Result<Arc<StageStack>, ConfigError> {
        session.stack(chain_key)
    }

    pub(crate) fn new(chain_key: &str) -> Result<Self, ConfigError> {
        if chain_key.is_empty() {
            return Err(ConfigError::EmptyChain);
        }

        let chain = Self::split_key(chain_key);
        if chain.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::MalformedChain {
                chain: chain_key.to_string(),
            });
        }

        Ok(Self {
            key: chain_key.to_string(),
            chain,
        })
    }

    /// Join names into a chain key
    pub fn join_key<S: AsRef<str>>(names: &[S]) -> String {
        names
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(CHAIN_SEPARATOR)
    }

    /// Split a chain key back into its ordered names
    pub fn split_key(chain_key: &str) -> Vec<String> {
        chain_key.split(CHAIN_SEPARATOR).map(String::from).collect()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Directory path for this stack; identical to the chain key
    pub fn path(&self) -> &str {
        &self.key
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Longest window ending at `end` that names a registry entry.
    ///
    /// Windows start no earlier than `floor` and are never wider than the
    /// widest registered name.
    fn claim(
        &self,
        registry: &Registry,
        floor: usize,
        end: usize,
    ) -> Option<(usize, ResolvedSegment)> {
        let floor = floor.max(end.saturating_sub(registry.max_width()));

        (floor..end).find_map(|start| {
            let window = Self::join_key(&self.chain[start..end]);
            registry.lookup(&window).map(|entry| {
                let resolved = ResolvedSegment {
                    segment: window,
                    path: Self::join_key(&self.chain[..end]),
                    entry,
                };
                (start, resolved)
            })
        })
    }

    /// Find the stage responsible for a trailing part of this chain.
    ///
    /// `name_or_suffix` must match the last segments of the chain; windows
    /// within it are tried from the longest to the shortest and the first
    /// one claimed by any registry entry decides. Returns `None` when the
    /// argument is not a tail of this chain, when that entry is a project,
    /// or when nothing claims any window.
    pub fn find_stage(&self, registry: &Registry, name_or_suffix: &str) -> Option<StageRef> {
        let wanted = Self::split_key(name_or_suffix);
        if !self.chain.ends_with(&wanted) {
            debug!(stack = %self.key, name = %name_or_suffix, "not a tail of this chain");
            return None;
        }

        let end = self.chain.len();
        match self.claim(registry, end - wanted.len(), end) {
            Some((_, resolved)) => {
                debug!(
                    stack = %self.key,
                    window = %resolved.segment,
                    kind = resolved.entry.kind(),
                    "segment claimed"
                );
                resolved.stage()
            }
            None => {
                debug!(stack = %self.key, name = %name_or_suffix, "no stage claims segment");
                None
            }
        }
    }

    /// Stage-like entry owning the end of this chain, if any
    pub fn stage(&self, registry: &Registry) -> Option<StageRef> {
        self.claim(registry, 0, self.chain.len())
            .and_then(|(_, resolved)| resolved.stage())
    }

    /// Resolve every element of the chain, walking from the end.
    ///
    /// At each position the longest trailing window naming a project,
    /// pipeline or stage is consumed. A position nothing claims is a
    /// configuration error.
    pub fn resolve(&self, registry: &Registry) -> Result<Vec<ResolvedSegment>, ConfigError> {
        let mut resolved = Vec::new();
        let mut end = self.chain.len();

        while end > 0 {
            let Some((start, segment)) = self.claim(registry, 0, end) else {
                return Err(ConfigError::UnknownStage {
                    name: self.chain[end - 1].clone(),
                    chain: self.key.clone(),
                });
            };
            resolved.push(segment);
            end = start;
        }

        resolved.reverse();
        Ok(resolved)
    }

    /// Like [`StageStack::resolve`], but positions nothing claims are
    /// skipped one segment at a time.
    ///
    /// Grouping segments such as `by_ID` or reference names sit between
    /// stages without being registered themselves.
    pub fn resolve_known(&self, registry: &Registry) -> Vec<ResolvedSegment> {
        let mut resolved = Vec::new();
        let mut end = self.chain.len();

        while end > 0 {
            match self.claim(registry, 0, end) {
                Some((start, segment)) => {
                    resolved.push(segment);
                    end = start;
                }
                None => {
                    debug!(
                        stack = %self.key,
                        segment = %self.chain[end - 1],
                        "unclaimed segment skipped"
                    );
                    end -= 1;
                }
            }
        }

        resolved.reverse();
        resolved
    }
}

impl std::fmt::Display for StageStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
