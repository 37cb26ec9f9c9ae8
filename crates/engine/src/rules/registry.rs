use super::advance::NaturalAdvance;
use super::blackwood::Blackwood;
use super::competitive::{Michaels, NegativeDouble, TakeoutDouble, UnusualNotrump};
use super::jacoby_2nt::Jacoby2NT;
use super::notrump::{JacobyTransfer, Stayman};
use super::opening::NaturalOpening;
use super::overcalls::NaturalOvercall;
use super::pass::{ForcedContinuation, NaturalPass};
use super::preempts::{Preempt, WeakTwo};
use super::rebid::NaturalRebid;
use super::response::NaturalResponse;
use super::strong_two_clubs::StrongTwoClubs;
use super::{isolate, RuleModule, SourceId};
use crate::candidate::Candidate;
use crate::config::SystemConfig;
use crate::error::EngineError;
use crate::features::Features;
use crate::trace::DecisionTrace;
use types::Hand;

/// The set of rule modules consulted on every turn, ordered by id.
pub struct RuleRegistry {
    modules: Vec<Box<dyn RuleModule>>,
}

impl RuleRegistry {
    /// Every module of the bundled system, configured from `config`.
    pub fn standard(config: &SystemConfig) -> Result<Self, EngineError> {
        let modules: Vec<Box<dyn RuleModule>> = vec![
            Box::new(NaturalOpening::new(config)),
            Box::new(StrongTwoClubs::new(config)),
            Box::new(WeakTwo::new(config)),
            Box::new(Preempt::new(config)),
            Box::new(NaturalResponse::new(config)),
            Box::new(Jacoby2NT::new(config)),
            Box::new(Stayman::new(config)),
            Box::new(JacobyTransfer::new(config)),
            Box::new(NaturalRebid::new(config)),
            Box::new(NaturalOvercall::new(config)),
            Box::new(TakeoutDouble::new(config)),
            Box::new(NegativeDouble::new(config)),
            Box::new(Michaels::new(config)),
            Box::new(UnusualNotrump::new(config)),
            Box::new(NaturalAdvance::new(config)),
            Box::new(Blackwood::new(config)),
            Box::new(ForcedContinuation),
            Box::new(NaturalPass::new(config)),
        ];
        Self::from_modules(modules)
    }

    /// Registers `modules`; ids must be unique.
    pub fn from_modules(mut modules: Vec<Box<dyn RuleModule>>) -> Result<Self, EngineError> {
        modules.sort_by_key(|m| m.id());
        if let Some(pair) = modules.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(EngineError::DuplicateSource(pair[0].id()));
        }
        Ok(Self { modules })
    }

    pub fn modules(&self) -> &[Box<dyn RuleModule>] {
        &self.modules
    }

    pub fn ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.modules.iter().map(|m| m.id())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Ask every module for its proposal. A faulting module contributes
    /// nothing; the fault is recorded in `trace`.
    pub(crate) fn evaluate(
        &self,
        hand: &Hand,
        features: &Features,
        trace: &mut DecisionTrace,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for module in &self.modules {
            let id = module.id();
            match isolate(id, || module.evaluate(hand, features)) {
                Ok(Some(mut candidate)) => {
                    candidate.source = id;
                    candidates.push(candidate);
                }
                Ok(None) => {}
                Err(fault) => trace.record_fault(id, &fault),
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::config;

    #[test]
    fn test_standard_ids_are_unique_and_sorted() {
        let registry = RuleRegistry::standard(&config()).unwrap();
        let ids: Vec<SourceId> = registry.ids().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
        assert_eq!(registry.len(), 18);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let modules: Vec<Box<dyn RuleModule>> =
            vec![Box::new(ForcedContinuation), Box::new(ForcedContinuation)];
        assert!(matches!(
            RuleRegistry::from_modules(modules),
            Err(EngineError::DuplicateSource("natural.continuation"))
        ));
    }
}
