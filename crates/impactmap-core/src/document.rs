//! Editable Theory of Change document with change notification.
//!
//! Every successful mutation emits exactly one [`ChangeEvent`] to every listener, in
//! subscription order. Failed mutations leave the snapshot untouched and emit nothing. The
//! diagram pipeline does not subscribe here; callers re-render from [`Document::snapshot`].

use crate::snapshot::{Indicator, Outcome, Output, Snapshot};
use crate::{Error, Result};

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&ChangeEvent, &Snapshot)>;
type IdGenerator = Box<dyn FnMut() -> String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorTarget {
    Outcome {
        outcome_id: String,
    },
    Output {
        outcome_id: String,
        output_id: String,
    },
}

impl IndicatorTarget {
    pub fn outcome(outcome_id: impl Into<String>) -> Self {
        Self::Outcome {
            outcome_id: outcome_id.into(),
        }
    }

    pub fn output(outcome_id: impl Into<String>, output_id: impl Into<String>) -> Self {
        Self::Output {
            outcome_id: outcome_id.into(),
            output_id: output_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Replaced,
    ImpactUpdated,
    OutcomeAdded {
        outcome_id: String,
    },
    OutcomeUpdated {
        outcome_id: String,
    },
    OutcomeRemoved {
        outcome_id: String,
    },
    OutputAdded {
        outcome_id: String,
        output_id: String,
    },
    /// One structurally duplicated copy per outcome, as `(outcome_id, output_id)` pairs.
    SharedOutputAdded {
        copies: Vec<(String, String)>,
    },
    OutputUpdated {
        outcome_id: String,
        output_id: String,
    },
    OutputRemoved {
        outcome_id: String,
        output_id: String,
    },
    IndicatorAdded {
        target: IndicatorTarget,
        indicator_id: String,
    },
    IndicatorUpdated {
        target: IndicatorTarget,
        indicator_id: String,
    },
    IndicatorRemoved {
        target: IndicatorTarget,
        indicator_id: String,
    },
}

pub struct Document {
    snapshot: Snapshot,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    id_generator: IdGenerator,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("snapshot", &self.snapshot)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn uuid_v4() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Document {
    pub fn new(impact_statement: impl Into<String>) -> Self {
        Self::from_snapshot(Snapshot::new(impact_statement))
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            listeners: Vec::new(),
            next_subscription: 1,
            id_generator: Box::new(uuid_v4),
        }
    }

    /// Replaces UUID v4 ids with a caller-provided generator (useful for deterministic fixtures).
    pub fn with_id_generator(mut self, generator: impl FnMut() -> String + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ChangeEvent, &Snapshot) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: ChangeEvent) {
        tracing::trace!(?event, listeners = self.listeners.len(), "document changed");
        for (_, listener) in &mut self.listeners {
            listener(&event, &self.snapshot);
        }
    }

    fn next_id(&mut self) -> String {
        (self.id_generator)()
    }

    /// Swaps in an imported snapshot wholesale.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.emit(ChangeEvent::Replaced);
    }

    pub fn set_impact(&mut self, statement: impl Into<String>) {
        self.snapshot.impact.statement = statement.into();
        self.emit(ChangeEvent::ImpactUpdated);
    }

    pub fn add_outcome(&mut self, statement: impl Into<String>) -> String {
        let outcome_id = self.next_id();
        self.snapshot.outcomes.push(Outcome {
            id: outcome_id.clone(),
            statement: statement.into(),
            indicators: Vec::new(),
            outputs: Vec::new(),
        });
        self.emit(ChangeEvent::OutcomeAdded {
            outcome_id: outcome_id.clone(),
        });
        outcome_id
    }

    pub fn update_outcome(&mut self, outcome_id: &str, statement: impl Into<String>) -> Result<()> {
        self.outcome_mut(outcome_id)?.statement = statement.into();
        self.emit(ChangeEvent::OutcomeUpdated {
            outcome_id: outcome_id.to_string(),
        });
        Ok(())
    }

    pub fn remove_outcome(&mut self, outcome_id: &str) -> Result<Outcome> {
        let idx = self
            .snapshot
            .outcomes
            .iter()
            .position(|o| o.id == outcome_id)
            .ok_or_else(|| Error::unknown("outcome", outcome_id))?;
        let removed = self.snapshot.outcomes.remove(idx);
        self.emit(ChangeEvent::OutcomeRemoved {
            outcome_id: outcome_id.to_string(),
        });
        Ok(removed)
    }

    pub fn add_output(&mut self, outcome_id: &str, statement: impl Into<String>) -> Result<String> {
        self.outcome_mut(outcome_id)?;
        let output_id = self.next_id();
        self.outcome_mut(outcome_id)?.outputs.push(Output {
            id: output_id.clone(),
            statement: statement.into(),
            indicators: Vec::new(),
        });
        self.emit(ChangeEvent::OutputAdded {
            outcome_id: outcome_id.to_string(),
            output_id: output_id.clone(),
        });
        Ok(output_id)
    }

    /// Adds the same output statement to several outcomes.
    ///
    /// The data model has no shared reference: each outcome receives its own copy with a fresh
    /// id. All outcome ids are checked before anything is inserted.
    pub fn add_shared_output(
        &mut self,
        outcome_ids: &[&str],
        statement: impl Into<String>,
    ) -> Result<Vec<String>> {
        for outcome_id in outcome_ids {
            if self.snapshot.outcome(outcome_id).is_none() {
                return Err(Error::unknown("outcome", outcome_id));
            }
        }

        let statement = statement.into();
        let mut copies = Vec::with_capacity(outcome_ids.len());
        for outcome_id in outcome_ids {
            let output_id = self.next_id();
            self.outcome_mut(outcome_id)?.outputs.push(Output {
                id: output_id.clone(),
                statement: statement.clone(),
                indicators: Vec::new(),
            });
            copies.push((outcome_id.to_string(), output_id));
        }

        let ids = copies.iter().map(|(_, id)| id.clone()).collect();
        self.emit(ChangeEvent::SharedOutputAdded { copies });
        Ok(ids)
    }

    pub fn update_output(
        &mut self,
        outcome_id: &str,
        output_id: &str,
        statement: impl Into<String>,
    ) -> Result<()> {
        self.output_mut(outcome_id, output_id)?.statement = statement.into();
        self.emit(ChangeEvent::OutputUpdated {
            outcome_id: outcome_id.to_string(),
            output_id: output_id.to_string(),
        });
        Ok(())
    }

    pub fn remove_output(&mut self, outcome_id: &str, output_id: &str) -> Result<Output> {
        let outcome = self.outcome_mut(outcome_id)?;
        let idx = outcome
            .outputs
            .iter()
            .position(|o| o.id == output_id)
            .ok_or_else(|| Error::unknown("output", output_id))?;
        let removed = outcome.outputs.remove(idx);
        self.emit(ChangeEvent::OutputRemoved {
            outcome_id: outcome_id.to_string(),
            output_id: output_id.to_string(),
        });
        Ok(removed)
    }

    pub fn add_indicator(
        &mut self,
        target: IndicatorTarget,
        description: impl Into<String>,
    ) -> Result<String> {
        self.indicators_mut(&target)?;
        let indicator_id = self.next_id();
        self.indicators_mut(&target)?
            .push(Indicator::new(indicator_id.clone(), description));
        self.emit(ChangeEvent::IndicatorAdded {
            target,
            indicator_id: indicator_id.clone(),
        });
        Ok(indicator_id)
    }

    pub fn update_indicator(
        &mut self,
        target: IndicatorTarget,
        indicator_id: &str,
        description: impl Into<String>,
    ) -> Result<()> {
        let indicator = self
            .indicators_mut(&target)?
            .iter_mut()
            .find(|i| i.id == indicator_id)
            .ok_or_else(|| Error::unknown("indicator", indicator_id))?;
        indicator.description = description.into();
        self.emit(ChangeEvent::IndicatorUpdated {
            target,
            indicator_id: indicator_id.to_string(),
        });
        Ok(())
    }

    pub fn remove_indicator(
        &mut self,
        target: IndicatorTarget,
        indicator_id: &str,
    ) -> Result<Indicator> {
        let indicators = self.indicators_mut(&target)?;
        let idx = indicators
            .iter()
            .position(|i| i.id == indicator_id)
            .ok_or_else(|| Error::unknown("indicator", indicator_id))?;
        let removed = indicators.remove(idx);
        self.emit(ChangeEvent::IndicatorRemoved {
            target,
            indicator_id: indicator_id.to_string(),
        });
        Ok(removed)
    }

    fn outcome_mut(&mut self, outcome_id: &str) -> Result<&mut Outcome> {
        self.snapshot
            .outcomes
            .iter_mut()
            .find(|o| o.id == outcome_id)
            .ok_or_else(|| Error::unknown("outcome", outcome_id))
    }

    fn output_mut(&mut self, outcome_id: &str, output_id: &str) -> Result<&mut Output> {
        self.outcome_mut(outcome_id)?
            .outputs
            .iter_mut()
            .find(|o| o.id == output_id)
            .ok_or_else(|| Error::unknown("output", output_id))
    }

    fn indicators_mut(&mut self, target: &IndicatorTarget) -> Result<&mut Vec<Indicator>> {
        match target {
            IndicatorTarget::Outcome { outcome_id } => {
                Ok(&mut self.outcome_mut(outcome_id)?.indicators)
            }
            IndicatorTarget::Output {
                outcome_id,
                output_id,
            } => Ok(&mut self.output_mut(outcome_id, output_id)?.indicators),
        }
    }
}
