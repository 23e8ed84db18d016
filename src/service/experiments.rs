//! Experiment operations

use serde_json::json;

use super::{ActionOutcome, Triangler};
use crate::experiment::{Experiment, ExperimentRecord, ExperimentReport, ExperimentUpdate, NewExperiment};
use crate::significance::SampleSet;
use crate::table::Table;
use crate::{Error, Result};

impl Triangler {
    /// All experiments ordered by name (ties by id).
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn experiments(&self) -> Result<Vec<Experiment>> {
        let mut experiments = self.store.experiments().all()?;
        experiments.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(experiments)
    }

    /// Get an experiment.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn experiment(&self, id: u64) -> Result<Experiment> {
        self.store.get_experiment(id)?.ok_or_else(|| {
            tracing::error!(id, "experiment not found");
            Error::not_found("Experiment", id)
        })
    }

    /// Create an experiment.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDateRange` if the payload ends before it starts.
    pub fn create_experiment(&self, payload: NewExperiment) -> Result<Experiment> {
        payload.validate()?;
        let experiment = self
            .store
            .experiments()
            .insert(ExperimentRecord::try_from(payload)?)?;
        tracing::info!(id = experiment.id(), name = experiment.name(), "created experiment");
        Ok(experiment)
    }

    /// Apply a partial update to an experiment.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id and
    /// `Error::InvalidDateRange` if the merged schedule is invalid.
    pub fn update_experiment(&self, id: u64, update: ExperimentUpdate) -> Result<Experiment> {
        if update.is_empty() {
            return self.experiment(id);
        }
        let updated = self
            .store
            .experiments()
            .modify(id, |record| {
                *record = record.apply(update)?;
                Ok(())
            })?
            .ok_or_else(|| {
                tracing::error!(id, "experiment not found");
                Error::not_found("Experiment", id)
            })?;
        tracing::info!(id, "updated experiment");
        Ok(updated)
    }

    /// Delete an experiment with its flights, tokens and responses.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn delete_experiment(&self, id: u64) -> Result<ActionOutcome> {
        self.experiment(id)?;
        if !self.store.delete_experiment(id)? {
            // Removed concurrently between the lookup and the delete
            return Err(Error::not_found("Experiment", id));
        }
        tracing::info!(id, "deleted experiment");
        Ok(ActionOutcome::success("Experiment found, proceeding to delete.")
            .with_details(json!({ "id": id })))
    }

    /// Outcomes of every flight of an experiment. Unanswered flights count
    /// as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn sample_set(&self, id: u64) -> Result<SampleSet> {
        self.experiment(id)?;
        self.store.sample_set(id)
    }

    /// Experiment with its current sample size and p-value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if there is no experiment with that id.
    pub fn experiment_report(&self, id: u64) -> Result<ExperimentReport> {
        let experiment = self.experiment(id)?;
        self.report(experiment)
    }

    /// Reports for all experiments, ordered by name.
    ///
    /// # Errors
    ///
    /// Propagates table errors.
    pub fn experiment_reports(&self) -> Result<Vec<ExperimentReport>> {
        self.experiments()?
            .into_iter()
            .map(|experiment| self.report(experiment))
            .collect()
    }

    fn report(&self, experiment: Experiment) -> Result<ExperimentReport> {
        let outcomes = self.store.sample_set(experiment.id())?;
        let significance = self.evaluator.evaluate(&outcomes);
        Ok(ExperimentReport::new(experiment, &significance))
    }
}
