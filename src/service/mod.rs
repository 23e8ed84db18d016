//! Triangler service facade
//!
//! [`Triangler`] owns the experiment store, the user directory, the
//! configuration and the significance evaluator. The operations are split by
//! resource:
//!
//! - `experiments`: experiment CRUD, sample sets and reports
//! - `flights`: sample flights, their tokens and tasters' responses
//!
//! Every operation takes `&self`; share one instance across threads behind an
//! `Arc`.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use triangler::experiment::{ExperienceLevel, NewExperiment};
//! use triangler::significance::Choice;
//! use triangler::Triangler;
//!
//! # fn example() -> triangler::Result<()> {
//! let triangler = Triangler::builder().build()?;
//! let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let experiment = triangler.create_experiment(NewExperiment {
//!     name: "House roast".to_string(),
//!     description: "Light vs medium".to_string(),
//!     start_on: day,
//!     end_on: day,
//! })?;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let served = triangler.create_sample_flight(experiment.id(), Some(Choice::C), &mut rng)?;
//! let code = served.token().unwrap().token().to_string();
//!
//! triangler.submit_response(&code, Choice::C, ExperienceLevel::Novice)?;
//!
//! let report = triangler.experiment_report(experiment.id())?;
//! assert_eq!(report.sample_size(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod experiments;
mod flights;
mod outcome;

pub use flights::MAX_TOKEN_ATTEMPTS;
pub use outcome::ActionOutcome;

use crate::auth::UserDirectory;
use crate::config::TrianglerConfig;
use crate::experiment::ExperimentStore;
use crate::significance::SignificanceEvaluator;
use crate::Result;

/// Triangle-test backend instance
#[derive(Debug)]
pub struct Triangler {
    config: TrianglerConfig,
    store: ExperimentStore,
    users: UserDirectory,
    evaluator: SignificanceEvaluator,
}

impl Triangler {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> TrianglerBuilder {
        TrianglerBuilder::default()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &TrianglerConfig {
        &self.config
    }

    /// Get the underlying store.
    #[must_use]
    pub const fn store(&self) -> &ExperimentStore {
        &self.store
    }

    /// Get the user directory.
    #[must_use]
    pub const fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Get the significance evaluator.
    #[must_use]
    pub const fn evaluator(&self) -> SignificanceEvaluator {
        self.evaluator
    }
}

/// Triangler builder
#[derive(Debug, Default)]
pub struct TrianglerBuilder {
    config: Option<TrianglerConfig>,
    store: Option<ExperimentStore>,
}

impl TrianglerBuilder {
    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: TrianglerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Start from an existing store.
    #[must_use]
    pub fn store(mut self, store: ExperimentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the instance
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is out of range.
    pub fn build(self) -> Result<Triangler> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        tracing::debug!(host_name = %config.host_name, is_prod = config.is_prod, "building triangler");
        Ok(Triangler {
            users: UserDirectory::new(config.clone()),
            store: self.store.unwrap_or_default(),
            evaluator: SignificanceEvaluator::new(),
            config,
        })
    }
}
