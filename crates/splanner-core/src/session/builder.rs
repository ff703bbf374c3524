//! Builder for creating and configuring PlanSession instances.

use std::path::{Path, PathBuf};

use log::info;

use super::PlanSession;
use crate::{
    codec,
    curve::CurveParams,
    error::{Result, SplanError},
    params::CreatePlan,
};

/// Builder for creating and configuring PlanSession instances.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    plan_path: Option<PathBuf>,
    new_plan: Option<CreatePlan>,
    curve_params: CurveParams,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the plan from a `.pysplan` file.
    ///
    /// When combined with [`SessionBuilder::with_new_plan`], the new plan is
    /// created instead and the path is only remembered for saving.
    pub fn with_plan_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.plan_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Starts from a freshly created plan.
    pub fn with_new_plan(mut self, params: CreatePlan) -> Self {
        self.new_plan = Some(params);
        self
    }

    /// Overrides the curve parameters used for previews.
    pub fn with_curve_params(mut self, params: CurveParams) -> Self {
        self.curve_params = params;
        self
    }

    /// Builds the configured session.
    ///
    /// # Errors
    ///
    /// Returns `SplanError::Validation` if the new-plan parameters are invalid,
    /// any codec error if the plan file cannot be loaded, and
    /// `SplanError::Configuration` if neither a plan nor a file was given.
    pub async fn build(self) -> Result<PlanSession> {
        let plan = match (&self.new_plan, &self.plan_path) {
            (Some(params), _) => params.build()?,
            (None, Some(path)) => codec::read_plan_file(path).await?,
            (None, None) => {
                return Err(SplanError::Configuration {
                    message: "a session needs a new plan or a plan file".to_string(),
                })
            }
        };

        info!(
            "Opened plan '{}' with {} run(s)",
            plan.name(),
            plan.run_count()
        );
        Ok(PlanSession::new(plan, self.curve_params, self.plan_path))
    }
}
