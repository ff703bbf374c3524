//! Code generation: merging a plan into a hub script template.
//!
//! ```text
//! preconditions ──▶ fetch template ──▶ encode plan ──▶ substitute placeholder
//! (runs, ports)     (async)            (hub stamped)
//! ```
//!
//! Preconditions are checked before the template is fetched, so an invalid
//! plan never costs a fetch. The caller's plan is not touched: the requested
//! hub is stamped onto the serialized copy only.
//!
//! ```rust
//! use splanner_core::codegen::{substitute_placeholder, PLACEHOLDER};
//!
//! let template = format!("x={PLACEHOLDER}y");
//! assert_eq!(substitute_placeholder(&template, "P")?, "x=Py");
//! # Ok::<(), splanner_core::SplanError>(())
//! ```

pub mod device;
pub mod template;

use log::info;

pub use device::{deliver_script, DeviceChannel, MessageHandler, StreamChannel};
pub use template::{FileTemplate, InlineTemplate, TemplateSource};

use crate::{
    codec,
    error::{Result, SplanError, ValidationErrorKind},
    models::{Hub, Plan},
};

/// Token in the template that is replaced by the serialized plan.
pub const PLACEHOLDER: &str = "{INSERT_PATH_PLANNER_DATA}";

/// A complete script ready for download or delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Hub the script was generated for
    pub hub: Hub,
    pub text: String,
}

/// Checks everything that can be checked without the template.
pub fn check_preconditions(plan: &Plan, hub: Hub) -> Result<()> {
    if plan.run_count() == 0 {
        return Err(SplanError::validation(ValidationErrorKind::NoRuns).with_reason(format!(
            "plan '{}' needs at least one run before code can be generated",
            plan.name()
        )));
    }
    plan.drive_base().validate_for_hub(hub)?;
    Ok(())
}

/// Replaces the single placeholder in `template` with `payload`.
///
/// # Errors
///
/// Returns `SplanError::PlaceholderNotFound` unless the placeholder occurs
/// exactly once.
pub fn substitute_placeholder(template: &str, payload: &str) -> Result<String> {
    let occurrences = template.matches(PLACEHOLDER).count();
    if occurrences != 1 {
        return Err(SplanError::PlaceholderNotFound { occurrences });
    }
    Ok(template.replacen(PLACEHOLDER, payload, 1))
}

/// Generates the script for `hub` from `plan`.
pub async fn generate_script<S: TemplateSource>(
    plan: &Plan,
    hub: Hub,
    source: &S,
) -> Result<GeneratedScript> {
    check_preconditions(plan, hub)?;

    let template = source.fetch_template().await?;

    let mut stamped = plan.clone();
    stamped.set_hub_type(Some(hub));
    let payload = codec::encode(&stamped)?;
    let text = substitute_placeholder(&template, &payload)?;

    info!(
        "Generated {} script for plan '{}' ({} run(s), {} bytes)",
        hub.as_str(),
        plan.name(),
        plan.run_count(),
        text.len()
    );
    Ok(GeneratedScript { hub, text })
}
