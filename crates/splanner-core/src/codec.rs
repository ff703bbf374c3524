//! Persistence codec for `.pysplan` plan documents.
//!
//! A plan is stored as a single JSON value:
//!
//! ```json
//! {
//!   "name": "Mission 1",
//!   "hubType": "spike",
//!   "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B",
//!                 "wheelDiameter": 56.0, "axleTrack": 112.0},
//!   "runs": [{
//!     "name": "Warm-up",
//!     "points": [[0.0, 0.0], [120.0, 40.0]],
//!     "actions": [{"anchorPoint": [120.0, 40.0], "anchorIndex": 1,
//!                  "operationName": "lift", "arguments": [90, "fast", true],
//!                  "blocking": false}]
//!   }]
//! }
//! ```
//!
//! Points are ordered pairs. Actions reference their waypoint by value and,
//! since a run may pass through the same coordinates twice, by index as well.
//! Documents without `anchorIndex` resolve the anchor to the first waypoint
//! with equal coordinates; a missing `blocking` reads as `false`.
//! Decoding goes through the validating model constructors, so a document
//! is either loaded completely or rejected; there is no partial load.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{IoResultExt, Result, SplanError},
    models::{Action, ActionArg, DriveBase, DriveBaseFields, Hub, Plan, Point, Run},
};

/// Wire form of a [`Plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_type: Option<Hub>,
    pub drive_base: DriveBaseFields,
    pub runs: Vec<RunDocument>,
}

/// Wire form of a [`Run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct RunDocument {
    pub name: String,
    #[cfg_attr(feature = "schema", schemars(with = "Vec<[f64; 2]>"))]
    pub points: Vec<Point>,
    pub actions: Vec<ActionDocument>,
}

/// Wire form of an [`Action`], anchored by coordinates instead of index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ActionDocument {
    #[cfg_attr(feature = "schema", schemars(with = "[f64; 2]"))]
    pub anchor_point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_index: Option<usize>,
    pub operation_name: String,
    pub arguments: Vec<ActionArg>,
    #[serde(default)]
    pub blocking: bool,
}

impl From<&Plan> for PlanDocument {
    fn from(plan: &Plan) -> Self {
        PlanDocument {
            name: plan.name().to_string(),
            hub_type: plan.hub_type(),
            drive_base: (*plan.drive_base()).into(),
            runs: plan.runs().map(RunDocument::from).collect(),
        }
    }
}

impl From<&Run> for RunDocument {
    fn from(run: &Run) -> Self {
        RunDocument {
            name: run.name().to_string(),
            points: run.points().to_vec(),
            actions: run
                .actions()
                .iter()
                .filter_map(|action| {
                    run.anchor_point(action).map(|anchor_point| ActionDocument {
                        anchor_point,
                        anchor_index: Some(action.anchor),
                        operation_name: action.operation_name.clone(),
                        arguments: action.arguments.clone(),
                        blocking: action.blocking,
                    })
                })
                .collect(),
        }
    }
}

impl RunDocument {
    fn into_run(self) -> Result<Run> {
        let RunDocument {
            name,
            points,
            actions,
        } = self;

        let mut resolved = Vec::with_capacity(actions.len());
        for action in actions {
            let anchor = resolve_anchor(&name, &points, &action)?;
            resolved.push(
                Action::new(anchor, action.operation_name, action.arguments)
                    .with_blocking(action.blocking),
            );
        }

        Run::with_parts(&name, points, resolved)
    }
}

/// Finds the waypoint an action is anchored to. An explicit index must point
/// at a waypoint with the stored coordinates.
fn resolve_anchor(run_name: &str, points: &[Point], action: &ActionDocument) -> Result<usize> {
    let at = action.anchor_point;
    match action.anchor_index {
        Some(index) if points.get(index) == Some(&at) => Ok(index),
        Some(index) => Err(SplanError::malformed(format!(
            "action '{}' in run '{run_name}' is anchored to waypoint {index}, which is not at [{}, {}]",
            action.operation_name,
            at.x(),
            at.y()
        ))),
        None => points.iter().position(|p| *p == at).ok_or_else(|| {
            SplanError::malformed(format!(
                "action '{}' in run '{run_name}' is anchored to [{}, {}], which is not a waypoint of the run",
                action.operation_name,
                at.x(),
                at.y()
            ))
        }),
    }
}

impl PlanDocument {
    /// Rebuilds the plan through the validating constructors.
    pub fn into_plan(self) -> Result<Plan> {
        let runs = self
            .runs
            .into_iter()
            .map(RunDocument::into_run)
            .collect::<Result<Vec<_>>>()?;
        let drive_base = DriveBase::try_from(self.drive_base)?;
        Plan::from_parts(&self.name, self.hub_type, drive_base, runs)
    }
}

/// Serializes a plan to compact JSON, the form embedded into scripts.
pub fn encode(plan: &Plan) -> Result<String> {
    Ok(serde_json::to_string(&PlanDocument::from(plan))?)
}

/// Serializes a plan to indented JSON for files meant to be read by people.
pub fn encode_pretty(plan: &Plan) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PlanDocument::from(plan))?)
}

/// Parses a plan document.
///
/// # Errors
///
/// Returns `SplanError::MalformedDocument` for structural problems (invalid
/// JSON, missing fields, wrong arity or types, anchors that are not
/// waypoints) and `SplanError::Validation` when a value breaks a model
/// invariant, such as an empty name or two motors on one port.
pub fn decode(text: &str) -> Result<Plan> {
    let document: PlanDocument =
        serde_json::from_str(text).map_err(|e| SplanError::malformed(e.to_string()))?;
    document.into_plan()
}

/// Loads a plan from disk.
pub async fn read_plan_file(path: impl AsRef<Path>) -> Result<Plan> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.at_path(path)?;
    let plan = decode(&text)?;
    debug!(
        "Loaded plan '{}' with {} run(s) from {}",
        plan.name(),
        plan.run_count(),
        path.display()
    );
    Ok(plan)
}

/// Writes a plan to disk as indented JSON, creating parent directories.
pub async fn write_plan_file(path: impl AsRef<Path>, plan: &Plan) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.at_path(parent)?;
    }
    let mut text = encode_pretty(plan)?;
    text.push('\n');
    tokio::fs::write(path, text).await.at_path(path)?;
    debug!("Saved plan '{}' to {}", plan.name(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ValidationErrorKind, models::MotorPort};

    fn sample_plan() -> Plan {
        let drive_base = DriveBase::new(MotorPort::A, MotorPort::B, 56.0, 112.0).unwrap();
        let mut plan = Plan::new("Mission", drive_base).unwrap();
        let run = plan.add_run("Warm-up").unwrap();
        plan.add_point_to_run(run, Point::new(0.0, 0.0).unwrap()).unwrap();
        plan.add_point_to_run(run, Point::new(120.5, 40.0).unwrap()).unwrap();
        plan.add_action(
            run,
            Action::new(1, "lift", vec![90.0.into(), "fast".into(), true.into()]),
        )
        .unwrap();
        plan.add_run("Empty").unwrap();
        plan
    }

    #[test]
    fn test_round_trip_preserves_plan() {
        let mut plan = sample_plan();
        plan.set_hub_type(Some(Hub::Spike));

        let decoded = decode(&encode(&plan).unwrap()).unwrap();
        assert_eq!(decoded, plan);

        let decoded_pretty = decode(&encode_pretty(&plan).unwrap()).unwrap();
        assert_eq!(decoded_pretty, plan);
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let point = Point::new(3.5, -2.0).unwrap();
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[3.5,-2.0]");
        assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), point);
    }

    #[test]
    fn test_point_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Point>("[1.0]").is_err());
        assert!(serde_json::from_str::<Point>("[1.0, 2.0, 3.0]").is_err());
        assert!(serde_json::from_str::<Point>(r#"{"x": 1.0, "y": 2.0}"#).is_err());
    }

    #[test]
    fn test_action_wire_shape() {
        let json = encode(&sample_plan()).unwrap();
        assert!(json.contains(
            r#""actions":[{"anchorPoint":[120.5,40.0],"anchorIndex":1,"operationName":"lift","arguments":[90.0,"fast",true],"blocking":false}]"#
        ));
        assert!(json.contains(r#""driveBase":{"leftMotorPort":"A","rightMotorPort":"B""#));
        assert!(!json.contains("hubType"));
    }

    #[test]
    fn test_fractional_coordinates_round_trip_exactly() {
        // Linear congruential sequence; coordinates have full 53-bit mantissas
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 11) as f64 / (1u64 << 53) as f64 * 2000.0 - 1000.0
        };

        let drive_base = DriveBase::new(MotorPort::A, MotorPort::B, 56.0, 112.0).unwrap();
        let mut plan = Plan::new("Precision", drive_base).unwrap();
        let run = plan.add_run("Dense").unwrap();
        for _ in 0..40 {
            let point = Point::new(next(), next()).unwrap();
            let json = serde_json::to_string(&point).unwrap();
            assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), point, "{json}");
            plan.add_point_to_run(run, point).unwrap();
        }
        plan.add_action(run, Action::new(39, "mark", vec![ActionArg::Number(next())]))
            .unwrap();

        assert_eq!(decode(&encode(&plan).unwrap()).unwrap(), plan);
    }

    #[test]
    fn test_anchor_index_disambiguates_revisited_waypoints() {
        let drive_base = DriveBase::new(MotorPort::A, MotorPort::B, 56.0, 112.0).unwrap();
        let mut plan = Plan::new("Loop", drive_base).unwrap();
        let run = plan.add_run("Out and back").unwrap();
        for x in [0.0, 10.0, 0.0] {
            plan.add_point_to_run(run, Point::new(x, 0.0).unwrap()).unwrap();
        }
        plan.add_action(run, Action::new(2, "park", vec![])).unwrap();

        let decoded = decode(&encode(&plan).unwrap()).unwrap();
        assert_eq!(decoded.run(run).unwrap().actions()[0].anchor, 2);
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_anchor_without_index_resolves_to_first_match() {
        let text = r#"{
            "name": "x",
            "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 56, "axleTrack": 112},
            "runs": [{"name": "r", "points": [[0, 0], [10, 0], [0, 0]], "actions": [
                {"anchorPoint": [0, 0], "operationName": "beep", "arguments": []}
            ]}]
        }"#;
        let plan = decode(text).unwrap();
        let action = &plan.run(0).unwrap().actions()[0];
        assert_eq!(action.anchor, 0);
        assert!(!action.blocking);
    }

    #[test]
    fn test_inconsistent_anchor_index_is_malformed() {
        for index in ["1", "7"] {
            let text = format!(
                r#"{{
                    "name": "x",
                    "driveBase": {{"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 56, "axleTrack": 112}},
                    "runs": [{{"name": "r", "points": [[0, 0], [10, 0]], "actions": [
                        {{"anchorPoint": [0, 0], "anchorIndex": {index}, "operationName": "beep", "arguments": []}}
                    ]}}]
                }}"#
            );
            assert!(
                matches!(decode(&text), Err(SplanError::MalformedDocument { .. })),
                "anchorIndex {index}"
            );
        }
    }

    #[test]
    fn test_integer_arguments_and_blocking_survive_round_trip() {
        let text = r#"{"name":"x","driveBase":{"leftMotorPort":"A","rightMotorPort":"B","wheelDiameter":56.0,"axleTrack":112.0},"runs":[{"name":"r","points":[[0.0,0.0]],"actions":[{"anchorPoint":[0.0,0.0],"anchorIndex":0,"operationName":"lift","arguments":[90,90.5,"up"],"blocking":true}]}]}"#;
        let plan = decode(text).unwrap();
        let action = &plan.run(0).unwrap().actions()[0];
        assert_eq!(
            action.arguments,
            vec![ActionArg::Int(90), ActionArg::Number(90.5), "up".into()]
        );
        assert!(action.blocking);
        assert_eq!(encode(&plan).unwrap(), text);
    }

    #[test]
    fn test_padded_names_are_kept() {
        let drive_base = DriveBase::new(MotorPort::A, MotorPort::B, 56.0, 112.0).unwrap();
        let mut plan = Plan::new(" Mission ", drive_base).unwrap();
        plan.add_run("Run 1 ").unwrap();

        let decoded = decode(&encode(&plan).unwrap()).unwrap();
        assert_eq!(decoded.name(), " Mission ");
        assert_eq!(decoded.run(0).unwrap().name(), "Run 1 ");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let text = r#"{"name": "x", "runs": []}"#;
        assert!(matches!(decode(text), Err(SplanError::MalformedDocument { .. })));
    }

    #[test]
    fn test_unknown_anchor_is_malformed() {
        let text = r#"{
            "name": "x",
            "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 56, "axleTrack": 112},
            "runs": [{"name": "r", "points": [[0, 0]], "actions": [
                {"anchorPoint": [5, 5], "operationName": "beep", "arguments": []}
            ]}]
        }"#;
        assert!(matches!(decode(text), Err(SplanError::MalformedDocument { .. })));
    }

    #[test]
    fn test_hand_edited_invariant_violations_are_rejected() {
        let duplicate_ports = r#"{
            "name": "x",
            "driveBase": {"leftMotorPort": "C", "rightMotorPort": "C", "wheelDiameter": 56, "axleTrack": 112},
            "runs": []
        }"#;
        let err = decode(duplicate_ports).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::DuplicateMotorPort));

        let empty_name = r#"{
            "name": "  ",
            "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 56, "axleTrack": 112},
            "runs": []
        }"#;
        let err = decode(empty_name).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::EmptyName));

        let zero_wheel = r#"{
            "name": "x",
            "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 0, "axleTrack": 112},
            "runs": []
        }"#;
        let err = decode(zero_wheel).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::NonPositiveDimension));
    }

    #[test]
    fn test_unknown_hub_is_malformed() {
        let text = r#"{
            "name": "x",
            "hubType": "nxt",
            "driveBase": {"leftMotorPort": "A", "rightMotorPort": "B", "wheelDiameter": 56, "axleTrack": 112},
            "runs": []
        }"#;
        assert!(matches!(decode(text), Err(SplanError::MalformedDocument { .. })));
    }

    #[tokio::test]
    async fn test_plan_file_round_trip() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("mission.pysplan");
        let plan = sample_plan();

        write_plan_file(&path, &plan).await.unwrap();
        let loaded = read_plan_file(&path).await.unwrap();
        assert_eq!(loaded, plan);
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let err = read_plan_file("/nonexistent/dir/plan.pysplan").await.unwrap_err();
        assert!(matches!(err, SplanError::FileSystem { .. }));
    }
}
