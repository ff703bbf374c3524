//! Tests for the session module.

use super::*;
use crate::{
    codegen::InlineTemplate,
    error::ValidationErrorKind,
    models::{MotorPort, MAX_POINTS_PER_RUN},
    params::CreatePlan,
};
use tempfile::TempDir;

fn create_params() -> CreatePlan {
    CreatePlan {
        name: "Test Plan".to_string(),
        left_motor_port: MotorPort::A,
        right_motor_port: MotorPort::B,
        wheel_diameter: 56.0,
        axle_track: 112.0,
        hub_type: None,
        first_run: None,
    }
}

/// Helper function to create a test session
async fn create_test_session() -> PlanSession {
    SessionBuilder::new()
        .with_new_plan(create_params())
        .build()
        .await
        .expect("Failed to create session")
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y).expect("finite point")
}

#[tokio::test]
async fn test_create_run_selects_it() {
    let mut session = create_test_session().await;
    assert_eq!(session.active_run(), None);

    session
        .apply(PlanCommand::CreateRun {
            name: "First".to_string(),
        })
        .unwrap();
    let outcome = session
        .apply(PlanCommand::CreateRun {
            name: "Second".to_string(),
        })
        .unwrap();

    assert_eq!(outcome.active_run, Some(1));
    assert_eq!(outcome.snapshot.run_count(), 2);
    assert_eq!(outcome.snapshot.run(1).unwrap().name(), "Second");
}

#[tokio::test]
async fn test_capacity_warning_and_hard_limit() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Long".to_string(),
        })
        .unwrap();

    for i in 0..24 {
        let outcome = session
            .apply(PlanCommand::AddPoint {
                run: 0,
                point: pt(i as f64, 0.0),
            })
            .unwrap();
        assert!(outcome.warning.is_none(), "unexpected warning at point {}", i + 1);
    }

    let outcome = session
        .apply(PlanCommand::AddPoint {
            run: 0,
            point: pt(24.0, 0.0),
        })
        .unwrap();
    let warning = outcome.warning.expect("25th point should warn");
    assert_eq!(warning.points, 25);

    for i in 25..49 {
        session
            .apply(PlanCommand::AddPoint {
                run: 0,
                point: pt(i as f64, 0.0),
            })
            .unwrap();
    }
    assert_eq!(session.plan().run(0).unwrap().points().len(), 49);

    let err = session
        .apply(PlanCommand::AddPoint {
            run: 0,
            point: pt(49.0, 0.0),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SplanError::CapacityExceeded { limit, .. } if limit == MAX_POINTS_PER_RUN
    ));
    assert_eq!(session.plan().run(0).unwrap().points().len(), 49);
}

#[tokio::test]
async fn test_failed_command_leaves_plan_untouched() {
    let mut session = create_test_session().await;
    let before = session.snapshot();

    let err = session
        .apply(PlanCommand::AddPoint {
            run: 3,
            point: pt(1.0, 1.0),
        })
        .unwrap_err();
    assert!(matches!(err, SplanError::IndexOutOfRange { what: "run", .. }));

    let err = session
        .apply(PlanCommand::CreateRun {
            name: "   ".to_string(),
        })
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationErrorKind::EmptyName));

    assert_eq!(session.plan(), &before);
}

#[tokio::test]
async fn test_snapshots_do_not_observe_later_mutations() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();
    let snapshot = session
        .apply(PlanCommand::AddPoint {
            run: 0,
            point: pt(1.0, 1.0),
        })
        .unwrap()
        .snapshot;

    session
        .apply(PlanCommand::ReplacePoint {
            run: 0,
            index: 0,
            point: pt(9.0, 9.0),
        })
        .unwrap();

    assert_eq!(snapshot.run(0).unwrap().points(), &[pt(1.0, 1.0)]);
    assert_eq!(session.plan().run(0).unwrap().points(), &[pt(9.0, 9.0)]);
}

#[tokio::test]
async fn test_remove_point_cascades_actions() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();
    for x in [0.0, 10.0, 20.0] {
        session
            .apply(PlanCommand::AddPoint {
                run: 0,
                point: pt(x, 0.0),
            })
            .unwrap();
    }
    session
        .apply(PlanCommand::AddAction {
            run: 0,
            action: Action::new(1, "grab", vec![]),
        })
        .unwrap();
    session
        .apply(PlanCommand::AddAction {
            run: 0,
            action: Action::new(2, "drop", vec![]),
        })
        .unwrap();

    let outcome = session
        .apply(PlanCommand::RemovePoint { run: 0, index: 1 })
        .unwrap();

    assert_eq!(outcome.removed_actions.len(), 1);
    assert_eq!(outcome.removed_actions[0].operation_name, "grab");
    let run = outcome.snapshot.run(0).unwrap();
    assert_eq!(run.actions().len(), 1);
    assert_eq!(run.actions()[0].anchor, 1);
    assert_eq!(run.anchor_point(&run.actions()[0]), Some(pt(20.0, 0.0)));
}

#[tokio::test]
async fn test_dangling_action_is_rejected() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();

    let err = session
        .apply(PlanCommand::AddAction {
            run: 0,
            action: Action::new(0, "beep", vec![]),
        })
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationErrorKind::DanglingAnchor));
}

#[tokio::test]
async fn test_remove_run_adjusts_selection() {
    let mut session = create_test_session().await;
    for name in ["A", "B", "C"] {
        session
            .apply(PlanCommand::CreateRun {
                name: name.to_string(),
            })
            .unwrap();
    }
    session.apply(PlanCommand::SelectRun { run: 2 }).unwrap();

    let outcome = session.apply(PlanCommand::RemoveRun { run: 0 }).unwrap();
    assert_eq!(outcome.active_run, Some(1));
    assert_eq!(outcome.snapshot.run(1).unwrap().name(), "C");

    let outcome = session.apply(PlanCommand::RemoveRun { run: 1 }).unwrap();
    assert_eq!(outcome.active_run, Some(0));

    let outcome = session.apply(PlanCommand::RemoveRun { run: 0 }).unwrap();
    assert_eq!(outcome.active_run, None);
    assert!(session.preview().is_empty());
}

#[tokio::test]
async fn test_preview_follows_active_run() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();
    session
        .apply(PlanCommand::AddPoint {
            run: 0,
            point: pt(0.0, 0.0),
        })
        .unwrap();
    session
        .apply(PlanCommand::AddPoint {
            run: 0,
            point: pt(10.0, 0.0),
        })
        .unwrap();

    assert_eq!(
        session.preview(),
        vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)]
    );
    let lazy: Vec<Point> = session.preview_samples().expect("active run").collect();
    assert_eq!(lazy, session.preview());
}

#[tokio::test]
async fn test_generate_records_hub_only_on_success() {
    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();

    let broken = InlineTemplate::new("no placeholder");
    let err = session.generate(Hub::Spike, &broken).await.unwrap_err();
    assert!(matches!(err, SplanError::PlaceholderNotFound { occurrences: 0 }));
    assert_eq!(session.plan().hub_type(), None);

    let template = InlineTemplate::new("{INSERT_PATH_PLANNER_DATA}");
    let script = session.generate(Hub::Spike, &template).await.unwrap();
    assert_eq!(session.plan().hub_type(), Some(Hub::Spike));
    assert_eq!(
        crate::codec::decode(&script.text).unwrap(),
        session.snapshot()
    );
}

#[tokio::test]
async fn test_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("plan.pysplan");

    let mut session = create_test_session().await;
    assert!(session.save().await.is_err());
    session
        .apply(PlanCommand::CreateRun {
            name: "Run".to_string(),
        })
        .unwrap();
    session.save_as(&path).await.unwrap();

    let reloaded = SessionBuilder::new()
        .with_plan_file(&path)
        .build()
        .await
        .expect("Failed to reload session");
    assert_eq!(reloaded.plan(), session.plan());
    assert_eq!(reloaded.active_run(), Some(0));
    assert_eq!(reloaded.path(), Some(path.as_path()));
}

#[tokio::test]
async fn test_builder_requires_a_plan_source() {
    let err = SessionBuilder::new().build().await.unwrap_err();
    assert!(matches!(err, SplanError::Configuration { .. }));
}

#[tokio::test]
async fn test_set_drive_base_only_accepts_validated_values() {
    let mut session = create_test_session().await;

    // Drive bases arriving as JSON from a front end pass the same checks
    let rejected = serde_json::from_str::<DriveBase>(
        r#"{"leftMotorPort":"C","rightMotorPort":"C","wheelDiameter":-1.0,"axleTrack":112.0}"#,
    );
    assert!(rejected.is_err());

    let drive_base: DriveBase = serde_json::from_str(
        r#"{"leftMotorPort":"E","rightMotorPort":"F","wheelDiameter":88.0,"axleTrack":150.0}"#,
    )
    .unwrap();
    session
        .apply(PlanCommand::SetDriveBase { drive_base })
        .unwrap();
    assert_eq!(session.plan().drive_base().right_motor_port(), MotorPort::F);
    assert_eq!(session.plan().drive_base().wheel_diameter(), 88.0);
}

#[tokio::test]
async fn test_revisited_waypoint_keeps_its_actions_on_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("loop.pysplan");

    let mut session = create_test_session().await;
    session
        .apply(PlanCommand::CreateRun {
            name: "Loop".to_string(),
        })
        .unwrap();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)] {
        session
            .apply(PlanCommand::AddPoint {
                run: 0,
                point: pt(x, y),
            })
            .unwrap();
    }
    session
        .apply(PlanCommand::AddAction {
            run: 0,
            action: Action::new(2, "park", vec![]).with_blocking(true),
        })
        .unwrap();
    session.save_as(&path).await.unwrap();

    let reloaded = SessionBuilder::new()
        .with_plan_file(&path)
        .build()
        .await
        .expect("Failed to reload session");
    let action = &reloaded.plan().run(0).unwrap().actions()[0];
    assert_eq!(action.anchor, 2);
    assert!(action.blocking);
    assert_eq!(reloaded.plan(), session.plan());

    // Removing the first visit leaves the action on the last one
    let mut reloaded = reloaded;
    let outcome = reloaded
        .apply(PlanCommand::RemovePoint { run: 0, index: 0 })
        .unwrap();
    assert!(outcome.removed_actions.is_empty());
    assert_eq!(outcome.snapshot.run(0).unwrap().actions()[0].anchor, 1);
}
